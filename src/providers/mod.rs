//! Ports to the outside world: recognition, synthesis and storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adaptive::types::{Session, UserProfile};
use crate::config::Config;
use crate::speech::types::Transcription;

pub mod google;
pub mod memory;

pub use google::GoogleSpeechClient;
pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("audio decode failed: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("no speech detected")]
    NoSpeech,
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParams {
    pub language_code: String,
    pub voice_name: String,
    pub speaking_rate: f64,
    pub pitch: f64,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            language_code: "id-ID".to_string(),
            voice_name: "id-ID-Standard-A".to_string(),
            speaking_rate: 0.9,
            // Raised for a child-friendly voice.
            pitch: 2.0,
        }
    }
}

impl VoiceParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language_code: config.language_code.clone(),
            voice_name: config.voice_name.clone(),
            speaking_rate: config.speaking_rate,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// `Err(ProviderError::NoSpeech)` when the recording holds no speech.
    async fn transcribe(
        &self,
        audio: &[u8],
        language_code: &str,
    ) -> Result<Transcription, ProviderError>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceParams) -> Result<Vec<u8>, ProviderError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProviderError>;

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), ProviderError>;

    /// Up to `window` most recent sessions, oldest first.
    async fn get_recent_sessions(
        &self,
        user_id: &str,
        window: usize,
    ) -> Result<Vec<Session>, ProviderError>;

    async fn append_session(&self, session: &Session) -> Result<(), ProviderError>;
}
