use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::warn;

use crate::providers::{ProviderError, SpeechSynthesizer, Transcriber, VoiceParams};
use crate::speech::types::{Transcription, WordConfidence};

const DEFAULT_SPEECH_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";
const DEFAULT_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const MAX_RETRIES: usize = 2;
const BASE_BACKOFF_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub speech_endpoint: String,
    pub tts_endpoint: String,
    pub timeout: Duration,
}

impl GoogleConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_string("GOOGLE_API_KEY"),
            speech_endpoint: env_string("GOOGLE_SPEECH_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SPEECH_ENDPOINT.to_string()),
            tts_endpoint: env_string("GOOGLE_TTS_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_TTS_ENDPOINT.to_string()),
            timeout: Duration::from_millis(
                env_string("GOOGLE_TIMEOUT_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
        }
    }
}

/// Google Cloud Speech-to-Text and Text-to-Speech over their REST APIs.
#[derive(Clone)]
pub struct GoogleSpeechClient {
    config: GoogleConfig,
    client: reqwest::Client,
}

impl GoogleSpeechClient {
    pub fn new(config: GoogleConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(GoogleConfig::from_env())
    }

    pub fn is_available(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }

    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<Vec<u8>, ProviderError> {
        let api_key = self.api_key().ok_or(ProviderError::NotConfigured("GOOGLE_API_KEY"))?;
        let mut retry = 0;

        loop {
            let outcome = self
                .client
                .post(url)
                .query(&[("key", api_key)])
                .json(payload)
                .send()
                .await;

            let err = match outcome {
                Ok(resp) if resp.status().is_success() => {
                    return Ok(resp.bytes().await?.to_vec());
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    let err = ProviderError::HttpStatus { status, body };
                    if !is_retryable(status) {
                        return Err(err);
                    }
                    err
                }
                Err(e) => ProviderError::Request(e),
            };

            if retry >= MAX_RETRIES {
                return Err(err);
            }
            warn!(retry, error = %err, "google request failed, retrying");
            sleep(Duration::from_millis(BASE_BACKOFF_MS << retry)).await;
            retry += 1;
        }
    }
}

#[async_trait]
impl Transcriber for GoogleSpeechClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        language_code: &str,
    ) -> Result<Transcription, ProviderError> {
        let payload = recognize_payload(audio, language_code);
        let body = self.post_json(&self.config.speech_endpoint, &payload).await?;
        parse_recognize_response(&body)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechClient {
    async fn synthesize(&self, text: &str, voice: &VoiceParams) -> Result<Vec<u8>, ProviderError> {
        let payload = synthesize_payload(text, voice);
        let body = self.post_json(&self.config.tts_endpoint, &payload).await?;
        parse_synthesize_response(&body)
    }
}

/// Short-utterance recognition of browser-recorded WebM/Opus audio.
pub fn recognize_payload(audio: &[u8], language_code: &str) -> serde_json::Value {
    serde_json::json!({
        "config": {
            "encoding": "WEBM_OPUS",
            "sampleRateHertz": 48000,
            "languageCode": language_code,
            "enableWordConfidence": true,
            "enableAutomaticPunctuation": true,
            "model": "latest_short"
        },
        "audio": { "content": STANDARD.encode(audio) }
    })
}

pub fn synthesize_payload(text: &str, voice: &VoiceParams) -> serde_json::Value {
    serde_json::json!({
        "input": { "text": text },
        "voice": {
            "languageCode": voice.language_code,
            "name": voice.voice_name
        },
        "audioConfig": {
            "audioEncoding": "MP3",
            "speakingRate": voice.speaking_rate,
            "pitch": voice.pitch
        }
    })
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    words: Vec<RecognizedWord>,
}

#[derive(Debug, Deserialize)]
struct RecognizedWord {
    word: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Top alternative of the first result; no results means no speech.
pub fn parse_recognize_response(body: &[u8]) -> Result<Transcription, ProviderError> {
    let response: RecognizeResponse = serde_json::from_slice(body)?;
    let alternative = response
        .results
        .into_iter()
        .next()
        .and_then(|r| r.alternatives.into_iter().next())
        .ok_or(ProviderError::NoSpeech)?;

    Ok(Transcription {
        transcript: alternative.transcript,
        confidence: alternative.confidence,
        words: alternative
            .words
            .into_iter()
            .map(|w| WordConfidence {
                word: w.word,
                confidence: w.confidence,
            })
            .collect(),
    })
}

pub fn parse_synthesize_response(body: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let response: SynthesizeResponse = serde_json::from_slice(body)?;
    Ok(STANDARD.decode(response.audio_content)?)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}
