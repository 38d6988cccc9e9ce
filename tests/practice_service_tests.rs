use std::sync::Arc;

use async_trait::async_trait;
use speech_coach::adaptive::types::{
    Adjustment, DifficultyLevel, EncouragementTier, Session, UserProfile,
};
use speech_coach::adaptive::AdaptiveConfig;
use speech_coach::config::Config;
use speech_coach::providers::{
    InMemoryStore, ProfileStore, ProviderError, SpeechSynthesizer, Transcriber, VoiceParams,
};
use speech_coach::services::{PracticeRound, PracticeService, ServiceError};
use speech_coach::speech::{PronunciationScorer, Transcription};

enum Script {
    Heard(&'static str),
    Silence,
    Outage,
}

struct ScriptedTranscriber(Script);

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _language_code: &str,
    ) -> Result<Transcription, ProviderError> {
        match &self.0 {
            Script::Heard(text) => Ok(Transcription {
                transcript: text.to_string(),
                confidence: 0.9,
                words: Vec::new(),
            }),
            Script::Silence => Err(ProviderError::NoSpeech),
            Script::Outage => Err(ProviderError::NotConfigured("GOOGLE_API_KEY")),
        }
    }
}

struct EchoSynthesizer;

#[async_trait]
impl SpeechSynthesizer for EchoSynthesizer {
    async fn synthesize(&self, text: &str, _voice: &VoiceParams) -> Result<Vec<u8>, ProviderError> {
        Ok(text.as_bytes().to_vec())
    }
}

struct BrokenStore;

#[async_trait]
impl ProfileStore for BrokenStore {
    async fn get_profile(&self, _user_id: &str) -> Result<Option<UserProfile>, ProviderError> {
        Err(ProviderError::Storage("database offline".to_string()))
    }

    async fn save_profile(&self, _profile: &UserProfile) -> Result<(), ProviderError> {
        Err(ProviderError::Storage("database offline".to_string()))
    }

    async fn get_recent_sessions(
        &self,
        _user_id: &str,
        _window: usize,
    ) -> Result<Vec<Session>, ProviderError> {
        Err(ProviderError::Storage("database offline".to_string()))
    }

    async fn append_session(&self, _session: &Session) -> Result<(), ProviderError> {
        Err(ProviderError::Storage("database offline".to_string()))
    }
}

fn adaptive_config() -> AdaptiveConfig {
    let mut config = AdaptiveConfig::default();
    config.sampler.seed = Some(3);
    config
}

fn service(store: Arc<dyn ProfileStore>, script: Script) -> PracticeService {
    PracticeService::new(
        Config::default(),
        adaptive_config(),
        PronunciationScorer::default(),
        store,
        Arc::new(ScriptedTranscriber(script)),
    )
}

fn round(words: &[&str]) -> PracticeRound {
    PracticeRound {
        user_id: "kid".to_string(),
        target_words: words.iter().map(|w| w.to_string()).collect(),
        level: DifficultyLevel::Easy,
        duration_minutes: 6.0,
        engagement_level: 0.9,
    }
}

#[tokio::test]
async fn new_child_gets_welcome_recommendation() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(store.clone(), Script::Silence);

    let recommendation = service.recommend_next("kid").await;
    assert_eq!(recommendation.encouragement, EncouragementTier::WelcomeIntroduction);
    assert_eq!(recommendation.difficulty_adjustment, Adjustment::Maintain);
    assert_eq!(recommendation.next_words.len(), 5);
}

#[tokio::test]
async fn recording_is_scored_and_recorded() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(store.clone(), Script::Heard("mama papa"));
    service.enroll("kid", 6).await.unwrap();

    let analysis = service
        .submit_recording(&round(&["mama", "papa"]), b"webm")
        .await
        .unwrap();

    assert_eq!(analysis.results.len(), 2);
    assert!(analysis.overall_score > 0.9);
    assert_eq!(store.session_count("kid").await, 1);

    let history = store.get_recent_sessions("kid", 10).await.unwrap();
    assert_eq!(history[0].attempts.len(), 2);
    assert_eq!(history[0].difficulty_level, DifficultyLevel::Easy);
}

#[tokio::test]
async fn silence_is_reported_not_recorded() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(store.clone(), Script::Silence);

    let analysis = service
        .submit_recording(&round(&["mama"]), b"webm")
        .await
        .unwrap();

    assert!(analysis.results.is_empty());
    assert_eq!(analysis.overall_score, 0.0);
    assert_eq!(analysis.recommendations.len(), 3);
    assert_eq!(store.session_count("kid").await, 0);
}

#[tokio::test]
async fn transcription_outage_is_an_error() {
    let service = service(Arc::new(InMemoryStore::new()), Script::Outage);
    let result = service.submit_recording(&round(&["mama"]), b"webm").await;
    assert!(matches!(result, Err(ServiceError::Transcription(_))));
}

#[tokio::test]
async fn store_outage_degrades_to_fallback() {
    let service = service(Arc::new(BrokenStore), Script::Silence);
    let recommendation = service.recommend_next("kid").await;

    assert_eq!(recommendation.next_words, vec!["mama", "papa", "air"]);
    assert_eq!(recommendation.encouragement, EncouragementTier::PositiveReinforcement);
    assert_eq!(recommendation.session_duration_minutes, 10.0);
}

#[tokio::test]
async fn recommendations_follow_recorded_progress() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(store.clone(), Script::Silence);
    service.enroll("kid", 7).await.unwrap();

    for _ in 0..5 {
        let transcription = Transcription {
            transcript: "bola susu".to_string(),
            confidence: 1.0,
            words: Vec::new(),
        };
        service
            .record_transcription(&round(&["bola", "susu"]), &transcription)
            .await
            .unwrap();
    }

    let recommendation = service.recommend_next("kid").await;
    assert_eq!(recommendation.difficulty_adjustment, Adjustment::Increase);
    assert_eq!(recommendation.target_level, DifficultyLevel::Medium);

    let profile = store.get_profile("kid").await.unwrap().unwrap();
    assert!(profile.strengths.contains(&"bola".to_string()));
}

#[tokio::test]
async fn concurrent_rounds_for_one_child_are_all_kept() {
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(service(store.clone(), Script::Heard("air")));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.submit_recording(&round(&["air"]), b"webm").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.session_count("kid").await, 8);
}

#[tokio::test]
async fn prompt_audio_needs_a_synthesizer() {
    let plain = service(Arc::new(InMemoryStore::new()), Script::Silence);
    assert!(matches!(
        plain.prompt_audio("mama").await,
        Err(ServiceError::SynthesisUnavailable)
    ));

    let voiced = service(Arc::new(InMemoryStore::new()), Script::Silence)
        .with_synthesizer(Arc::new(EchoSynthesizer));
    assert_eq!(voiced.prompt_audio("  ma\nma ").await.unwrap(), b"ma ma".to_vec());
    assert!(matches!(voiced.prompt_audio(" \n ").await, Err(ServiceError::EmptyPrompt)));
}

#[tokio::test]
async fn idle_children_do_not_keep_lock_entries() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(store.clone(), Script::Heard("air"));

    for child in ["ana", "budi", "citra"] {
        service.enroll(child, 6).await.unwrap();
        service.recommend_next(child).await;
        let mut round = round(&["air"]);
        round.user_id = child.to_string();
        service.submit_recording(&round, b"webm").await.unwrap();
    }

    assert_eq!(service.active_users(), 0);
    assert_eq!(store.session_count("budi").await, 1);
}

#[tokio::test]
async fn children_get_independent_recommendations_concurrently() {
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(service(store.clone(), Script::Silence));

    let mut handles = Vec::new();
    for i in 0..6 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.recommend_next(&format!("kid-{i}")).await
        }));
    }
    for handle in handles {
        let recommendation = handle.await.unwrap();
        assert_eq!(recommendation.next_words.len(), 5);
        assert_eq!(recommendation.target_level, DifficultyLevel::Easy);
    }

    assert_eq!(service.active_users(), 0);
}
