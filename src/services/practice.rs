use std::collections::HashMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::adaptive::decision::CurriculumSampler;
use crate::adaptive::engine::fallback_recommendation;
use crate::adaptive::types::{AdaptiveRecommendation, DifficultyLevel, Session, UserProfile};
use crate::adaptive::{AdaptiveConfig, AdaptiveEngine, Vocabulary};
use crate::config::Config;
use crate::providers::{ProfileStore, ProviderError, SpeechSynthesizer, Transcriber, VoiceParams};
use crate::speech::types::{SpeechAnalysis, Transcription};
use crate::speech::{sanitize_text, PronunciationScorer};

/// Age assumed for children seen for the first time without enrollment.
pub const DEFAULT_AGE: u32 = 7;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transcription failed: {0}")]
    Transcription(#[source] ProviderError),
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),
    #[error("speech synthesis is not configured")]
    SynthesisUnavailable,
    #[error("storage failed: {0}")]
    Storage(#[source] ProviderError),
    #[error("prompt text is empty")]
    EmptyPrompt,
}

/// One practice round as the client reports it.
#[derive(Debug, Clone)]
pub struct PracticeRound {
    pub user_id: String,
    pub target_words: Vec<String>,
    pub level: DifficultyLevel,
    pub duration_minutes: f64,
    pub engagement_level: f64,
}

type UserLocks = parking_lot::Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// Holds one child's lock; the map entry is dropped once nobody else wants it.
struct UserGuard<'a> {
    locks: &'a UserLocks,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock();
        if locks
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user_id);
        }
    }
}

/// Ties the ports to the engine. Work on one child's profile is serialized;
/// different children proceed independently, each request on its own engine.
pub struct PracticeService {
    settings: Config,
    voice: VoiceParams,
    adaptive: AdaptiveConfig,
    vocabulary: Vocabulary,
    seeds: parking_lot::Mutex<ChaCha8Rng>,
    scorer: PronunciationScorer,
    store: Arc<dyn ProfileStore>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    user_locks: UserLocks,
}

impl PracticeService {
    /// Word sampling is reproducible when `adaptive.sampler.seed` is set.
    pub fn new(
        settings: Config,
        adaptive: AdaptiveConfig,
        scorer: PronunciationScorer,
        store: Arc<dyn ProfileStore>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        let seeds = match adaptive.sampler.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            voice: VoiceParams::from_config(&settings),
            settings,
            adaptive,
            vocabulary: Vocabulary::builtin(),
            seeds: parking_lot::Mutex::new(seeds),
            scorer,
            store,
            transcriber,
            synthesizer: None,
            user_locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Children with a lock currently held or awaited.
    pub fn active_users(&self) -> usize {
        self.user_locks.lock().len()
    }

    async fn lock_user(&self, user_id: &str) -> UserGuard<'_> {
        let lock = {
            let mut locks = self.user_locks.lock();
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        UserGuard {
            locks: &self.user_locks,
            user_id: user_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    fn engine(&self) -> AdaptiveEngine {
        let seed: u64 = self.seeds.lock().gen();
        let sampler = CurriculumSampler::with_rng(
            self.vocabulary.clone(),
            self.adaptive.sampler.review_divisor,
            ChaCha8Rng::seed_from_u64(seed),
        );
        AdaptiveEngine::with_sampler(self.adaptive.clone(), sampler)
    }

    /// Creates and stores a fresh profile for `user_id`, replacing any existing one.
    pub async fn enroll(&self, user_id: &str, age: u32) -> Result<UserProfile, ServiceError> {
        let _guard = self.lock_user(user_id).await;

        let profile = UserProfile::for_new_user(user_id, age);
        self.store
            .save_profile(&profile)
            .await
            .map_err(ServiceError::Storage)?;
        tracing::info!(user_id, age, level = profile.current_level.as_str(), "child enrolled");
        Ok(profile)
    }

    /// Refreshes the profile from recent history and recommends the next round.
    /// Store failures degrade to the fallback recommendation.
    pub async fn recommend_next(&self, user_id: &str) -> AdaptiveRecommendation {
        let _guard = self.lock_user(user_id).await;

        let profile = match self.store.get_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::for_new_user(user_id, DEFAULT_AGE),
            Err(err) => {
                tracing::warn!(error = %err, user_id, "profile load failed, using fallback");
                return fallback_recommendation(DifficultyLevel::default());
            }
        };

        let sessions = match self
            .store
            .get_recent_sessions(user_id, self.settings.history_window)
            .await
        {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::warn!(error = %err, user_id, "session history load failed, using fallback");
                return fallback_recommendation(profile.current_level);
            }
        };

        let mut engine = self.engine();
        let updated = engine.update_profile(&profile, &sessions);
        let recommendation = engine.recommend(&updated, &sessions);

        if let Err(err) = self.store.save_profile(&updated).await {
            tracing::warn!(error = %err, user_id, "profile save failed");
        }

        tracing::info!(
            user_id,
            adjustment = recommendation.difficulty_adjustment.as_str(),
            target_level = recommendation.target_level.as_str(),
            words = recommendation.next_words.len(),
            "recommendation served"
        );
        recommendation
    }

    /// Transcribes a recording and records the scored round. A recording
    /// without speech is analyzed as such and not recorded.
    pub async fn submit_recording(
        &self,
        round: &PracticeRound,
        audio: &[u8],
    ) -> Result<SpeechAnalysis, ServiceError> {
        match self
            .transcriber
            .transcribe(audio, &self.settings.language_code)
            .await
        {
            Ok(transcription) => self.record_transcription(round, &transcription).await,
            Err(ProviderError::NoSpeech) => {
                tracing::info!(user_id = %round.user_id, "no speech in recording");
                Ok(SpeechAnalysis::no_speech())
            }
            Err(err) => Err(ServiceError::Transcription(err)),
        }
    }

    /// Scores an already transcribed round and appends it to the child's history.
    pub async fn record_transcription(
        &self,
        round: &PracticeRound,
        transcription: &Transcription,
    ) -> Result<SpeechAnalysis, ServiceError> {
        let analysis = self
            .scorer
            .analyze_transcription(transcription, &round.target_words);

        let session = Session::new(
            round.user_id.clone(),
            round.level,
            analysis.attempts(),
            round.duration_minutes,
            round.engagement_level,
        );

        let _guard = self.lock_user(&round.user_id).await;
        self.store
            .append_session(&session)
            .await
            .map_err(ServiceError::Storage)?;

        tracing::info!(
            user_id = %round.user_id,
            session_id = %session.session_id,
            attempts = session.attempts.len(),
            overall_score = analysis.overall_score,
            "practice round recorded"
        );
        Ok(analysis)
    }

    /// Spoken example audio for a prompt.
    pub async fn prompt_audio(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        let text = sanitize_text(text, self.scorer.config().max_prompt_chars);
        if text.is_empty() {
            return Err(ServiceError::EmptyPrompt);
        }
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or(ServiceError::SynthesisUnavailable)?;

        synthesizer
            .synthesize(&text, &self.voice)
            .await
            .map_err(ServiceError::Synthesis)
    }
}
