use std::panic::{self, AssertUnwindSafe};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::adaptive::config::AdaptiveConfig;
use crate::adaptive::decision::{CurriculumSampler, DifficultyPolicy};
use crate::adaptive::modeling::{trend, ProfileAggregator, SessionAnalyzer};
use crate::adaptive::types::{
    AdaptiveRecommendation, Adjustment, DifficultyLevel, EncouragementTier, Session,
    SessionMetrics, UserProfile,
};
use crate::adaptive::vocabulary::{activities_for, Vocabulary, GENERIC_ACTIVITIES};
use crate::error::EngineError;

const FALLBACK_CHARACTER_LINE: &str = "Imron and Siti are ready to help!";
const FALLBACK_WORD_COUNT: usize = 3;

/// Joins analysis, difficulty, word selection and pacing into one recommendation.
///
/// Synchronous and owned per caller; the only mutable state is the sampler's RNG.
pub struct AdaptiveEngine<R = ChaCha8Rng> {
    config: AdaptiveConfig,
    analyzer: SessionAnalyzer,
    aggregator: ProfileAggregator,
    policy: DifficultyPolicy,
    sampler: CurriculumSampler<R>,
}

impl AdaptiveEngine<ChaCha8Rng> {
    pub fn new(config: AdaptiveConfig) -> Self {
        let sampler = CurriculumSampler::new(Vocabulary::builtin(), &config.sampler);
        Self::with_sampler(config, sampler)
    }
}

impl Default for AdaptiveEngine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(AdaptiveConfig::default())
    }
}

impl<R: Rng> AdaptiveEngine<R> {
    pub fn with_sampler(config: AdaptiveConfig, sampler: CurriculumSampler<R>) -> Self {
        let analyzer = SessionAnalyzer::new(config.analyzer.clone());
        Self {
            aggregator: ProfileAggregator::new(config.profile.clone()),
            policy: DifficultyPolicy::new(config.difficulty.clone(), analyzer.clone()),
            analyzer,
            sampler,
            config,
        }
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn analyze_session(&self, session: &Session) -> SessionMetrics {
        self.analyzer.analyze(session)
    }

    pub fn update_profile(&self, profile: &UserProfile, sessions: &[Session]) -> UserProfile {
        self.aggregator.aggregate(profile, sessions)
    }

    pub fn decide_difficulty(&self, sessions: &[Session]) -> Adjustment {
        self.policy.decide(sessions)
    }

    pub fn select_words(
        &mut self,
        profile: &UserProfile,
        level: DifficultyLevel,
        count: usize,
    ) -> Vec<String> {
        self.sampler.select_next_words(profile, level, count)
    }

    /// Never fails and never panics outward; any problem yields
    /// [`fallback_recommendation`].
    pub fn recommend(
        &mut self,
        profile: &UserProfile,
        sessions: &[Session],
    ) -> AdaptiveRecommendation {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_recommend(profile, sessions)
        }));

        let err = match outcome {
            Ok(Ok(recommendation)) => return recommendation,
            Ok(Err(err)) => err,
            Err(payload) => EngineError::Panicked(panic_message(payload.as_ref())),
        };

        tracing::warn!(
            error = %err,
            user_id = %profile.user_id,
            "recommendation failed, using fallback"
        );
        fallback_recommendation(profile.current_level)
    }

    pub fn try_recommend(
        &mut self,
        profile: &UserProfile,
        sessions: &[Session],
    ) -> Result<AdaptiveRecommendation, EngineError> {
        if !profile.attention_span.is_finite() {
            return Err(EngineError::NonFiniteValue("attention span"));
        }

        let difficulty_adjustment = self.policy.decide(sessions);
        let target_level = profile.current_level.apply(difficulty_adjustment);

        let next_words =
            self.sampler
                .select_next_words(profile, target_level, self.config.sampler.word_count);

        let recommended_break = self.needs_break(profile, sessions)?;
        let session_duration_minutes = self.session_length(profile);

        let last_score = sessions.last().map(|s| s.mean_score().unwrap_or(0.0));
        let encouragement = EncouragementTier::from_last_score(last_score);

        let learning_activities = activities_for(profile.learning_style)
            .iter()
            .take(self.config.max_activities)
            .map(|a| a.to_string())
            .collect();

        tracing::debug!(
            user_id = %profile.user_id,
            adjustment = difficulty_adjustment.as_str(),
            target_level = target_level.as_str(),
            recommended_break,
            session_duration_minutes,
            "recommendation composed"
        );

        Ok(AdaptiveRecommendation {
            next_words,
            difficulty_adjustment,
            target_level,
            recommended_break,
            session_duration_minutes,
            encouragement,
            character_interaction: encouragement.character_interaction().to_string(),
            learning_activities,
        })
    }

    fn needs_break(&self, profile: &UserProfile, sessions: &[Session]) -> Result<bool, EngineError> {
        let params = &self.config.session_length;
        let start = sessions.len().saturating_sub(params.break_window.max(1));
        let durations: Vec<f64> = sessions[start..].iter().map(|s| s.duration_minutes).collect();

        match trend::mean(&durations) {
            None => Ok(false),
            Some(avg) if !avg.is_finite() => Err(EngineError::NonFiniteValue("session durations")),
            Some(avg) => Ok(avg > profile.attention_span * params.break_factor),
        }
    }

    fn session_length(&self, profile: &UserProfile) -> f64 {
        let base = base_session_minutes(profile.age);
        if profile.attention_span > 0.0 {
            base.min(profile.attention_span * self.config.session_length.attention_factor)
        } else {
            base
        }
    }
}

/// Session length ceiling by age, in minutes.
pub fn base_session_minutes(age: u32) -> f64 {
    match age {
        0..=6 => 5.0,
        7..=8 => 10.0,
        _ => 15.0,
    }
}

/// Safe default served whenever composition fails.
pub fn fallback_recommendation(current_level: DifficultyLevel) -> AdaptiveRecommendation {
    AdaptiveRecommendation {
        next_words: crate::adaptive::decision::curriculum::fallback_words(FALLBACK_WORD_COUNT),
        difficulty_adjustment: Adjustment::Maintain,
        target_level: current_level,
        recommended_break: false,
        session_duration_minutes: AdaptiveConfig::default().session_length.default_minutes,
        encouragement: EncouragementTier::PositiveReinforcement,
        character_interaction: FALLBACK_CHARACTER_LINE.to_string(),
        learning_activities: GENERIC_ACTIVITIES.iter().map(|a| a.to_string()).collect(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
