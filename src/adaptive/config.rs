use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerParams {
    /// Multiplier applied to the per-attempt slope before clamping to [-1, 1].
    pub trend_scale: f64,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self { trend_scale: 10.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileParams {
    pub history_window: usize,
    pub style_window: usize,
    pub mastery_threshold: f64,
    pub weakness_threshold: f64,
    pub max_listed_words: usize,
    pub engaged_threshold: f64,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            history_window: 10,
            style_window: 5,
            mastery_threshold: 0.8,
            weakness_threshold: 0.5,
            max_listed_words: 20,
            engaged_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyThresholds {
    pub window: usize,
    pub increase_min_score: f64,
    pub increase_min_engagement: f64,
    pub increase_max_appropriateness: f64,
    pub decrease_max_score: f64,
    pub decrease_max_engagement: f64,
    pub sweet_spot_min_score: f64,
    pub sweet_spot_max_score: f64,
    pub sweet_spot_min_engagement: f64,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        Self {
            window: 5,
            increase_min_score: 0.85,
            increase_min_engagement: 0.7,
            increase_max_appropriateness: 0.5,
            decrease_max_score: 0.4,
            decrease_max_engagement: 0.3,
            sweet_spot_min_score: 0.6,
            sweet_spot_max_score: 0.8,
            sweet_spot_min_engagement: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerParams {
    pub word_count: usize,
    /// Review words are capped at `max(1, word_count / review_divisor)`.
    pub review_divisor: usize,
    pub seed: Option<u64>,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            word_count: 5,
            review_divisor: 3,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLengthParams {
    pub break_window: usize,
    pub break_factor: f64,
    pub attention_factor: f64,
    pub default_minutes: f64,
}

impl Default for SessionLengthParams {
    fn default() -> Self {
        Self {
            break_window: 3,
            break_factor: 1.5,
            attention_factor: 0.8,
            default_minutes: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub analyzer: AnalyzerParams,
    pub profile: ProfileParams,
    pub difficulty: DifficultyThresholds,
    pub sampler: SamplerParams,
    pub session_length: SessionLengthParams,
    pub max_activities: usize,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerParams::default(),
            profile: ProfileParams::default(),
            difficulty: DifficultyThresholds::default(),
            sampler: SamplerParams::default(),
            session_length: SessionLengthParams::default(),
            max_activities: 3,
        }
    }
}

impl AdaptiveConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SPEECH_COACH_WORD_COUNT") {
            config.sampler.word_count = val.parse().unwrap_or(config.sampler.word_count);
        }
        if let Ok(val) = std::env::var("SPEECH_COACH_SAMPLER_SEED") {
            config.sampler.seed = val.parse().ok();
        }
        if let Ok(val) = std::env::var("SPEECH_COACH_MASTERY_THRESHOLD") {
            config.profile.mastery_threshold =
                val.parse().unwrap_or(config.profile.mastery_threshold);
        }
        if let Ok(val) = std::env::var("SPEECH_COACH_HISTORY_WINDOW") {
            config.profile.history_window = val.parse().unwrap_or(config.profile.history_window);
        }

        config
    }
}
