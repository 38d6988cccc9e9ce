use serde::{Deserialize, Serialize};

/// Substitutions for sound confusions common in young Indonesian speakers,
/// applied in order.
pub const DEFAULT_PHONETIC_RULES: [(&str, &str); 5] =
    [("th", "t"), ("f", "p"), ("v", "b"), ("z", "s"), ("ch", "c")];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub similarity_weight: f64,
    pub confidence_weight: f64,
    /// Below this recognizer confidence, audio-quality tips are added.
    pub low_confidence_threshold: f64,
    pub phonetic_rules: Vec<(String, String)>,
    /// Upper bound on characters sent to speech synthesis.
    pub max_prompt_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.7,
            confidence_weight: 0.3,
            low_confidence_threshold: 0.6,
            phonetic_rules: DEFAULT_PHONETIC_RULES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            max_prompt_chars: 500,
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SPEECH_COACH_SIMILARITY_WEIGHT") {
            if let Ok(weight) = val.parse::<f64>() {
                if (0.0..=1.0).contains(&weight) {
                    config.similarity_weight = weight;
                    config.confidence_weight = 1.0 - weight;
                }
            }
        }
        if let Ok(val) = std::env::var("SPEECH_COACH_LOW_CONFIDENCE") {
            config.low_confidence_threshold =
                val.parse().unwrap_or(config.low_confidence_threshold);
        }

        config
    }
}
