/// Process-level settings. Algorithm parameters live in
/// [`crate::adaptive::AdaptiveConfig`] and [`crate::speech::ScoringConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// BCP-47 code passed to the transcription provider.
    pub language_code: String,
    pub voice_name: String,
    pub speaking_rate: f64,
    /// Sessions fetched from the store per recommendation.
    pub history_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            language_code: "id-ID".to_string(),
            voice_name: "id-ID-Standard-A".to_string(),
            speaking_rate: 0.9,
            history_window: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let language_code =
            std::env::var("SPEECH_COACH_LANGUAGE").unwrap_or(defaults.language_code);
        let voice_name = std::env::var("SPEECH_COACH_VOICE").unwrap_or(defaults.voice_name);
        let speaking_rate = std::env::var("SPEECH_COACH_SPEAKING_RATE")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(defaults.speaking_rate);
        let history_window = std::env::var("SPEECH_COACH_HISTORY_WINDOW")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(defaults.history_window);

        Self {
            log_level,
            language_code,
            voice_name,
            speaking_rate,
            history_window,
        }
    }
}
