pub mod config;
pub mod feedback;
pub mod normalize;
pub mod phonetic;
pub mod scorer;
pub mod similarity;
pub mod types;

pub use config::ScoringConfig;
pub use normalize::{normalize_text, sanitize_text};
pub use scorer::PronunciationScorer;
pub use types::{PronunciationResult, PronunciationTier, SpeechAnalysis, Transcription, WordConfidence};
