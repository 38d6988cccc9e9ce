pub mod adaptive;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod sanitize;
pub mod services;
pub mod speech;

pub use adaptive::{AdaptiveConfig, AdaptiveEngine};
pub use error::EngineError;
pub use speech::{PronunciationScorer, ScoringConfig};
