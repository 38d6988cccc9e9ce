pub mod config;
pub mod decision;
pub mod engine;
pub mod modeling;
pub mod types;
pub mod vocabulary;

pub use config::AdaptiveConfig;
pub use engine::{fallback_recommendation, AdaptiveEngine};
pub use types::*;
pub use vocabulary::Vocabulary;
