use thiserror::Error;

/// Failures inside the adaptive engine. Only the `try_*` entry points return
/// them; the plain wrappers log and swap in the component's fallback value.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("non-finite value in {0}")]
    NonFiniteValue(&'static str),
    #[error("no words available for level {0}")]
    EmptyVocabulary(&'static str),
    #[error("session history is empty")]
    EmptyHistory,
    #[error("recommendation pipeline panicked: {0}")]
    Panicked(String),
}
