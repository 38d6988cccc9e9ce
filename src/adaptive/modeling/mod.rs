pub mod analytics;
pub mod metrics;
pub mod profile;
pub mod trend;

pub use analytics::{learning_velocity, optimal_study_time, simulate_session};
pub use metrics::SessionAnalyzer;
pub use profile::ProfileAggregator;
