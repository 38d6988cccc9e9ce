pub mod curriculum;
pub mod difficulty;

pub use curriculum::CurriculumSampler;
pub use difficulty::{DifficultyPolicy, RecentPerformance};
