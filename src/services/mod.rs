pub mod practice;

pub use practice::{PracticeRound, PracticeService, ServiceError};
