pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod features;
pub mod types;

pub use error::{DemandError, Result};
pub use types::{DailyObservation, DailySeries, ScoreResult};
