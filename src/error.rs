use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemandError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DemandError>;
