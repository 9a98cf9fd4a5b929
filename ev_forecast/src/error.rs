//! Error types for the ev_forecast crate

use crate::models::Target;
use regression_math::MathError;
use thiserror::Error;

/// Custom error types for the ev_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer historical observations than a fit needs
    #[error("Insufficient historical data (need at least {required} points, got {actual})")]
    InsufficientData { required: usize, actual: usize },

    /// Request or records missing required fields or carrying invalid values
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Every candidate failed to fit for one target variable
    #[error("No viable model for {target}: every candidate failed to fit")]
    NoViableModel { target: Target },

    /// Error from the regression kernels
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
