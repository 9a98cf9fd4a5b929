//! # Regression Math
//!
//! Numeric building blocks for fitting small regression models.
//! This crate provides ordinary least squares with an intercept, a
//! polynomial feature transform and the fit statistics used to compare
//! models (R², MAE, RMSE).

use thiserror::Error;

pub mod ols;
pub mod polynomial;
pub mod stats;

pub use ols::{fit_ols, OlsFit};
pub use polynomial::PolynomialFeatures;

/// Errors that can occur in regression calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular design matrix: {0}")]
    SingularMatrix(String),

    #[error("Underdetermined system: {rows} observations for {columns} parameters")]
    Underdetermined { rows: usize, columns: usize },

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for regression math operations
pub type Result<T> = std::result::Result<T, MathError>;
