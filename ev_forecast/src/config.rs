//! Tunable constants of the forecasting engine

use crate::error::{ForecastError, Result};
use regression_math::ols::DEFAULT_RANK_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Smallest history any candidate can be fit on
pub const MIN_OBSERVATIONS: usize = 2;

/// Engine settings. The defaults reproduce the published behaviour:
/// a 95% normal-approximation band (z = 1.96) and at least two observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForecastConfig {
    /// Multiplier applied to the residual standard deviation
    pub z_score: f64,
    /// Confidence level reported alongside the band
    pub confidence_level: f64,
    /// Relative singular-value cutoff for rejecting a design as singular
    pub rank_tolerance: f64,
    /// Minimum number of historical observations
    pub min_observations: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            z_score: 1.96,
            confidence_level: 0.95,
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
            min_observations: MIN_OBSERVATIONS,
        }
    }
}

impl ForecastConfig {
    /// Check every field is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.z_score > 0.0) || !self.z_score.is_finite() {
            return Err(ForecastError::MalformedInput(
                "z score must be positive and finite".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::MalformedInput(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }
        if !(self.rank_tolerance > 0.0) {
            return Err(ForecastError::MalformedInput(
                "Rank tolerance must be positive".to_string(),
            ));
        }
        if self.min_observations < MIN_OBSERVATIONS {
            return Err(ForecastError::MalformedInput(format!(
                "At least {} observations are needed to fit a model",
                MIN_OBSERVATIONS
            )));
        }
        Ok(())
    }
}
