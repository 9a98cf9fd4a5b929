//! Confidence band and fit-quality metrics of the selected models
//!
//! All figures come from the in-sample residuals of the winning count model.
//! Demand has no published band; only its R² is reported.

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::selection::SelectionResult;
use regression_math::stats;

/// Symmetric band of `z × σ` around a predicted count, σ being the
/// population standard deviation of the count residuals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBand {
    half_width: f64,
}

impl ConfidenceBand {
    /// Band from in-sample residuals and a normal quantile
    pub fn from_residuals(residuals: &[f64], z_score: f64) -> Self {
        let sigma = stats::population_std_dev(residuals);
        let half_width = if sigma.is_finite() { z_score * sigma } else { 0.0 };
        Self { half_width }
    }

    /// Distance from the prediction to either bound
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Rounded `(lower, upper)` around an emitted count; the lower bound
    /// stops at zero.
    pub fn bounds(&self, predicted_count: u64) -> (u64, u64) {
        let center = predicted_count as f64;
        let lower = (center - self.half_width).round().max(0.0);
        let upper = (center + self.half_width).round();
        (lower as u64, upper as u64)
    }
}

/// Fit-quality figures shared by every forecast point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    /// R² of the winning count model
    pub r2_count: f64,
    /// R² of the winning demand model
    pub r2_demand: f64,
    /// MAE of the count model as a percentage of the mean historical count
    pub mae_percent: f64,
    /// RMSE of the count model, in vehicles
    pub rmse: f64,
}

/// Everything the estimator derives from the historical fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyEstimate {
    pub band: ConfidenceBand,
    pub metrics: FitMetrics,
}

/// In-sample fitted values `actual - residual`
fn fitted_values(actual: &[f64], residuals: &[f64]) -> Vec<f64> {
    actual.iter().zip(residuals).map(|(a, r)| a - r).collect()
}

/// MAE re-expressed against the mean of the actual values; 0 when that mean is 0
pub fn mae_percent_of_mean(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let mae = stats::mean_absolute_error(actual, predicted)?;
    let mean = stats::mean(actual);
    if mean == 0.0 || !mean.is_finite() {
        Ok(0.0)
    } else {
        Ok(mae / mean * 100.0)
    }
}

/// Derive the band and metrics from both selections
pub fn estimate(
    count: &SelectionResult,
    demand: &SelectionResult,
    historical_counts: &[f64],
    config: &ForecastConfig,
) -> Result<UncertaintyEstimate> {
    let residuals = count.residuals();
    let predicted = fitted_values(historical_counts, residuals);

    Ok(UncertaintyEstimate {
        band: ConfidenceBand::from_residuals(residuals, config.z_score),
        metrics: FitMetrics {
            r2_count: count.r2(),
            r2_demand: demand.r2(),
            mae_percent: mae_percent_of_mean(historical_counts, &predicted)?,
            rmse: stats::root_mean_squared_error(historical_counts, &predicted)?,
        },
    })
}
