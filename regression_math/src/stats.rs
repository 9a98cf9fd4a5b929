//! Descriptive statistics and goodness-of-fit measures

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Rounding allowance, in ulps of the target level, for a centred value
const CENTRING_ULPS: f64 = 4.0;

/// Relative deviation under which predictions reproduce a constant target
const CONSTANT_FIT_TOLERANCE: f64 = 1e-9;

/// Arithmetic mean (NaN for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation (divides by `n`, not `n - 1`)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().population_std_dev()
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Fit statistics need at least one observation".to_string(),
        ));
    }
    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual ({}) and predicted ({}) values differ in length",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

/// Residuals `actual - predicted`
pub fn residuals(actual: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
    check_lengths(actual, predicted)?;
    Ok(actual.iter().zip(predicted).map(|(a, p)| a - p).collect())
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// When the target has no variance the ratio is undefined; the result is
/// then 1 if the predictions also reproduce it exactly and 0 otherwise.
/// "No variance" means `SS_tot` is within the rounding error of centring,
/// so a small spread around a large level still scores normally.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let y_mean = mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - y_mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if !ss_res.is_finite() {
        return Err(MathError::CalculationError(
            "Residual sum of squares is not finite".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let level = y_mean.abs().max(1.0);
    let rounding = CENTRING_ULPS * f64::EPSILON * level;
    if ss_tot <= n * rounding * rounding {
        let fit = CONSTANT_FIT_TOLERANCE * level;
        return Ok(if ss_res <= n * fit * fit { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let errors = residuals(actual, predicted)?;
    Ok(errors.iter().map(|e| e.abs()).mean())
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let errors = residuals(actual, predicted)?;
    Ok(errors.iter().map(|e| e * e).mean().sqrt())
}
