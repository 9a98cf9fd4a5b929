//! Ordinary least squares with an intercept
//!
//! Feature columns and the target are centred before solving, so the
//! intercept is recovered from the means and never enters the design
//! matrix. The centred system is solved through an SVD, which also gives
//! the singular values used to reject rank-deficient designs.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Default relative cutoff on singular values below which a design is singular
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// Coefficients learned by [`fit_ols`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl OlsFit {
    /// Intercept term
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Slope coefficients, one per feature column
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of feature columns the fit expects
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluate the fitted model on one feature row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature row has {} columns, model expects {}",
                row.len(),
                self.coefficients.len()
            )));
        }

        Ok(self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, b)| x * b)
                .sum::<f64>())
    }

    /// Evaluate the fitted model on every row
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

/// Fit `target ≈ intercept + rows · β` by ordinary least squares.
///
/// `rows` holds one feature vector per observation. Fails with
/// [`MathError::Underdetermined`] when there are fewer observations than
/// parameters (features plus intercept), and with
/// [`MathError::SingularMatrix`] when the smallest singular value of the
/// centred design falls below `rank_tolerance` times the largest.
pub fn fit_ols(rows: &[Vec<f64>], target: &[f64], rank_tolerance: f64) -> Result<OlsFit> {
    let n = rows.len();
    if n == 0 {
        return Err(MathError::InsufficientData(
            "Cannot fit a model without observations".to_string(),
        ));
    }
    if target.len() != n {
        return Err(MathError::InvalidInput(format!(
            "Feature rows ({}) and target ({}) differ in length",
            n,
            target.len()
        )));
    }
    if !(rank_tolerance > 0.0) {
        return Err(MathError::InvalidInput(
            "Rank tolerance must be positive".to_string(),
        ));
    }

    let p = rows[0].len();
    if rows.iter().any(|row| row.len() != p) {
        return Err(MathError::InvalidInput(
            "Feature rows must all have the same number of columns".to_string(),
        ));
    }
    if rows.iter().flatten().chain(target).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Features and target must be finite".to_string(),
        ));
    }

    let y_mean = target.iter().sum::<f64>() / n as f64;
    if p == 0 {
        return Ok(OlsFit {
            intercept: y_mean,
            coefficients: Vec::new(),
        });
    }

    if n < p + 1 {
        return Err(MathError::Underdetermined {
            rows: n,
            columns: p + 1,
        });
    }

    let x_means: Vec<f64> = (0..p)
        .map(|j| rows.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();

    let x = DMatrix::from_fn(n, p, |i, j| rows[i][j] - x_means[j]);
    let y = DVector::from_iterator(n, target.iter().map(|v| v - y_mean));

    let svd = x.svd(true, true);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let sigma_min = svd
        .singular_values
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);

    if sigma_max <= 0.0 || sigma_min <= rank_tolerance * sigma_max {
        return Err(MathError::SingularMatrix(format!(
            "smallest singular value {:.3e} against largest {:.3e}",
            sigma_min, sigma_max
        )));
    }

    let beta = svd
        .solve(&y, rank_tolerance * sigma_max)
        .map_err(|e| MathError::CalculationError(e.to_string()))?;

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(MathError::CalculationError(
            "Least squares produced non-finite coefficients".to_string(),
        ));
    }

    let coefficients: Vec<f64> = beta.iter().cloned().collect();
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&x_means)
            .map(|(b, m)| b * m)
            .sum::<f64>();

    Ok(OlsFit {
        intercept,
        coefficients,
    })
}
