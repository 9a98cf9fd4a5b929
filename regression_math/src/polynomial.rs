//! Polynomial feature expansion for a single input column
//!
//! The transform is fit once on historical inputs: it records their mean and
//! population standard deviation and expands each value `x` to
//! `[z, z², …, z^d]` with `z = (x - mean) / std`. The constant column is left
//! to the least squares intercept, so the basis spans the same space as
//! `[1, x, …, x^d]` while staying well conditioned for calendar years.

use crate::stats::{mean, population_std_dev};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// A fitted polynomial feature transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    degree: usize,
    center: f64,
    scale: f64,
}

impl PolynomialFeatures {
    /// Fit a transform of the given degree on the historical inputs
    pub fn fit(degree: usize, inputs: &[f64]) -> Result<Self> {
        if degree == 0 {
            return Err(MathError::InvalidInput(
                "Polynomial degree must be at least 1".to_string(),
            ));
        }
        if inputs.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit polynomial features on an empty input".to_string(),
            ));
        }
        if inputs.iter().any(|x| !x.is_finite()) {
            return Err(MathError::InvalidInput(
                "Polynomial inputs must be finite".to_string(),
            ));
        }

        let center = mean(inputs);
        let spread = population_std_dev(inputs);
        // Constant inputs leave the columns at zero; the fitter reports that as singular.
        let scale = if spread > 0.0 { spread } else { 1.0 };

        Ok(Self {
            degree,
            center,
            scale,
        })
    }

    /// Highest power produced
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Mean of the inputs seen during fit
    pub fn center(&self) -> f64 {
        self.center
    }

    /// Standard deviation of the inputs seen during fit (1 if they were constant)
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Expand one input value
    pub fn transform_one(&self, x: f64) -> Vec<f64> {
        let z = (x - self.center) / self.scale;
        let mut row = Vec::with_capacity(self.degree);
        let mut power = 1.0;
        for _ in 0..self.degree {
            power *= z;
            row.push(power);
        }
        row
    }

    /// Expand every input value
    pub fn transform(&self, inputs: &[f64]) -> Vec<Vec<f64>> {
        inputs.iter().map(|&x| self.transform_one(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn expands_standardised_powers() {
        let poly = PolynomialFeatures::fit(3, &[1.0, 2.0, 3.0]).unwrap();
        let scale = (2.0_f64 / 3.0).sqrt();

        assert_relative_eq!(poly.center(), 2.0);
        assert_relative_eq!(poly.scale(), scale, epsilon = 1e-12);

        let row = poly.transform_one(3.0);
        let z = 1.0 / scale;
        assert_eq!(row.len(), 3);
        assert_relative_eq!(row[0], z, epsilon = 1e-12);
        assert_relative_eq!(row[1], z * z, epsilon = 1e-12);
        assert_relative_eq!(row[2], z * z * z, epsilon = 1e-12);
    }

    #[test]
    fn reuses_historical_statistics_for_new_inputs() {
        let poly = PolynomialFeatures::fit(2, &[2020.0, 2022.0]).unwrap();
        let row = poly.transform_one(2024.0);

        // mean 2021, std 1
        assert_relative_eq!(row[0], 3.0);
        assert_relative_eq!(row[1], 9.0);
    }

    #[test]
    fn constant_inputs_keep_unit_scale() {
        let poly = PolynomialFeatures::fit(2, &[5.0, 5.0]).unwrap();
        assert_relative_eq!(poly.scale(), 1.0);
        assert_eq!(poly.transform_one(5.0), vec![0.0, 0.0]);
    }

    #[test]
    fn rejects_degree_zero_and_empty_inputs() {
        assert!(PolynomialFeatures::fit(0, &[1.0]).is_err());
        assert!(PolynomialFeatures::fit(2, &[]).is_err());
    }
}
