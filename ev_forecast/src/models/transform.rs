//! Feature transforms applied to the year column before fitting

use regression_math::{PolynomialFeatures, Result};
use serde::{Deserialize, Serialize};

/// How a candidate maps the raw year into model features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTransform {
    /// The year is used as-is
    Identity,
    /// The year is expanded to its powers up to `degree`
    Polynomial { degree: usize },
}

impl FeatureTransform {
    /// Fit the transform on the historical years
    pub fn fit(&self, years: &[f64]) -> Result<FittedTransform> {
        match *self {
            FeatureTransform::Identity => Ok(FittedTransform::Identity),
            FeatureTransform::Polynomial { degree } => {
                PolynomialFeatures::fit(degree, years).map(FittedTransform::Polynomial)
            }
        }
    }
}

/// A transform whose parameters were learned from the historical years.
///
/// The same instance builds the design for in-sample scoring and for every
/// future year, so residuals and predictions share one basis.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedTransform {
    Identity,
    Polynomial(PolynomialFeatures),
}

impl FittedTransform {
    /// Map years to feature rows
    pub fn apply(&self, years: &[f64]) -> Vec<Vec<f64>> {
        match self {
            FittedTransform::Identity => years.iter().map(|&year| vec![year]).collect(),
            FittedTransform::Polynomial(poly) => poly.transform(years),
        }
    }

    /// Number of feature columns produced per year
    pub fn n_features(&self) -> usize {
        match self {
            FittedTransform::Identity => 1,
            FittedTransform::Polynomial(poly) => poly.degree(),
        }
    }
}
