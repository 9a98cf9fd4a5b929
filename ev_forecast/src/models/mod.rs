//! Candidate regression models
//!
//! The candidate set is a fixed, ordered list of strategy descriptors. Each
//! one pairs a display name with a [`FeatureTransform`]; fitting is ordinary
//! least squares with an intercept on the transformed years. Order matters:
//! when two candidates score the same, the earlier one is kept.

use regression_math::{fit_ols, MathError, OlsFit};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod transform;

pub use transform::{FeatureTransform, FittedTransform};

/// The quantity a model is fit against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    /// Number of EVs
    Count,
    /// Aggregate charging demand in kWh
    Demand,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Count => write!(f, "EV count"),
            Target::Demand => write!(f, "charging demand"),
        }
    }
}

/// A regression strategy in the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    name: &'static str,
    transform: FeatureTransform,
}

/// Candidates in evaluation order
pub const CANDIDATES: [Candidate; 3] = [
    Candidate::new("Linear Regression", FeatureTransform::Identity),
    Candidate::new(
        "Polynomial Regression (degree 2)",
        FeatureTransform::Polynomial { degree: 2 },
    ),
    Candidate::new(
        "Polynomial Regression (degree 3)",
        FeatureTransform::Polynomial { degree: 3 },
    ),
];

/// A candidate that could not be fit; the selector skips it
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{candidate} failed to fit: {reason}")]
pub struct CandidateFitFailure {
    /// Name of the candidate
    pub candidate: &'static str,
    /// Numerical cause
    pub reason: MathError,
}

impl Candidate {
    /// Create a candidate descriptor
    pub const fn new(name: &'static str, transform: FeatureTransform) -> Self {
        Self { name, transform }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Feature transform descriptor
    pub fn transform(&self) -> FeatureTransform {
        self.transform
    }

    /// Fit the candidate on historical years and one target column
    pub fn fit(
        &self,
        years: &[f64],
        target: &[f64],
        rank_tolerance: f64,
    ) -> Result<FittedModel, CandidateFitFailure> {
        let failure = |reason| CandidateFitFailure {
            candidate: self.name,
            reason,
        };

        let transform = self.transform.fit(years).map_err(failure)?;
        let design = transform.apply(years);
        let ols = fit_ols(&design, target, rank_tolerance).map_err(failure)?;

        Ok(FittedModel {
            name: self.name,
            transform,
            ols,
        })
    }
}

/// Coefficients learned for one (candidate, target) pair; immutable once fit
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    name: &'static str,
    transform: FittedTransform,
    ols: OlsFit,
}

impl FittedModel {
    /// Name of the candidate this model was fit from
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Transform fit on the historical years
    pub fn transform(&self) -> &FittedTransform {
        &self.transform
    }

    /// Learned least squares coefficients
    pub fn coefficients(&self) -> &OlsFit {
        &self.ols
    }

    /// Raw predictions for the given years, before any clamping
    pub fn predict(&self, years: &[f64]) -> Result<Vec<f64>, MathError> {
        self.ols.predict(&self.transform.apply(years))
    }
}
