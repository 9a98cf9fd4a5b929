//! Best-model selection per target variable
//!
//! Every candidate is fit on the history, scored by in-sample R², and the
//! highest score wins. A candidate that cannot be fit is recorded as a
//! [`CandidateOutcome::Failed`] and skipped; selection fails only when no
//! candidate survives.

use crate::error::{ForecastError, Result};
use crate::models::{Candidate, CandidateFitFailure, FittedModel, Target, CANDIDATES};
use regression_math::stats;
use tracing::debug;

/// What happened when one candidate was evaluated
#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    /// The candidate was fit and scored
    Fitted {
        model: FittedModel,
        r2: f64,
        residuals: Vec<f64>,
    },
    /// The candidate could not be fit
    Failed(CandidateFitFailure),
}

/// The winning model for one target variable
#[derive(Debug, Clone)]
pub struct SelectionResult {
    target: Target,
    model: FittedModel,
    r2: f64,
    residuals: Vec<f64>,
    skipped: Vec<CandidateFitFailure>,
}

impl SelectionResult {
    /// Target variable the model was selected for
    pub fn target(&self) -> Target {
        self.target
    }

    /// Winning fitted model, including its fitted transform
    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    /// Name of the winning candidate
    pub fn name(&self) -> &'static str {
        self.model.name()
    }

    /// In-sample R² of the winner
    pub fn r2(&self) -> f64 {
        self.r2
    }

    /// In-sample residuals (actual - predicted) of the winner, in input order
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Candidates that failed to fit
    pub fn skipped(&self) -> &[CandidateFitFailure] {
        &self.skipped
    }
}

/// Fit and score one candidate against one target column
pub fn evaluate_candidate(
    candidate: &Candidate,
    years: &[f64],
    target: &[f64],
    rank_tolerance: f64,
) -> CandidateOutcome {
    let failure = |reason| {
        CandidateOutcome::Failed(CandidateFitFailure {
            candidate: candidate.name(),
            reason,
        })
    };

    let model = match candidate.fit(years, target, rank_tolerance) {
        Ok(model) => model,
        Err(fit_failure) => return CandidateOutcome::Failed(fit_failure),
    };

    let scored = model.predict(years).and_then(|predicted| {
        let r2 = stats::r_squared(target, &predicted)?;
        let residuals = stats::residuals(target, &predicted)?;
        Ok((r2, residuals))
    });

    match scored {
        Ok((r2, residuals)) => CandidateOutcome::Fitted {
            model,
            r2,
            residuals,
        },
        Err(reason) => failure(reason),
    }
}

/// Select the best of [`CANDIDATES`] for one target
pub fn select_model(
    years: &[f64],
    values: &[f64],
    target: Target,
    rank_tolerance: f64,
) -> Result<SelectionResult> {
    select_from(&CANDIDATES, years, values, target, rank_tolerance)
}

/// Select the best of `candidates` for one target.
///
/// Only a strictly higher R² replaces the current best, so ties keep the
/// candidate declared first.
pub fn select_from(
    candidates: &[Candidate],
    years: &[f64],
    values: &[f64],
    target: Target,
    rank_tolerance: f64,
) -> Result<SelectionResult> {
    let mut best: Option<(FittedModel, f64, Vec<f64>)> = None;
    let mut skipped = Vec::new();

    for candidate in candidates {
        match evaluate_candidate(candidate, years, values, rank_tolerance) {
            CandidateOutcome::Fitted {
                model,
                r2,
                residuals,
            } => {
                debug!(%target, candidate = candidate.name(), r2, "candidate fitted");
                let better = match &best {
                    Some((_, best_r2, _)) => r2 > *best_r2,
                    None => true,
                };
                if better {
                    best = Some((model, r2, residuals));
                }
            }
            CandidateOutcome::Failed(failure) => {
                debug!(%target, candidate = candidate.name(), reason = %failure.reason, "candidate skipped");
                skipped.push(failure);
            }
        }
    }

    let (model, r2, residuals) = best.ok_or(ForecastError::NoViableModel { target })?;
    debug!(%target, model = model.name(), r2, "model selected");

    Ok(SelectionResult {
        target,
        model,
        r2,
        residuals,
        skipped,
    })
}
