//! Out-of-sample point predictions from the selected models

use crate::error::Result;
use crate::selection::SelectionResult;

/// Raw predictions for the requested years, before clamping
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    /// Requested years in request order
    pub years: Vec<i32>,
    /// Predicted EV counts
    pub counts: Vec<f64>,
    /// Predicted charging demand in kWh
    pub demands: Vec<f64>,
}

/// Evaluate both selected models on the future years.
///
/// Each model applies the transform it was fit with; nothing is refit here.
pub fn forecast(
    count: &SelectionResult,
    demand: &SelectionResult,
    future_years: &[i32],
) -> Result<RawForecast> {
    let inputs: Vec<f64> = future_years.iter().map(|&y| f64::from(y)).collect();

    let counts = count.model().predict(&inputs)?;
    let demands = demand.model().predict(&inputs)?;

    Ok(RawForecast {
        years: future_years.to_vec(),
        counts,
        demands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Target;
    use crate::selection::select_model;
    use approx::assert_relative_eq;
    use regression_math::ols::DEFAULT_RANK_TOLERANCE;

    #[test]
    fn extends_linear_trend() {
        let years = [2020.0, 2021.0, 2022.0, 2023.0];
        let count = select_model(
            &years,
            &[10.0, 20.0, 30.0, 40.0],
            Target::Count,
            DEFAULT_RANK_TOLERANCE,
        )
        .unwrap();
        let demand = select_model(
            &years,
            &[5.0, 5.0, 5.0, 5.0],
            Target::Demand,
            DEFAULT_RANK_TOLERANCE,
        )
        .unwrap();

        let raw = forecast(&count, &demand, &[2024, 2026]).unwrap();
        assert_eq!(raw.years, vec![2024, 2026]);
        assert_relative_eq!(raw.counts[0], 50.0, epsilon = 1e-6);
        assert_relative_eq!(raw.counts[1], 70.0, epsilon = 1e-6);
        assert_relative_eq!(raw.demands[1], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn empty_request_yields_empty_forecast() {
        let years = [2020.0, 2021.0];
        let count = select_model(&years, &[1.0, 2.0], Target::Count, DEFAULT_RANK_TOLERANCE)
            .unwrap();
        let raw = forecast(&count, &count, &[]).unwrap();
        assert!(raw.counts.is_empty());
        assert!(raw.demands.is_empty());
    }
}
