//! Request and response wire types and the response assembler

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::forecaster::RawForecast;
use crate::metrics::UncertaintyEstimate;
use crate::selection::SelectionResult;
use serde::{Deserialize, Serialize};

/// One forecast request: history plus the years to predict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForecastRequest {
    pub historical: Vec<Observation>,
    pub future_years: Vec<i32>,
}

impl ForecastRequest {
    /// Create a request for explicit future years
    pub fn new(historical: Vec<Observation>, future_years: Vec<i32>) -> Self {
        Self {
            historical,
            future_years,
        }
    }

    /// Request every year from `start` to `end`, both included
    pub fn for_year_range(historical: Vec<Observation>, start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ForecastError::MalformedInput(format!(
                "Start year {} is after end year {}",
                start, end
            )));
        }
        Ok(Self::new(historical, (start..=end).collect()))
    }

    /// Request the single year after the latest historical one
    pub fn next_year(historical: Vec<Observation>) -> Result<Self> {
        let last = historical
            .iter()
            .map(|o| o.year)
            .max()
            .ok_or(ForecastError::InsufficientData {
                required: 1,
                actual: 0,
            })?;
        Ok(Self::new(historical, vec![last + 1]))
    }

    /// Parse a JSON request; any decoding problem is malformed input
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| ForecastError::MalformedInput(e.to_string()))
    }
}

/// Prediction for one future year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub year: i32,
    pub predicted_count: u64,
    pub predicted_demand_kwh: f64,
    pub model_used: String,
    pub confidence_interval_lower: u64,
    pub confidence_interval_upper: u64,
    pub r2_score: f64,
    /// Mean absolute error as a percentage of the mean historical count
    pub mae: f64,
    pub rmse: f64,
}

/// Models behind a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub count_model: String,
    pub demand_model: String,
    pub r2_count: f64,
    pub r2_demand: f64,
    pub confidence_level: f64,
}

/// Successful forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub results: Vec<ForecastPoint>,
    pub model_info: ModelInfo,
}

/// Failed forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Exactly one of a full response or a single error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastOutput {
    Success(ForecastResponse),
    Failure(ErrorResponse),
}

impl From<Result<ForecastResponse>> for ForecastOutput {
    fn from(result: Result<ForecastResponse>) -> Self {
        match result {
            Ok(response) => ForecastOutput::Success(response),
            Err(err) => ForecastOutput::Failure(ErrorResponse {
                error: err.to_string(),
            }),
        }
    }
}

/// Clamp a raw count prediction: truncate toward zero, never negative
fn clamp_count(raw: f64) -> u64 {
    if raw.is_finite() {
        raw.trunc().max(0.0) as u64
    } else {
        0
    }
}

/// Clamp a raw demand prediction at zero, keeping the fraction
fn clamp_demand(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.max(0.0)
    } else {
        0.0
    }
}

/// Merge predictions, band and metrics into the response
pub fn assemble(
    count: &SelectionResult,
    demand: &SelectionResult,
    forecast: &RawForecast,
    estimate: &UncertaintyEstimate,
    confidence_level: f64,
) -> ForecastResponse {
    let metrics = estimate.metrics;

    let results = forecast
        .years
        .iter()
        .zip(forecast.counts.iter().zip(&forecast.demands))
        .map(|(&year, (&raw_count, &raw_demand))| {
            let predicted_count = clamp_count(raw_count);
            let (lower, upper) = estimate.band.bounds(predicted_count);

            ForecastPoint {
                year,
                predicted_count,
                predicted_demand_kwh: clamp_demand(raw_demand),
                model_used: count.name().to_string(),
                confidence_interval_lower: lower,
                confidence_interval_upper: upper,
                r2_score: metrics.r2_count,
                mae: metrics.mae_percent,
                rmse: metrics.rmse,
            }
        })
        .collect();

    ForecastResponse {
        results,
        model_info: ModelInfo {
            count_model: count.name().to_string(),
            demand_model: demand.name().to_string(),
            r2_count: metrics.r2_count,
            r2_demand: metrics.r2_demand,
            confidence_level,
        },
    }
}

/// Headline accuracy figures for display, taken from the first forecast point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracySummary {
    /// MAE percentage rounded to one decimal
    pub mae: f64,
    /// R² rounded to two decimals
    pub r2_score: f64,
    /// R² as a percentage, held within 70..=95
    pub confidence_level: u8,
    /// Number of historical observations behind the fit
    pub sample_size: usize,
}

impl AccuracySummary {
    /// Summarise a response; `None` when it has no forecast points
    pub fn from_response(response: &ForecastResponse, sample_size: usize) -> Option<Self> {
        let first = response.results.first()?;
        let percent = (first.r2_score * 100.0).round().clamp(70.0, 95.0);

        Some(Self {
            mae: (first.mae * 10.0).round() / 10.0,
            r2_score: (first.r2_score * 100.0).round() / 100.0,
            confidence_level: percent as u8,
            sample_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn count_clamp_truncates_toward_zero() {
        assert_eq!(clamp_count(309.9999), 309);
        assert_eq!(clamp_count(-12.5), 0);
        assert_eq!(clamp_count(f64::NAN), 0);
    }

    #[test]
    fn demand_clamp_keeps_fraction() {
        assert_eq!(clamp_demand(1234.5), 1234.5);
        assert_eq!(clamp_demand(-3.0), 0.0);
    }

    #[test]
    fn year_range_is_inclusive() {
        let request = ForecastRequest::for_year_range(Vec::new(), 2025, 2027).unwrap();
        assert_eq!(request.future_years, vec![2025, 2026, 2027]);
        assert!(ForecastRequest::for_year_range(Vec::new(), 2027, 2025).is_err());
    }

    #[test]
    fn next_year_follows_latest_observation() {
        let history = vec![
            Observation::new(2022, 5.0, 50.0),
            Observation::new(2020, 1.0, 10.0),
        ];
        let request = ForecastRequest::next_year(history).unwrap();
        assert_eq!(request.future_years, vec![2023]);
    }

    #[test]
    fn error_output_serialises_to_single_key() {
        let output = ForecastOutput::from(Err::<ForecastResponse, _>(
            ForecastError::MalformedInput("bad".to_string()),
        ));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Malformed input: bad"}));
    }

    fn single_point_response(r2_score: f64, mae: f64) -> ForecastResponse {
        ForecastResponse {
            results: vec![ForecastPoint {
                year: 2025,
                predicted_count: 10,
                predicted_demand_kwh: 1.0,
                model_used: "Linear Regression".to_string(),
                confidence_interval_lower: 8,
                confidence_interval_upper: 12,
                r2_score,
                mae,
                rmse: 1.0,
            }],
            model_info: ModelInfo {
                count_model: "Linear Regression".to_string(),
                demand_model: "Linear Regression".to_string(),
                r2_count: r2_score,
                r2_demand: 0.9,
                confidence_level: 0.95,
            },
        }
    }

    #[test]
    fn accuracy_summary_rounds_and_clamps() {
        let response = single_point_response(0.98765, 3.456);

        let summary = AccuracySummary::from_response(&response, 4).unwrap();
        assert_eq!(summary.mae, 3.5);
        assert_eq!(summary.r2_score, 0.99);
        assert_eq!(summary.confidence_level, 95);
        assert_eq!(summary.sample_size, 4);

        let empty = ForecastResponse {
            results: Vec::new(),
            ..response
        };
        assert_eq!(AccuracySummary::from_response(&empty, 4), None);
    }

    #[test]
    fn accuracy_summary_clamps_poor_fit_to_seventy() {
        let summary = AccuracySummary::from_response(&single_point_response(0.42, 12.34), 6).unwrap();
        assert_eq!(summary.mae, 12.3);
        assert_eq!(summary.r2_score, 0.42);
        assert_eq!(summary.confidence_level, 70);
        assert_eq!(summary.sample_size, 6);
    }
}
