//! # EV Forecast
//!
//! Forecasts EV adoption and aggregate charging demand from a short yearly
//! history by choosing, per target variable, the best of a fixed set of
//! regression models.
//!
//! ## Pipeline
//!
//! - **Loading**: [`HistoricalDataset`] validates the observations and splits
//!   them into year, count and demand columns
//! - **Selection**: linear, quadratic and cubic least squares fits are scored
//!   by in-sample R², separately for count and demand
//! - **Forecasting**: the winners are evaluated on the requested years
//! - **Uncertainty**: a `1.96 σ` band from the count residuals, with MAE (as a
//!   percentage of the mean count), RMSE and both R² scores
//! - **Assembly**: one [`ForecastPoint`] per year plus a [`ModelInfo`] summary
//!
//! ## Quick Start
//!
//! ```rust
//! use ev_forecast::{run_forecast, ForecastRequest, Observation};
//!
//! let request = ForecastRequest::new(
//!     vec![
//!         Observation::new(2020, 100.0, 5000.0),
//!         Observation::new(2021, 150.0, 7600.0),
//!         Observation::new(2022, 220.0, 11200.0),
//!     ],
//!     vec![2023, 2024],
//! );
//!
//! let response = run_forecast(&request).unwrap();
//! assert_eq!(response.results.len(), 2);
//! ```
//!
//! [`forecast_json`] wraps the same computation for callers that exchange
//! JSON documents: one request in, one response or error object out.

pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod response;
pub mod selection;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{CsvImport, DataLoader, HistoricalDataset, Observation};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{Candidate, CandidateFitFailure, FittedModel, Target, CANDIDATES};
pub use crate::response::{
    AccuracySummary, ForecastOutput, ForecastPoint, ForecastRequest, ForecastResponse, ModelInfo,
};
pub use crate::selection::{select_model, SelectionResult};

use tracing::info;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Run a forecast with the default configuration
pub fn run_forecast(request: &ForecastRequest) -> Result<ForecastResponse> {
    run_forecast_with(request, &ForecastConfig::default())
}

/// Run a forecast with a custom configuration
pub fn run_forecast_with(
    request: &ForecastRequest,
    config: &ForecastConfig,
) -> Result<ForecastResponse> {
    config.validate()?;

    let dataset = HistoricalDataset::with_min_observations(
        &request.historical,
        config.min_observations,
    )?;

    let count = select_model(
        dataset.years(),
        dataset.counts(),
        Target::Count,
        config.rank_tolerance,
    )?;
    let demand = select_model(
        dataset.years(),
        dataset.demands(),
        Target::Demand,
        config.rank_tolerance,
    )?;

    let raw = forecaster::forecast(&count, &demand, &request.future_years)?;
    let estimate = metrics::estimate(&count, &demand, dataset.counts(), config)?;
    let assembled = response::assemble(&count, &demand, &raw, &estimate, config.confidence_level);

    info!(
        observations = dataset.len(),
        years = assembled.results.len(),
        count_model = count.name(),
        demand_model = demand.name(),
        "forecast complete"
    );

    Ok(assembled)
}

/// Run a forecast on a JSON request and return the JSON response.
///
/// Always returns exactly one document: the full response on success, or
/// `{"error": "..."}` for any failure, including an unreadable request.
pub fn forecast_json(input: &str) -> String {
    let output: ForecastOutput = ForecastRequest::from_json(input)
        .and_then(|request| run_forecast(&request))
        .into();

    serde_json::to_string(&output).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Failed to encode response: {}", e) }).to_string()
    })
}
