//! # EV Forecast Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`ev_forecast`]: model selection and forecasting of EV counts and charging demand
//! - [`regression_math`]: least squares, polynomial features and fit statistics
//!
//! ## Example
//!
//! ```
//! use ev_forecast_workspace::{forecast_json, CANDIDATES};
//!
//! let output = forecast_json(r#"{"historical": [], "futureYears": [2030]}"#);
//! assert!(output.contains("error"));
//! assert_eq!(CANDIDATES.len(), 3);
//! ```

pub use ev_forecast;
pub use regression_math;

pub use ev_forecast::{
    forecast_json, run_forecast, run_forecast_with, ForecastConfig, ForecastError,
    ForecastOutput, ForecastRequest, ForecastResponse, Observation, CANDIDATES,
};
