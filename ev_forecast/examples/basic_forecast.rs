//! Forecast EV adoption for the next three years from a short history

use ev_forecast::{forecast_json, run_forecast, AccuracySummary, ForecastRequest, Observation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let history = vec![
        Observation::new(2017, 1200.0, 3_500_000.0),
        Observation::new(2018, 1750.0, 5_300_000.0),
        Observation::new(2019, 2600.0, 7_700_000.0),
        Observation::new(2020, 3300.0, 9_600_000.0),
        Observation::new(2021, 4900.0, 14_800_000.0),
        Observation::new(2022, 6800.0, 20_100_000.0),
    ];
    let sample_size = history.len();

    let request = ForecastRequest::for_year_range(history, 2023, 2025)?;
    let response = run_forecast(&request)?;

    println!(
        "Count model: {} (R² = {:.3})",
        response.model_info.count_model, response.model_info.r2_count
    );
    println!(
        "Demand model: {} (R² = {:.3})",
        response.model_info.demand_model, response.model_info.r2_demand
    );

    for point in &response.results {
        println!(
            "{}: {} EVs [{}, {}], {:.0} kWh",
            point.year,
            point.predicted_count,
            point.confidence_interval_lower,
            point.confidence_interval_upper,
            point.predicted_demand_kwh
        );
    }

    if let Some(summary) = AccuracySummary::from_response(&response, sample_size) {
        println!(
            "MAE {:.1}% of mean, display confidence {}%",
            summary.mae, summary.confidence_level
        );
    }

    // The same computation over JSON documents
    println!("{}", forecast_json(&serde_json::to_string(&request)?));

    Ok(())
}
