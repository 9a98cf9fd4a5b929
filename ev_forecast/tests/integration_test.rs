use ev_forecast::{
    forecast_json, run_forecast, run_forecast_with, ForecastConfig, ForecastError, ForecastOutput,
    ForecastRequest, Observation, CANDIDATES,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn growth_history() -> Vec<Observation> {
    vec![
        Observation::new(2020, 100.0, 5000.0),
        Observation::new(2021, 150.0, 7600.0),
        Observation::new(2022, 220.0, 11200.0),
    ]
}

fn noisy_history() -> Vec<Observation> {
    vec![
        Observation::new(2016, 12.0, 900.0),
        Observation::new(2017, 30.0, 2100.0),
        Observation::new(2018, 41.0, 2600.0),
        Observation::new(2019, 70.0, 4800.0),
        Observation::new(2020, 77.0, 5100.0),
        Observation::new(2021, 118.0, 8300.0),
        Observation::new(2022, 131.0, 8800.0),
    ]
}

#[test]
fn test_full_forecast_workflow() {
    let request = ForecastRequest::new(growth_history(), vec![2023, 2024]);
    let response = run_forecast(&request).unwrap();

    assert_eq!(response.results.len(), 2);
    let first = &response.results[0];
    let second = &response.results[1];

    assert_eq!(first.year, 2023);
    assert_eq!(second.year, 2024);
    assert!(second.predicted_count > first.predicted_count);
    assert!(first.predicted_demand_kwh > 0.0);
    assert!(second.predicted_demand_kwh > 0.0);

    let names: Vec<_> = CANDIDATES.iter().map(|c| c.name()).collect();
    assert!(names.contains(&first.model_used.as_str()));
    assert_eq!(first.model_used, second.model_used);
    assert_eq!(first.model_used, response.model_info.count_model);
    assert!(names.contains(&response.model_info.demand_model.as_str()));
    assert_eq!(response.model_info.confidence_level, 0.95);
}

#[test]
fn test_quadratic_growth_is_recovered() {
    let request = ForecastRequest::new(growth_history(), vec![2023, 2024]);
    let response = run_forecast(&request).unwrap();

    // Three points fit a parabola exactly; the cubic has too many parameters.
    assert_eq!(
        response.model_info.count_model,
        "Polynomial Regression (degree 2)"
    );
    assert!(response.model_info.r2_count > 0.999_999);

    let first = &response.results[0];
    assert!((309..=310).contains(&first.predicted_count));
    assert!((first.predicted_demand_kwh - 15800.0).abs() < 1e-3);
}

#[test]
fn test_shared_metrics_across_points() {
    let request = ForecastRequest::for_year_range(noisy_history(), 2023, 2027).unwrap();
    let response = run_forecast(&request).unwrap();

    assert_eq!(response.results.len(), 5);
    let first = &response.results[0];
    for point in &response.results {
        assert_eq!(point.r2_score, first.r2_score);
        assert_eq!(point.mae, first.mae);
        assert_eq!(point.rmse, first.rmse);
        assert_eq!(point.model_used, first.model_used);
    }
    assert_eq!(first.r2_score, response.model_info.r2_count);
    assert!(first.rmse > 0.0);
    assert!(first.mae > 0.0);
}

#[test]
fn test_interval_brackets_prediction() {
    let request = ForecastRequest::for_year_range(noisy_history(), 2023, 2030).unwrap();
    let response = run_forecast(&request).unwrap();

    for point in &response.results {
        assert!(point.confidence_interval_lower <= point.predicted_count);
        assert!(point.predicted_count <= point.confidence_interval_upper);
        assert!(point.confidence_interval_upper > point.confidence_interval_lower);
    }
}

#[test]
fn test_declining_trend_is_clamped_at_zero() {
    let history = vec![
        Observation::new(2020, 100.0, 4000.0),
        Observation::new(2021, 50.0, 2000.0),
    ];
    let request = ForecastRequest::new(history, vec![2025]);
    let response = run_forecast(&request).unwrap();

    let point = &response.results[0];
    assert_eq!(response.model_info.count_model, "Linear Regression");
    assert_eq!(point.predicted_count, 0);
    assert_eq!(point.predicted_demand_kwh, 0.0);
    assert_eq!(point.confidence_interval_lower, 0);
}

#[test]
fn test_two_points_use_linear_interpolation() {
    let history = vec![
        Observation::new(2020, 10.0, 100.0),
        Observation::new(2022, 30.0, 300.0),
    ];
    let response = run_forecast(&ForecastRequest::new(history, vec![2024])).unwrap();

    assert_eq!(response.model_info.count_model, "Linear Regression");
    assert_eq!(response.model_info.demand_model, "Linear Regression");
    assert!((response.model_info.r2_count - 1.0).abs() < 1e-9);
    assert!((49..=50).contains(&response.results[0].predicted_count));
}

#[test]
fn test_constant_counts_still_forecast() {
    let history = vec![
        Observation::new(2019, 40.0, 1000.0),
        Observation::new(2020, 40.0, 1500.0),
        Observation::new(2021, 40.0, 2100.0),
        Observation::new(2022, 40.0, 2400.0),
    ];
    let response = run_forecast(&ForecastRequest::new(history, vec![2023])).unwrap();

    assert_eq!(response.model_info.count_model, "Linear Regression");
    assert_eq!(response.model_info.r2_count, 1.0);
    assert_eq!(response.results[0].predicted_count, 40);
    assert_eq!(response.results[0].confidence_interval_lower, 40);
    assert_eq!(response.results[0].confidence_interval_upper, 40);
}

#[test]
fn test_zero_counts_report_zero_mae_percentage() {
    let history = vec![
        Observation::new(2020, 0.0, 0.0),
        Observation::new(2021, 0.0, 0.0),
        Observation::new(2022, 0.0, 0.0),
    ];
    let response = run_forecast(&ForecastRequest::new(history, vec![2023])).unwrap();
    assert_eq!(response.results[0].mae, 0.0);
    assert_eq!(response.results[0].predicted_count, 0);
}

#[test]
fn test_unsorted_history_matches_sorted() {
    let mut shuffled = noisy_history();
    shuffled.reverse();
    shuffled.swap(1, 4);

    let sorted = run_forecast(&ForecastRequest::new(noisy_history(), vec![2024])).unwrap();
    let unsorted = run_forecast(&ForecastRequest::new(shuffled, vec![2024])).unwrap();

    assert_eq!(sorted.model_info.count_model, unsorted.model_info.count_model);
    assert_eq!(
        sorted.results[0].predicted_count,
        unsorted.results[0].predicted_count
    );
}

#[test]
fn test_empty_future_years() {
    let response = run_forecast(&ForecastRequest::new(growth_history(), Vec::new())).unwrap();
    assert!(response.results.is_empty());
    assert!(!response.model_info.count_model.is_empty());
}

#[test]
fn test_single_point_is_insufficient() {
    let request = ForecastRequest::new(vec![Observation::new(2020, 1.0, 2.0)], vec![2021]);
    let err = run_forecast(&request).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientData {
            required: 2,
            actual: 1
        }
    ));
}

#[test]
fn test_custom_config_widens_band() {
    let request = ForecastRequest::new(noisy_history(), vec![2023]);
    let narrow = run_forecast(&request).unwrap();
    let wide = run_forecast_with(
        &request,
        &ForecastConfig {
            z_score: 3.0,
            confidence_level: 0.997,
            ..Default::default()
        },
    )
    .unwrap();

    let narrow = &narrow.results[0];
    let wide_point = &wide.results[0];
    assert_eq!(narrow.predicted_count, wide_point.predicted_count);
    assert!(wide_point.confidence_interval_upper >= narrow.confidence_interval_upper);
    assert_eq!(wide.model_info.confidence_level, 0.997);
}

#[test]
fn test_invalid_config_is_rejected() {
    let request = ForecastRequest::new(growth_history(), vec![2023]);
    let config = ForecastConfig {
        confidence_level: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        run_forecast_with(&request, &config),
        Err(ForecastError::MalformedInput(_))
    ));
}

#[test]
fn test_json_round_trip_success() {
    let input = r#"{
        "historical": [
            {"year": 2020, "count": 100, "chargingDemandKwh": 5000},
            {"year": 2021, "count": 150, "chargingDemandKwh": 7600},
            {"year": 2022, "count": 220, "chargingDemandKwh": 11200}
        ],
        "futureYears": [2023, 2024]
    }"#;

    let output: Value = serde_json::from_str(&forecast_json(input)).unwrap();
    assert!(output.get("error").is_none());

    let results = output["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for key in [
        "year",
        "predictedCount",
        "predictedDemandKwh",
        "modelUsed",
        "confidenceIntervalLower",
        "confidenceIntervalUpper",
        "r2Score",
        "mae",
        "rmse",
    ] {
        assert!(results[0].get(key).is_some(), "missing {}", key);
    }
    assert_eq!(output["modelInfo"]["confidenceLevel"], 0.95);
    assert!(output["modelInfo"]["countModel"].is_string());
    assert!(output["modelInfo"]["r2Demand"].is_number());
}

#[test]
fn test_json_single_point_is_error_only() {
    let input = r#"{"historical": [{"year": 2020, "count": 5, "chargingDemandKwh": 10}], "futureYears": [2021]}"#;
    let output: Value = serde_json::from_str(&forecast_json(input)).unwrap();

    let object = output.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["error"].as_str().unwrap().contains("Insufficient"));
    assert!(object.get("results").is_none());
}

#[test]
fn test_json_missing_history_is_insufficient() {
    let output: Value = serde_json::from_str(&forecast_json(r#"{"futureYears": [2030]}"#)).unwrap();
    assert!(output["error"].as_str().unwrap().contains("Insufficient"));
}

#[test]
fn test_json_missing_field_is_malformed() {
    let input = r#"{"historical": [{"year": 2020, "count": 5}, {"year": 2021, "count": 6}], "futureYears": [2022]}"#;
    let output: Value = serde_json::from_str(&forecast_json(input)).unwrap();
    let message = output["error"].as_str().unwrap();
    assert!(message.starts_with("Malformed input"));
    assert!(message.contains("chargingDemandKwh"));
}

#[test]
fn test_json_garbage_is_error_object() {
    let output: Value = serde_json::from_str(&forecast_json("not json")).unwrap();
    assert!(output["error"].is_string());
}

#[test]
fn test_negative_count_is_malformed() {
    let history = vec![
        Observation::new(2020, -1.0, 5.0),
        Observation::new(2021, 3.0, 5.0),
    ];
    let err = run_forecast(&ForecastRequest::new(history, vec![2022])).unwrap_err();
    assert!(matches!(err, ForecastError::MalformedInput(_)));
}

#[test]
fn test_repeated_runs_are_identical() {
    let request = serde_json::to_string(&ForecastRequest::new(noisy_history(), vec![2023, 2024]))
        .unwrap();
    assert_eq!(forecast_json(&request), forecast_json(&request));
}

#[test]
fn test_output_parses_back_into_typed_variant() {
    let request = serde_json::to_string(&ForecastRequest::new(growth_history(), vec![2023]))
        .unwrap();
    let output: ForecastOutput = serde_json::from_str(&forecast_json(&request)).unwrap();
    assert!(matches!(output, ForecastOutput::Success(_)));

    let failed: ForecastOutput = serde_json::from_str(&forecast_json("{}")).unwrap();
    assert!(matches!(failed, ForecastOutput::Failure(_)));
}
