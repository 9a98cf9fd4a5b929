//! Historical EV statistics and their loaders
//!
//! A forecast works on a handful of yearly observations, each carrying the
//! number of EVs on the road and the aggregate charging demand for that year.
//! [`HistoricalDataset`] validates them and splits them into the aligned
//! feature and target columns the model selector consumes. [`DataLoader`]
//! imports observations from CSV exports whose headers vary between sources.

use crate::config::MIN_OBSERVATIONS;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Charging demand assumed per vehicle when a CSV row carries none (kWh per year)
pub const ESTIMATED_KWH_PER_VEHICLE: f64 = 3000.0;

/// Earliest year accepted from CSV imports
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted from CSV imports
pub const MAX_YEAR: i32 = 2100;

/// Import warnings kept in a [`CsvImport`]; the rest are only logged
const MAX_WARNINGS: usize = 10;

/// One year of historical EV statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Calendar year
    pub year: i32,
    /// Number of EVs
    pub count: f64,
    /// Aggregate charging demand in kWh
    pub charging_demand_kwh: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(year: i32, count: f64, charging_demand_kwh: f64) -> Self {
        Self {
            year,
            count,
            charging_demand_kwh,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.count.is_finite() || self.count < 0.0 {
            return Err(ForecastError::MalformedInput(format!(
                "count for {} must be a non-negative number, got {}",
                self.year, self.count
            )));
        }
        if !self.charging_demand_kwh.is_finite() || self.charging_demand_kwh < 0.0 {
            return Err(ForecastError::MalformedInput(format!(
                "chargingDemandKwh for {} must be a non-negative number, got {}",
                self.year, self.charging_demand_kwh
            )));
        }
        Ok(())
    }
}

/// Validated history split into aligned feature and target columns
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    years: Vec<f64>,
    counts: Vec<f64>,
    demands: Vec<f64>,
}

impl HistoricalDataset {
    /// Build a dataset requiring the default minimum of observations
    pub fn from_observations(observations: &[Observation]) -> Result<Self> {
        Self::with_min_observations(observations, MIN_OBSERVATIONS)
    }

    /// Build a dataset requiring at least `min_observations` rows
    ///
    /// Years need not be sorted or contiguous; row order is preserved.
    pub fn with_min_observations(
        observations: &[Observation],
        min_observations: usize,
    ) -> Result<Self> {
        let required = min_observations.max(MIN_OBSERVATIONS);
        if observations.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: observations.len(),
            });
        }

        let mut years = Vec::with_capacity(observations.len());
        let mut counts = Vec::with_capacity(observations.len());
        let mut demands = Vec::with_capacity(observations.len());

        for observation in observations {
            observation.validate()?;
            years.push(f64::from(observation.year));
            counts.push(observation.count);
            demands.push(observation.charging_demand_kwh);
        }

        Ok(Self {
            years,
            counts,
            demands,
        })
    }

    /// Feature column: the observation years
    pub fn years(&self) -> &[f64] {
        &self.years
    }

    /// Target column: EV counts
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Target column: charging demand in kWh
    pub fn demands(&self) -> &[f64] {
        &self.demands
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether the dataset is empty (never true for a constructed dataset)
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Observations read from a CSV file together with the rows that were skipped
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    /// Parsed observations in file order
    pub observations: Vec<Observation>,
    /// Human readable notes about skipped rows (at most ten)
    pub warnings: Vec<String>,
}

/// Column positions detected from a CSV header
#[derive(Debug, Clone, Copy)]
struct ColumnMapping {
    year: usize,
    count: usize,
    demand: Option<usize>,
}

const YEAR_ALIASES: &[&str] = &["year", "yr", "period", "date", "time"];
const COUNT_ALIASES: &[&str] = &[
    "count",
    "vehicles",
    "evs",
    "ev_count",
    "vehicle_count",
    "number",
    "total",
    "quantity",
];
const DEMAND_ALIASES: &[&str] = &[
    "charging_demand_kwh",
    "demand",
    "kwh",
    "energy",
    "consumption",
    "charging_demand",
    "demand_kwh",
];

/// Data loader for historical EV statistics
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load observations from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<CsvImport> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load observations from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<CsvImport> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mapping = Self::detect_columns(&headers)?;

        let mut observations = Vec::new();
        let mut warnings = Vec::new();

        for (index, record) in rdr.records().enumerate() {
            let record = record?;
            // Header is line 1
            let line = index + 2;

            match Self::parse_row(&record, mapping) {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    warn!(line, %reason, "skipping CSV row");
                    if warnings.len() < MAX_WARNINGS {
                        warnings.push(format!("Row {}: {}", line, reason));
                    }
                }
            }
        }

        if observations.is_empty() {
            return Err(ForecastError::MalformedInput(
                "No valid data rows found in CSV".to_string(),
            ));
        }

        Ok(CsvImport {
            observations,
            warnings,
        })
    }

    /// Detect the year, count and demand columns in a header row
    fn detect_columns(headers: &csv::StringRecord) -> Result<ColumnMapping> {
        let year = Self::best_match(headers, YEAR_ALIASES).ok_or_else(|| {
            ForecastError::MalformedInput("No year column found in CSV header".to_string())
        })?;
        let count = Self::best_match(headers, COUNT_ALIASES).ok_or_else(|| {
            ForecastError::MalformedInput("No count column found in CSV header".to_string())
        })?;
        let demand = Self::best_match(headers, DEMAND_ALIASES);

        Ok(ColumnMapping {
            year,
            count,
            demand,
        })
    }

    /// Index of the header that best matches one of the aliases
    fn best_match(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, header) in headers.iter().enumerate() {
            let confidence = match_confidence(header, aliases);
            if confidence > 0.5 && best.map_or(true, |(_, c)| confidence > c) {
                best = Some((index, confidence));
            }
        }
        best.map(|(index, _)| index)
    }

    fn parse_row(
        record: &csv::StringRecord,
        mapping: ColumnMapping,
    ) -> std::result::Result<Observation, String> {
        let raw_year = record.get(mapping.year).unwrap_or("");
        let year = leading_integer(raw_year)
            .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
            .ok_or_else(|| format!("Invalid year: {:?}", raw_year))?;

        let count = record
            .get(mapping.count)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(f64::trunc)
            .unwrap_or(0.0);
        if count < 0.0 {
            return Err(format!("Negative count for {}", year));
        }

        let demand = mapping
            .demand
            .and_then(|column| record.get(column))
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(count * ESTIMATED_KWH_PER_VEHICLE);
        if demand < 0.0 {
            return Err(format!("Negative charging demand for {}", year));
        }

        Ok(Observation::new(year, count, demand))
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn match_confidence(header: &str, aliases: &[&str]) -> f64 {
    let normalized = normalize_header(header);
    if normalized.is_empty() {
        return 0.0;
    }

    aliases
        .iter()
        .map(|alias| {
            let alias = normalize_header(alias);
            if normalized == alias {
                1.0
            } else if normalized.contains(&alias) {
                0.9
            } else if alias.contains(&normalized) {
                0.8
            } else {
                0.0
            }
        })
        .fold(0.0, f64::max)
}

/// Integer formed by the leading digits, so "2021-06-30" reads as 2021
fn leading_integer(value: &str) -> Option<i32> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
