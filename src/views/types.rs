//! Data types shared by the derivation functions.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sort direction for airline rankings, by average departure delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Least delayed first.
    Ascending,
    /// Most delayed first.
    Descending,
}

/// Time bucketing for trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Monthly,
    Quarterly,
}

static QUARTERS: [(&str, [u32; 3]); 4] = [
    ("Q1", [1, 2, 3]),
    ("Q2", [4, 5, 6]),
    ("Q3", [7, 8, 9]),
    ("Q4", [10, 11, 12]),
];

impl Granularity {
    /// Buckets in chronological order as `(label, months)`.
    pub fn periods(self) -> Vec<(String, Vec<u32>)> {
        match self {
            Granularity::Monthly => (1..=12).map(|m| (m.to_string(), vec![m])).collect(),
            Granularity::Quarterly => QUARTERS
                .iter()
                .map(|(label, months)| (label.to_string(), months.to_vec()))
                .collect(),
        }
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" => Ok(Granularity::Quarterly),
            other => anyhow::bail!("unknown granularity '{other}' (expected monthly or quarterly)"),
        }
    }
}

/// One period of a trend series. `values` lines up with [`TrendSeries::carriers`];
/// `None` means the carrier has no record in the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    pub label: String,
    pub months: Vec<u32>,
    pub values: Vec<Option<f64>>,
}

impl TrendBucket {
    /// Chart value for the carrier at `index`: missing data is drawn as zero.
    pub fn display_value(&self, index: usize) -> f64 {
        self.values.get(index).copied().flatten().unwrap_or(0.0)
    }
}

/// Delay trend for an airport's busiest carriers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub granularity: Granularity,
    pub carriers: Vec<String>,
    pub buckets: Vec<TrendBucket>,
}

impl TrendSeries {
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            carriers: Vec::new(),
            buckets: Vec::new(),
        }
    }

    /// Looks up one carrier's value in the bucket labelled `label`.
    pub fn value(&self, label: &str, carrier: &str) -> Option<f64> {
        let index = self.carriers.iter().position(|c| c == carrier)?;
        self.buckets
            .iter()
            .find(|bucket| bucket.label == label)
            .and_then(|bucket| bucket.values.get(index).copied().flatten())
    }
}

/// One airport on the delay map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportMarker<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub region: &'a str,
    /// Flights-weighted mean departure delay. `None` when the airport has no flights.
    pub weighted_avg_delay: Option<f64>,
    pub total_flights: u64,
    pub is_selected: bool,
}

/// Summary facts for one airport in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthInsights<'a> {
    pub month: u32,
    pub month_name: &'static str,
    pub total_flights: u64,
    pub weighted_avg_delay: Option<f64>,
    pub best_airline: &'a str,
    pub best_avg_delay: f64,
    pub best_total_flights: u64,
    pub worst_airline: &'a str,
    pub worst_avg_delay: f64,
    /// Minutes between the worst and best carrier's average delay.
    pub delay_spread: f64,
}

/// Region selector for the airport directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionFilter {
    #[default]
    All,
    Region(String),
}

impl FromStr for RegionFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(RegionFilter::All)
        } else {
            Ok(RegionFilter::Region(s.to_string()))
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str("All"),
            RegionFilter::Region(region) => f.write_str(region),
        }
    }
}

/// What the user is currently looking at. Passed by value into each derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub airport_code: String,
    pub month: u32,
    pub region: RegionFilter,
}

impl Selection {
    pub fn new(airport_code: impl Into<String>, month: u32) -> Self {
        Self {
            airport_code: airport_code.into(),
            month,
            region: RegionFilter::All,
        }
    }

    pub fn with_region(mut self, region: RegionFilter) -> Self {
        self.region = region;
        self
    }
}
