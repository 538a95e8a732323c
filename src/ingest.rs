//! Offline builder for the airport performance dataset.
//!
//! Reads a raw per-flight CSV (one row per scheduled flight) and reduces it
//! to the per-airport, per-airline and per-month summaries the views consume.
//! Only airports in the [`ReferenceTable`] are summarized; a flight counts
//! toward both its origin and its destination.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use tracing::{debug, info, warn};

use crate::airports::ReferenceTable;
use crate::dataset::{
    AirlinePerformance, Airport, AirportDirectoryEntry, AirportTable, Dataset, MonthlyPerformance,
};

/// Monthly groups with fewer flights than this are dropped as too noisy.
pub const MIN_MONTHLY_FLIGHTS: u64 = 50;

/// The pandemic year is excluded by default.
pub const DEFAULT_EXCLUDED_YEAR: i32 = 2020;

/// A single flight row from the source CSV. Columns not listed are ignored.
#[derive(Debug, Deserialize)]
pub struct FlightRow {
    #[serde(rename = "FL_DATE")]
    pub flight_date: Option<String>,
    #[serde(rename = "AIRLINE")]
    pub airline: Option<String>,
    #[serde(rename = "ORIGIN")]
    pub origin: Option<String>,
    #[serde(rename = "DEST")]
    pub dest: Option<String>,
    #[serde(rename = "DEP_DELAY")]
    pub dep_delay: Option<f64>,
    #[serde(rename = "ARR_DELAY")]
    pub arr_delay: Option<f64>,
    #[serde(rename = "CANCELLED")]
    pub cancelled: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub excluded_year: Option<i32>,
    pub min_monthly_flights: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            excluded_year: Some(DEFAULT_EXCLUDED_YEAR),
            min_monthly_flights: MIN_MONTHLY_FLIGHTS,
        }
    }
}

/// Row accounting for one ingest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub missing_fields: usize,
    pub bad_dates: usize,
    pub excluded_year: usize,
    /// Rows that touched at least one reference airport.
    pub matched: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    flights: u64,
    dep_delay_sum: f64,
    arr_delay_sum: f64,
    cancelled_sum: f64,
}

impl Tally {
    fn add(&mut self, flight: &CleanFlight) {
        self.flights += 1;
        self.dep_delay_sum += flight.dep_delay;
        self.arr_delay_sum += flight.arr_delay;
        self.cancelled_sum += flight.cancelled;
    }

    fn avg(&self, sum: f64) -> f64 {
        if self.flights == 0 {
            0.0
        } else {
            sum / self.flights as f64
        }
    }
}

#[derive(Debug, Default)]
struct AirportTally {
    airlines: BTreeMap<String, Tally>,
    monthly: BTreeMap<(u32, String), Tally>,
}

struct CleanFlight {
    month: u32,
    airline: String,
    origin: String,
    dest: String,
    dep_delay: f64,
    arr_delay: f64,
    cancelled: f64,
}

/// Parses `FL_DATE` values such as `2019-01-09` or `2019-01-09 00:00:00`.
fn parse_flight_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Builds a dataset from CSV rows read from `reader`.
pub fn build_dataset<R: Read>(
    reader: R,
    table: &ReferenceTable,
    options: &IngestOptions,
) -> Result<(Dataset, IngestStats)> {
    let mut stats = IngestStats::default();
    let mut tallies: HashMap<String, AirportTally> = table
        .iter()
        .map(|entry| (entry.code.clone(), AirportTally::default()))
        .collect();

    let mut rdr = csv::Reader::from_reader(reader);
    for result in rdr.deserialize() {
        let row: FlightRow = result.context("malformed flight row")?;
        stats.rows_read += 1;

        let Some(flight) = clean(row, options, &mut stats) else {
            continue;
        };

        let mut codes = vec![flight.origin.as_str()];
        if flight.dest != flight.origin {
            codes.push(flight.dest.as_str());
        }

        let mut matched = false;
        for code in codes {
            if let Some(tally) = tallies.get_mut(code) {
                tally.airlines.entry(flight.airline.clone()).or_default().add(&flight);
                tally
                    .monthly
                    .entry((flight.month, flight.airline.clone()))
                    .or_default()
                    .add(&flight);
                matched = true;
            }
        }
        if matched {
            stats.matched += 1;
        }
    }

    if stats.missing_fields > 0 || stats.bad_dates > 0 {
        warn!(
            missing_fields = stats.missing_fields,
            bad_dates = stats.bad_dates,
            "Dropped incomplete flight rows"
        );
    }

    let mut airports = AirportTable::default();
    let mut airport_list = Vec::new();

    for entry in table.iter() {
        let tally = tallies.remove(&entry.code).unwrap_or_default();
        let name = if entry.name.is_empty() {
            entry.code.clone()
        } else {
            entry.name.clone()
        };

        let airport = summarize(name.clone(), tally, options.min_monthly_flights);
        debug!(
            airport = %entry.code,
            airlines = airport.airline_performance.len(),
            monthly = airport.monthly_performance.len(),
            "Summarized airport"
        );

        airports.insert(entry.code.clone(), airport);
        airport_list.push(AirportDirectoryEntry {
            code: entry.code.clone(),
            name,
        });
    }

    info!(
        rows_read = stats.rows_read,
        matched = stats.matched,
        excluded_year = stats.excluded_year,
        airports = airports.len(),
        "Dataset built"
    );

    Ok((
        Dataset {
            airports,
            airport_list,
        },
        stats,
    ))
}

/// Builds a dataset from the flights CSV at `path`.
#[tracing::instrument(skip(table, options))]
pub fn build_dataset_from_path(
    path: &str,
    table: &ReferenceTable,
    options: &IngestOptions,
) -> Result<(Dataset, IngestStats)> {
    let file = File::open(path).with_context(|| format!("failed to open flights CSV {path}"))?;
    build_dataset(file, table, options)
}

fn clean(row: FlightRow, options: &IngestOptions, stats: &mut IngestStats) -> Option<CleanFlight> {
    let (Some(airline), Some(dep_delay), Some(arr_delay), Some(cancelled)) =
        (row.airline, row.dep_delay, row.arr_delay, row.cancelled)
    else {
        stats.missing_fields += 1;
        return None;
    };

    let Some(date) = row.flight_date.as_deref().and_then(parse_flight_date) else {
        stats.bad_dates += 1;
        return None;
    };

    if options.excluded_year == Some(date.year()) {
        stats.excluded_year += 1;
        return None;
    }

    Some(CleanFlight {
        month: date.month(),
        airline,
        origin: row.origin.unwrap_or_default(),
        dest: row.dest.unwrap_or_default(),
        dep_delay,
        arr_delay,
        cancelled,
    })
}

fn summarize(name: String, tally: AirportTally, min_monthly_flights: u64) -> Airport {
    let airline_performance = tally
        .airlines
        .into_iter()
        .map(|(airline, t)| AirlinePerformance {
            airline,
            avg_departure_delay: t.avg(t.dep_delay_sum),
            total_flights: t.flights,
            avg_arrival_delay: Some(t.avg(t.arr_delay_sum)),
            cancellation_rate: Some(t.avg(t.cancelled_sum)),
        })
        .collect();

    let monthly_performance = tally
        .monthly
        .into_iter()
        .filter(|(_, t)| t.flights >= min_monthly_flights)
        .map(|((month, airline), t)| MonthlyPerformance {
            month: Some(month),
            airline,
            avg_departure_delay: t.avg(t.dep_delay_sum),
            total_flights: t.flights,
            cancellation_rate: Some(t.avg(t.cancelled_sum)),
        })
        .collect();

    Airport {
        name,
        airline_performance,
        monthly_performance,
    }
}
