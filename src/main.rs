//! CLI entry point for the flight delay views tool.
//!
//! Provides subcommands for deriving the dashboard views of a precomputed
//! airport performance dataset, exporting chart data, and building the
//! dataset from raw flight records.

use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use flight_delay_views::{
    airports::{ReferenceTable, UNKNOWN_REGION},
    fetch::load_dataset,
    ingest::{DEFAULT_EXCLUDED_YEAR, IngestOptions, MIN_MONTHLY_FLIGHTS, build_dataset_from_path},
    output::{print_json, write_json, write_map_csv, write_trend_csv},
    views::dashboard::{DashboardOptions, DashboardView, scaled_map},
    views::ranking::DEFAULT_RANK_LIMIT,
    views::region::filter_by_region,
    views::trends::trends,
    views::types::{Granularity, RegionFilter, Selection, TrendSeries},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_DATASET: &str = "analysis_results.json";
const DEFAULT_AIRPORT: &str = "ORD";

#[derive(Parser)]
#[command(name = "flight_delay_views")]
#[command(about = "Derive airline on-time views from a precomputed delay dataset", long_about = None)]
struct Cli {
    /// Dataset path or URL (falls back to $DATASET_SOURCE, then analysis_results.json)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// JSON file replacing the built-in airport reference table
    #[arg(long, global = true)]
    coordinates: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive every view for one airport and month
    Dashboard {
        /// Airport code
        #[arg(short, long, default_value = DEFAULT_AIRPORT)]
        airport: String,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Region filter for the airport directory, or "All"
        #[arg(short, long, default_value = "All")]
        region: RegionFilter,

        /// Number of carriers in the best/worst rankings
        #[arg(short, long, default_value_t = DEFAULT_RANK_LIMIT)]
        limit: usize,

        /// Trend bucketing: monthly or quarterly
        #[arg(short, long, default_value = "quarterly")]
        granularity: Granularity,

        /// Write the view as JSON to this file instead of logging it
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List airports, optionally restricted to one region
    Airports {
        /// Region name, or "All"
        #[arg(short, long, default_value = "All")]
        region: RegionFilter,
    },
    /// Export the carrier delay trend for an airport as CSV
    Trends {
        /// Airport code
        #[arg(short, long, default_value = DEFAULT_AIRPORT)]
        airport: String,

        /// Trend bucketing: monthly or quarterly
        #[arg(short, long, default_value = "quarterly")]
        granularity: Granularity,

        /// CSV file to write
        #[arg(short, long, default_value = "trends.csv")]
        output: String,
    },
    /// Export the airport delay map markers as CSV
    Map {
        /// Airport code to mark as selected
        #[arg(short, long, default_value = DEFAULT_AIRPORT)]
        airport: String,

        /// CSV file to write
        #[arg(short, long, default_value = "map.csv")]
        output: String,
    },
    /// Build the dataset from a raw flights CSV
    Build {
        /// Flights CSV with FL_DATE, AIRLINE, ORIGIN, DEST, DEP_DELAY, ARR_DELAY, CANCELLED
        #[arg(value_name = "FLIGHTS_CSV")]
        input: String,

        /// Dataset JSON to write
        #[arg(short, long, default_value = DEFAULT_DATASET)]
        output: String,

        /// Calendar year to drop from the input
        #[arg(long, default_value_t = DEFAULT_EXCLUDED_YEAR)]
        exclude_year: i32,

        /// Keep every year, ignoring --exclude-year
        #[arg(long, default_value_t = false)]
        all_years: bool,

        /// Minimum flights for a monthly carrier summary to be kept
        #[arg(long, default_value_t = MIN_MONTHLY_FLIGHTS)]
        min_monthly_flights: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/flight_delay_views.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_delay_views.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let source = cli
        .source
        .or_else(|| std::env::var("DATASET_SOURCE").ok())
        .unwrap_or_else(|| DEFAULT_DATASET.to_string());

    let table = match &cli.coordinates {
        Some(path) => {
            let table = ReferenceTable::load(path)?;
            info!(path = %path, airports = table.len(), "Loaded airport reference table");
            table
        }
        None => ReferenceTable::builtin().clone(),
    };

    match cli.command {
        Commands::Dashboard {
            airport,
            month,
            region,
            limit,
            granularity,
            output,
        } => {
            let dataset = load_dataset(&source).await?;
            let month = month.unwrap_or_else(|| Utc::now().month());
            let selection = Selection::new(airport, month).with_region(region);
            let options = DashboardOptions {
                rank_limit: limit,
                granularity,
            };

            let view = DashboardView::derive(&dataset, &table, selection, options);
            if view.airport_name.is_none() {
                warn!(airport = %view.selection.airport_code, "No data for selected airport");
            } else if view.monthly_best.is_none() {
                warn!(month, "No monthly records for selected month");
            }

            match output {
                Some(path) => {
                    write_json(&path, &view)?;
                    info!(path = %path, "Dashboard view written");
                }
                None => print_json(&view)?,
            }
        }
        Commands::Airports { region } => {
            let dataset = load_dataset(&source).await?;
            let entries = filter_by_region(&dataset.airport_list, &table, &region);

            for entry in &entries {
                info!(
                    code = %entry.code,
                    name = %entry.name,
                    region = table.region_of(&entry.code).unwrap_or("Unknown"),
                    "Airport"
                );
            }

            info!(
                total = dataset.airport_list.len(),
                shown = entries.len(),
                region = %region,
                regions = ?table.regions(),
                "Airport list summary"
            );
        }
        Commands::Trends {
            airport,
            granularity,
            output,
        } => {
            let dataset = load_dataset(&source).await?;
            let series = match dataset.airport(&airport) {
                Some(found) => trends(found, granularity),
                None => {
                    warn!(airport = %airport, "No data for selected airport");
                    TrendSeries::empty(granularity)
                }
            };

            write_trend_csv(&output, &series)?;
            info!(
                path = %output,
                carriers = ?series.carriers,
                buckets = series.buckets.len(),
                "Trend CSV written"
            );
        }
        Commands::Map { airport, output } => {
            let dataset = load_dataset(&source).await?;
            let markers = scaled_map(&dataset, &table, &airport);

            let no_data = markers
                .iter()
                .filter(|m| m.marker.weighted_avg_delay.is_none())
                .count();
            let unplaced = markers
                .iter()
                .filter(|m| m.marker.region == UNKNOWN_REGION)
                .count();

            write_map_csv(&output, &markers)?;
            info!(
                path = %output,
                markers = markers.len(),
                no_data,
                unplaced,
                "Map CSV written"
            );
        }
        Commands::Build {
            input,
            output,
            exclude_year,
            all_years,
            min_monthly_flights,
        } => {
            let options = IngestOptions {
                excluded_year: (!all_years).then_some(exclude_year),
                min_monthly_flights,
            };

            let (dataset, stats) = build_dataset_from_path(&input, &table, &options)?;
            write_json(&output, &dataset)?;

            info!(
                path = %output,
                rows_read = stats.rows_read,
                matched = stats.matched,
                airports = dataset.airports.len(),
                "Dataset written"
            );
        }
    }

    Ok(())
}
