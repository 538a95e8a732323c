//! Output formatting and persistence for derived views.
//!
//! Supports pretty-printing, JSON files, and CSV export of the chart-shaped
//! views (trend rows and map markers).

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::views::dashboard::ScaledMarker;
use crate::views::types::TrendSeries;
use csv::WriterBuilder;
use std::fs::File;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path, "Wrote JSON output");
    Ok(())
}

/// Writes one CSV row per trend bucket: the bucket label followed by one
/// column per carrier. Missing values are written as `0`, the chart's
/// convention for "no data".
pub fn write_trend_csv(path: &str, series: &TrendSeries) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().from_writer(file);

    let mut header = vec!["period".to_string()];
    header.extend(series.carriers.iter().cloned());
    writer.write_record(&header)?;

    for bucket in &series.buckets {
        let mut row = vec![bucket.label.clone()];
        row.extend((0..series.carriers.len()).map(|i| bucket.display_value(i).to_string()));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    debug!(path, rows = series.buckets.len(), "Wrote trend CSV");
    Ok(())
}

#[derive(Serialize)]
struct MarkerRow<'a> {
    code: &'a str,
    name: &'a str,
    lat: f64,
    lng: f64,
    region: &'a str,
    weighted_avg_delay: Option<f64>,
    total_flights: u64,
    is_selected: bool,
    radius: f64,
}

/// Writes the map markers as CSV. Airports without flights leave
/// `weighted_avg_delay` empty.
pub fn write_map_csv(path: &str, markers: &[ScaledMarker<'_>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for scaled in markers {
        let marker = &scaled.marker;
        writer.serialize(MarkerRow {
            code: marker.code,
            name: marker.name,
            lat: marker.lat,
            lng: marker.lng,
            region: marker.region,
            weighted_avg_delay: marker.weighted_avg_delay,
            total_flights: marker.total_flights,
            is_selected: marker.is_selected,
            radius: scaled.radius,
        })?;
    }

    writer.flush()?;
    debug!(path, rows = markers.len(), "Wrote map CSV");
    Ok(())
}
