use crate::airports::ReferenceTable;
use crate::dataset::{Airport, Dataset};
use crate::views::types::AirportMarker;
use crate::views::utility::weighted_mean;

/// Smallest marker radius, in pixels.
pub const MIN_MARKER_RADIUS: f64 = 7.0;
/// Largest marker radius, in pixels.
pub const MAX_MARKER_RADIUS: f64 = 18.0;

/// Total flights and flights-weighted mean delay over an airport's carriers.
/// The delay is `None` when the airport has no flights.
pub fn airport_delay(airport: &Airport) -> (u64, Option<f64>) {
    let total_flights = airport
        .airline_performance
        .iter()
        .fold(0u64, |total, record| total.saturating_add(record.total_flights));
    let weighted = weighted_mean(
        airport
            .airline_performance
            .iter()
            .map(|record| (record.avg_departure_delay, record.total_flights)),
    );
    (total_flights, weighted)
}

/// One map marker per airport in the dataset, in dataset order.
///
/// Airports missing from `table` are kept with the unknown-coordinate sentinel.
pub fn geo_summary<'a>(
    dataset: &'a Dataset,
    table: &'a ReferenceTable,
    selected_code: &str,
) -> Vec<AirportMarker<'a>> {
    dataset
        .airports
        .iter()
        .map(|(code, airport)| {
            let coordinate = table.coordinate(code);
            let (total_flights, weighted_avg_delay) = airport_delay(airport);
            AirportMarker {
                code,
                name: &airport.name,
                lat: coordinate.lat,
                lng: coordinate.lng,
                region: coordinate.region,
                weighted_avg_delay,
                total_flights,
                is_selected: code == selected_code,
            }
        })
        .collect()
}

/// Linear map from flight volume to marker radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    min_flights: u64,
    max_flights: u64,
    min_radius: f64,
    max_radius: f64,
}

impl RadiusScale {
    /// Builds a scale over the observed flight range of `markers`.
    pub fn fit(markers: &[AirportMarker<'_>], min_radius: f64, max_radius: f64) -> Self {
        let min_flights = markers.iter().map(|m| m.total_flights).min().unwrap_or(0);
        let max_flights = markers.iter().map(|m| m.total_flights).max().unwrap_or(0);
        Self::new(min_flights, max_flights, min_radius, max_radius)
    }

    pub fn new(min_flights: u64, max_flights: u64, min_radius: f64, max_radius: f64) -> Self {
        Self {
            min_flights,
            max_flights,
            min_radius,
            max_radius,
        }
    }

    /// Radius for `total_flights`. A degenerate domain maps everything to the minimum.
    pub fn radius(&self, total_flights: u64) -> f64 {
        if self.max_flights <= self.min_flights {
            return self.min_radius;
        }
        let span = (self.max_flights - self.min_flights) as f64;
        let offset = total_flights as f64 - self.min_flights as f64;
        self.min_radius + offset * (self.max_radius - self.min_radius) / span
    }
}
