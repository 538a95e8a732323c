//! Reference table of major U.S. airports: display name, map coordinates and region.
//!
//! The built-in table covers the fifteen airports the dataset is built for.
//! It can be replaced at start-up with a JSON file of the same shape:
//! ```json
//! [
//!   { "code": "ATL", "name": "Atlanta International", "lat": 33.6407, "lng": -84.4277, "region": "Southeast" }
//! ]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Region reported for airports the table does not know.
pub const UNKNOWN_REGION: &str = "Unknown";

static MAJOR_AIRPORTS: &[(&str, &str, f64, f64, &str)] = &[
    ("ATL", "Atlanta International", 33.6407, -84.4277, "Southeast"),
    ("LAX", "Los Angeles International", 33.9416, -118.4085, "West"),
    ("ORD", "Chicago O'Hare", 41.9742, -87.9073, "Midwest"),
    ("DFW", "Dallas/Fort Worth", 32.8998, -97.0403, "South"),
    ("DEN", "Denver International", 39.8561, -104.6737, "West"),
    ("JFK", "New York JFK", 40.6413, -73.7781, "Northeast"),
    ("SFO", "San Francisco International", 37.7749, -122.4194, "West"),
    ("SEA", "Seattle-Tacoma", 47.4502, -122.3088, "Northwest"),
    ("LAS", "Las Vegas", 36.0840, -115.1537, "West"),
    ("MCO", "Orlando International", 28.4312, -81.3081, "Southeast"),
    ("MIA", "Miami International", 25.7933, -80.2906, "Southeast"),
    ("CLT", "Charlotte Douglas", 35.2144, -80.9473, "Southeast"),
    ("EWR", "Newark Liberty", 40.6895, -74.1745, "Northeast"),
    ("PHX", "Phoenix Sky Harbor", 33.4352, -112.0101, "Southwest"),
    ("IAH", "Houston Bush", 29.9902, -95.3368, "South"),
];

static BUILTIN: LazyLock<ReferenceTable> = LazyLock::new(|| ReferenceTable {
    entries: MAJOR_AIRPORTS
        .iter()
        .map(|&(code, name, lat, lng, region)| AirportReference {
            code: code.to_string(),
            name: name.to_string(),
            lat,
            lng,
            region: region.to_string(),
        })
        .collect(),
});

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportReference {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub region: String,
}

/// Map position and region for an airport. Unknown airports get `(0, 0, "Unknown")`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate<'a> {
    pub lat: f64,
    pub lng: f64,
    pub region: &'a str,
}

impl Coordinate<'_> {
    pub const UNKNOWN: Coordinate<'static> = Coordinate {
        lat: 0.0,
        lng: 0.0,
        region: UNKNOWN_REGION,
    };

    pub fn is_known(&self) -> bool {
        *self != Coordinate::UNKNOWN
    }
}

/// Ordered, immutable airport reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    entries: Vec<AirportReference>,
}

impl ReferenceTable {
    /// The embedded table, built once on first use.
    pub fn builtin() -> &'static ReferenceTable {
        &BUILTIN
    }

    pub fn from_entries(entries: Vec<AirportReference>) -> Self {
        Self { entries }
    }

    /// Loads a replacement table from a JSON array at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read airport reference table '{path}'"))?;
        let entries: Vec<AirportReference> = serde_json::from_str(&content)
            .with_context(|| format!("airport reference table '{path}' is malformed"))?;
        Ok(Self { entries })
    }

    pub fn get(&self, code: &str) -> Option<&AirportReference> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Coordinate for `code`, or [`Coordinate::UNKNOWN`] when the table has no entry.
    pub fn coordinate(&self, code: &str) -> Coordinate<'_> {
        match self.get(code) {
            Some(entry) => Coordinate {
                lat: entry.lat,
                lng: entry.lng,
                region: &entry.region,
            },
            None => Coordinate::UNKNOWN,
        }
    }

    /// Region for `code`. `None` means the airport has no known region.
    pub fn region_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(|entry| entry.region.as_str())
    }

    /// Distinct regions in first-seen order.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !regions.contains(&entry.region.as_str()) {
                regions.push(&entry.region);
            }
        }
        regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportReference> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
