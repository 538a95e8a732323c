//! Dataset model and JSON parser for precomputed airport performance data.
//!
//! The document is produced offline (see [`crate::ingest`]) and is read-only
//! once loaded. Field names follow the upstream JSON exactly, so every
//! struct here carries explicit `serde` renames.

use anyhow::{Context, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One airline's all-time statistics at one airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlinePerformance {
    #[serde(rename = "AIRLINE")]
    pub airline: String,
    /// Mean departure delay in minutes. Negative means early on average.
    #[serde(rename = "AVG_DEP_DELAY")]
    pub avg_departure_delay: f64,
    #[serde(rename = "TOTAL_FLIGHTS")]
    pub total_flights: u64,
    #[serde(
        rename = "AVG_ARR_DELAY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub avg_arrival_delay: Option<f64>,
    #[serde(
        rename = "CANCELLATION_RATE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cancellation_rate: Option<f64>,
}

/// An airline's statistics at one airport, scoped to one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    /// Calendar month. `None` when the source value could not be coerced.
    #[serde(rename = "MONTH", deserialize_with = "coerce_month")]
    pub month: Option<u32>,
    #[serde(rename = "AIRLINE")]
    pub airline: String,
    #[serde(rename = "AVG_DEP_DELAY")]
    pub avg_departure_delay: f64,
    #[serde(rename = "TOTAL_FLIGHTS")]
    pub total_flights: u64,
    #[serde(
        rename = "CANCELLATION_RATE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cancellation_rate: Option<f64>,
}

/// Per-airport performance sequences, keyed externally by airport code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    #[serde(rename = "airlinePerformance", default)]
    pub airline_performance: Vec<AirlinePerformance>,
    #[serde(rename = "monthlyPerformance", default)]
    pub monthly_performance: Vec<MonthlyPerformance>,
}

/// A `{code, name}` pair shown in airport pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportDirectoryEntry {
    pub code: String,
    pub name: String,
}

/// Airports keyed by code, kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportTable {
    entries: Vec<(String, Airport)>,
}

impl AirportTable {
    /// Inserts an airport, replacing any previous entry with the same code
    /// in its original position.
    pub fn insert(&mut self, code: String, airport: Airport) {
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(slot) => slot.1 = airport,
            None => self.entries.push((code, airport)),
        }
    }

    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, airport)| airport)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Airport)> {
        self.entries.iter().map(|(c, a)| (c.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Airport)> for AirportTable {
    fn from_iter<I: IntoIterator<Item = (String, Airport)>>(iter: I) -> Self {
        let mut table = AirportTable::default();
        for (code, airport) in iter {
            table.insert(code, airport);
        }
        table
    }
}

impl Serialize for AirportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, airport) in &self.entries {
            map.serialize_entry(code, airport)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AirportTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = AirportTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of airports keyed by code")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = AirportTable::default();
                while let Some((code, airport)) = access.next_entry::<String, Airport>()? {
                    table.insert(code, airport);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// The full precomputed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub airports: AirportTable,
    #[serde(rename = "airportList", default)]
    pub airport_list: Vec<AirportDirectoryEntry>,
}

impl Dataset {
    /// Looks up an airport by code. Unknown codes are not an error.
    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    /// Directory codes with no matching airport entry.
    pub fn dangling_directory_codes(&self) -> Vec<&str> {
        self.airport_list
            .iter()
            .filter(|entry| !self.airports.contains(&entry.code))
            .map(|entry| entry.code.as_str())
            .collect()
    }
}

/// Decodes a dataset document from raw JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or do not have the expected
/// shape. Missing performance lists are tolerated and read as empty.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset> {
    serde_json::from_slice(bytes).context("dataset does not match the airport performance layout")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMonth {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `3`, `3.0`, `"3"`, `"+3"` or `" 03 "`. Anything else becomes `None`.
fn coerce_month<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<RawMonth>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawMonth::Int(n)) => u32::try_from(n).ok(),
        Some(RawMonth::Float(f)) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u32),
        Some(RawMonth::Float(_)) => None,
        Some(RawMonth::Text(text)) => parse_month_text(&text),
        None => None,
    })
}

fn parse_month_text(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits: String = text
        .strip_prefix('+')
        .unwrap_or(text)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_dataset() {
        let json = br#"{
            "airports": {
                "ORD": {
                    "name": "Chicago O'Hare",
                    "airlinePerformance": [
                        {"AIRLINE": "United Air Lines Inc.", "AVG_DEP_DELAY": 12.5, "TOTAL_FLIGHTS": 900}
                    ],
                    "monthlyPerformance": [
                        {"AIRLINE": "United Air Lines Inc.", "AVG_DEP_DELAY": 9.0, "TOTAL_FLIGHTS": 80, "MONTH": 1}
                    ]
                }
            },
            "airportList": [{"code": "ORD", "name": "Chicago O'Hare"}]
        }"#;

        let dataset = parse_dataset(json).unwrap();
        let ord = dataset.airport("ORD").unwrap();

        assert_eq!(ord.airline_performance.len(), 1);
        assert_eq!(ord.airline_performance[0].total_flights, 900);
        assert_eq!(ord.monthly_performance[0].month, Some(1));
        assert_eq!(dataset.airport_list.len(), 1);
        assert!(dataset.airport("XXX").is_none());
    }

    #[test]
    fn test_month_coercion_variants() {
        let json = br#"[
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": "7"},
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": " 07 "},
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": 7.0},
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": "July"},
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": -2},
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": "+7"},
            {"AIRLINE": "A", "AVG_DEP_DELAY": 1.0, "TOTAL_FLIGHTS": 1, "MONTH": "++7"}
        ]"#;

        let records: Vec<MonthlyPerformance> = serde_json::from_slice(json).unwrap();
        let months: Vec<_> = records.iter().map(|r| r.month).collect();

        assert_eq!(months, vec![Some(7), Some(7), Some(7), None, None, Some(7), None]);
    }

    #[test]
    fn test_airport_order_is_preserved() {
        let json = br#"{"airports": {
            "SEA": {"name": "Seattle-Tacoma"},
            "ATL": {"name": "Atlanta International"},
            "MIA": {"name": "Miami International"}
        }}"#;

        let dataset = parse_dataset(json).unwrap();
        let codes: Vec<_> = dataset.airports.iter().map(|(code, _)| code).collect();

        assert_eq!(codes, vec!["SEA", "ATL", "MIA"]);
        assert!(dataset.airport("ATL").unwrap().airline_performance.is_empty());
    }

    #[test]
    fn test_dangling_directory_codes() {
        let json = br#"{
            "airports": {"ORD": {"name": "Chicago O'Hare"}},
            "airportList": [
                {"code": "ORD", "name": "Chicago O'Hare"},
                {"code": "JFK", "name": "New York JFK"}
            ]
        }"#;

        let dataset = parse_dataset(json).unwrap();
        assert_eq!(dataset.dangling_directory_codes(), vec!["JFK"]);
    }

    #[test]
    fn test_parse_wrong_shape_fails() {
        assert!(parse_dataset(b"[1, 2, 3]").is_err());
        assert!(parse_dataset(br#"{"airports": {"ORD": {"airlinePerformance": 5}}}"#).is_err());
        assert!(parse_dataset(b"not json").is_err());
    }

    #[test]
    fn test_serialize_round_trip_keeps_layout() {
        let dataset: Dataset = parse_dataset(
            br#"{"airports": {"DEN": {"name": "Denver International"}}, "airportList": []}"#,
        )
        .unwrap();

        let value = serde_json::to_value(&dataset).unwrap();
        assert_eq!(value["airports"]["DEN"]["name"], "Denver International");
        assert!(value["airportList"].is_array());
    }
}
