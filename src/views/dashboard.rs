use crate::airports::ReferenceTable;
use crate::dataset::{AirlinePerformance, AirportDirectoryEntry, Dataset, MonthlyPerformance};
use crate::views::geo::{MAX_MARKER_RADIUS, MIN_MARKER_RADIUS, RadiusScale, geo_summary};
use crate::views::insights::month_insights;
use crate::views::monthly::{monthly_ranked, runners_up};
use crate::views::ranking::{top_performers, worst_performers};
use crate::views::region::filter_by_region;
use crate::views::trends::trends;
use crate::views::types::{AirportMarker, Granularity, MonthInsights, Selection, TrendSeries};
use crate::views::utility::on_time_percentage;
use serde::Serialize;
use tracing::debug;

/// A map marker with its computed radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledMarker<'a> {
    #[serde(flatten)]
    pub marker: AirportMarker<'a>,
    pub radius: f64,
}

/// The month's best carrier with its on-time score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBest<'a> {
    pub record: &'a MonthlyPerformance,
    pub on_time_percentage: f64,
}

/// Every derived view for one selection.
///
/// An unknown airport code produces empty per-airport views; the map and
/// directory are still filled since they do not depend on the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView<'a> {
    pub selection: Selection,
    pub airport_name: Option<&'a str>,
    pub directory: Vec<&'a AirportDirectoryEntry>,
    pub top_performers: Vec<&'a AirlinePerformance>,
    pub worst_performers: Vec<&'a AirlinePerformance>,
    pub monthly_ranking: Vec<&'a MonthlyPerformance>,
    pub monthly_best: Option<MonthlyBest<'a>>,
    pub monthly_runners_up: Vec<&'a MonthlyPerformance>,
    pub trends: TrendSeries,
    pub insights: Option<MonthInsights<'a>>,
    pub map: Vec<ScaledMarker<'a>>,
}

/// Options that are not part of the user's selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardOptions {
    pub rank_limit: usize,
    pub granularity: Granularity,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            rank_limit: crate::views::ranking::DEFAULT_RANK_LIMIT,
            granularity: Granularity::Quarterly,
        }
    }
}

impl<'a> DashboardView<'a> {
    /// Derives all views for `selection`. Never fails: missing data yields
    /// empty sequences and `None`.
    pub fn derive(
        dataset: &'a Dataset,
        table: &'a ReferenceTable,
        selection: Selection,
        options: DashboardOptions,
    ) -> Self {
        let airport = dataset.airport(&selection.airport_code);
        if airport.is_none() {
            debug!(airport = %selection.airport_code, "Selected airport not in dataset");
        }

        let map = scaled_map(dataset, table, &selection.airport_code);
        let directory = filter_by_region(&dataset.airport_list, table, &selection.region);

        let Some(airport) = airport else {
            return Self {
                airport_name: None,
                directory,
                top_performers: Vec::new(),
                worst_performers: Vec::new(),
                monthly_ranking: Vec::new(),
                monthly_best: None,
                monthly_runners_up: Vec::new(),
                trends: TrendSeries::empty(options.granularity),
                insights: None,
                map,
                selection,
            };
        };

        let monthly_ranking = monthly_ranked(airport, selection.month);
        let monthly_best = monthly_ranking.first().map(|&record| MonthlyBest {
            record,
            on_time_percentage: on_time_percentage(record.avg_departure_delay),
        });

        Self {
            airport_name: Some(airport.name.as_str()),
            directory,
            top_performers: top_performers(airport, options.rank_limit),
            worst_performers: worst_performers(airport, options.rank_limit),
            monthly_best,
            monthly_runners_up: runners_up(airport, selection.month),
            monthly_ranking,
            trends: trends(airport, options.granularity),
            insights: month_insights(airport, selection.month),
            map,
            selection,
        }
    }
}

/// Geographic summary with marker radii fitted to the dataset's flight range.
pub fn scaled_map<'a>(
    dataset: &'a Dataset,
    table: &'a ReferenceTable,
    selected_code: &str,
) -> Vec<ScaledMarker<'a>> {
    let markers = geo_summary(dataset, table, selected_code);
    let scale = RadiusScale::fit(&markers, MIN_MARKER_RADIUS, MAX_MARKER_RADIUS);

    markers
        .into_iter()
        .map(|marker| ScaledMarker {
            radius: scale.radius(marker.total_flights),
            marker,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_dataset;
    use crate::views::types::RegionFilter;

    #[test]
    fn test_derive_for_known_airport() {
        let dataset = sample_dataset();

        let view = DashboardView::derive(
            &dataset,
            ReferenceTable::builtin(),
            Selection::new("ORD", 1),
            DashboardOptions::default(),
        );

        assert_eq!(view.airport_name, Some("Chicago O'Hare"));
        assert_eq!(view.top_performers[0].airline, "Alaska");
        assert_eq!(view.worst_performers[0].airline, "United");
        assert_eq!(view.monthly_best.as_ref().unwrap().record.airline, "Delta");
        assert!((view.monthly_best.as_ref().unwrap().on_time_percentage - 80.0).abs() < 1e-9);
        assert_eq!(view.trends.buckets.len(), 4);
        assert!(view.insights.is_some());
        assert_eq!(view.map.len(), 2);
        assert!(view.map[0].marker.is_selected);
    }

    #[test]
    fn test_derive_for_unknown_airport_is_empty() {
        let dataset = sample_dataset();

        let view = DashboardView::derive(
            &dataset,
            ReferenceTable::builtin(),
            Selection::new("ZZZ", 1),
            DashboardOptions::default(),
        );

        assert_eq!(view.airport_name, None);
        assert!(view.top_performers.is_empty());
        assert!(view.monthly_ranking.is_empty());
        assert!(view.monthly_best.is_none());
        assert!(view.trends.carriers.is_empty());
        assert!(view.insights.is_none());
        assert_eq!(view.map.len(), 2);
        assert!(view.map.iter().all(|m| !m.marker.is_selected));
    }

    #[test]
    fn test_month_without_data_has_no_best() {
        let dataset = sample_dataset();

        let view = DashboardView::derive(
            &dataset,
            ReferenceTable::builtin(),
            Selection::new("ORD", 11),
            DashboardOptions::default(),
        );

        assert!(view.monthly_best.is_none());
        assert!(view.insights.is_none());
        assert!(!view.top_performers.is_empty());
    }

    #[test]
    fn test_region_filter_applies_to_directory() {
        let dataset = sample_dataset();

        let view = DashboardView::derive(
            &dataset,
            ReferenceTable::builtin(),
            Selection::new("ORD", 1).with_region(RegionFilter::Region("West".to_string())),
            DashboardOptions::default(),
        );

        let codes: Vec<_> = view.directory.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["LAX"]);
    }

    #[test]
    fn test_view_serializes() {
        let dataset = sample_dataset();
        let view = DashboardView::derive(
            &dataset,
            ReferenceTable::builtin(),
            Selection::new("LAX", 1),
            DashboardOptions {
                rank_limit: 1,
                granularity: Granularity::Monthly,
            },
        );

        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["top_performers"].as_array().unwrap().len(), 1);
        assert_eq!(value["map"][1]["code"], "LAX");
        assert!(value["map"][1]["radius"].is_number());
        assert!(value["trends"]["buckets"][0]["values"][0].is_null());
    }

    // Helper functions for tests
    fn sample_dataset() -> Dataset {
        parse_dataset(
            br#"{
            "airports": {
                "ORD": {
                    "name": "Chicago O'Hare",
                    "airlinePerformance": [
                        {"AIRLINE": "United", "AVG_DEP_DELAY": 18.0, "TOTAL_FLIGHTS": 500},
                        {"AIRLINE": "Alaska", "AVG_DEP_DELAY": 2.0, "TOTAL_FLIGHTS": 50},
                        {"AIRLINE": "Delta", "AVG_DEP_DELAY": 6.0, "TOTAL_FLIGHTS": 200}
                    ],
                    "monthlyPerformance": [
                        {"AIRLINE": "United", "AVG_DEP_DELAY": 14.0, "TOTAL_FLIGHTS": 90, "MONTH": "1"},
                        {"AIRLINE": "Delta", "AVG_DEP_DELAY": 3.0, "TOTAL_FLIGHTS": 60, "MONTH": "1"}
                    ]
                },
                "LAX": {
                    "name": "Los Angeles International",
                    "airlinePerformance": [
                        {"AIRLINE": "Delta", "AVG_DEP_DELAY": 9.0, "TOTAL_FLIGHTS": 300}
                    ],
                    "monthlyPerformance": [
                        {"AIRLINE": "Delta", "AVG_DEP_DELAY": 9.0, "TOTAL_FLIGHTS": 70, "MONTH": 2}
                    ]
                }
            },
            "airportList": [
                {"code": "ORD", "name": "Chicago O'Hare"},
                {"code": "LAX", "name": "Los Angeles International"}
            ]
        }"#,
        )
        .unwrap()
    }
}
