use crate::dataset::{Airport, MonthlyPerformance};
use crate::views::types::{Granularity, TrendBucket, TrendSeries};
use crate::views::utility::mean;
use std::collections::HashMap;

/// Number of carriers charted in a trend series.
pub const TREND_CARRIER_COUNT: usize = 3;

/// Carriers with the most flights across all months, busiest first.
///
/// Carriers with equal totals keep the order in which they first appear in
/// the monthly records.
pub fn busiest_carriers(airport: &Airport, count: usize) -> Vec<&str> {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in &airport.monthly_performance {
        match index.get(record.airline.as_str()) {
            Some(&i) => totals[i].1 = totals[i].1.saturating_add(record.total_flights),
            None => {
                index.insert(record.airline.as_str(), totals.len());
                totals.push((record.airline.as_str(), record.total_flights));
            }
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
        .into_iter()
        .take(count)
        .map(|(airline, _)| airline)
        .collect()
}

/// Delay trend for the airport's [`TREND_CARRIER_COUNT`] busiest carriers.
///
/// Monthly buckets take the first record for that month and carrier.
/// Quarterly buckets average every record the carrier has in the quarter.
/// A carrier with no record in a bucket gets `None`.
pub fn trends(airport: &Airport, granularity: Granularity) -> TrendSeries {
    let carriers = busiest_carriers(airport, TREND_CARRIER_COUNT);

    let buckets = granularity
        .periods()
        .into_iter()
        .map(|(label, months)| {
            let values = carriers
                .iter()
                .map(|carrier| {
                    bucket_value(&airport.monthly_performance, carrier, &months, granularity)
                })
                .collect();
            TrendBucket {
                label,
                months,
                values,
            }
        })
        .collect();

    TrendSeries {
        granularity,
        carriers: carriers.into_iter().map(str::to_string).collect(),
        buckets,
    }
}

fn bucket_value(
    records: &[MonthlyPerformance],
    carrier: &str,
    months: &[u32],
    granularity: Granularity,
) -> Option<f64> {
    let mut matching = records.iter().filter(|record| {
        record.airline == carrier && record.month.is_some_and(|m| months.contains(&m))
    });

    match granularity {
        Granularity::Monthly => matching.next().map(|record| record.avg_departure_delay),
        Granularity::Quarterly => {
            let delays: Vec<f64> = matching.map(|record| record.avg_departure_delay).collect();
            mean(&delays)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_three_busiest_carriers() {
        let airport = airport_with(&[
            ("D", 1, 1.0, 100),
            ("C", 1, 1.0, 120),
            ("A", 1, 1.0, 250),
            ("B", 1, 1.0, 300),
            ("C", 2, 1.0, 80),
            ("A", 2, 1.0, 250),
        ]);

        let series = trends(&airport, Granularity::Monthly);

        assert_eq!(series.carriers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_busiest_three_of_four() {
        let airport = airport_with(&[
            ("A", 1, 1.0, 200),
            ("B", 1, 1.0, 300),
            ("C", 1, 1.0, 200),
            ("D", 1, 1.0, 100),
            ("A", 2, 1.0, 300),
        ]);

        let series = trends(&airport, Granularity::Quarterly);

        assert_eq!(series.carriers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_carrier_totals_saturate() {
        let airport = airport_with(&[("A", 1, 1.0, u64::MAX), ("B", 1, 1.0, 10), ("A", 2, 1.0, 5)]);

        assert_eq!(busiest_carriers(&airport, 2), vec!["A", "B"]);
    }

    #[test]
    fn test_fewer_carriers_than_limit() {
        let airport = airport_with(&[("A", 1, 1.0, 10), ("B", 1, 1.0, 20)]);

        assert_eq!(busiest_carriers(&airport, TREND_CARRIER_COUNT), vec!["B", "A"]);
    }

    #[test]
    fn test_equal_totals_keep_first_seen_order() {
        let airport = airport_with(&[
            ("Y", 1, 1.0, 50),
            ("X", 1, 1.0, 50),
            ("Z", 1, 1.0, 50),
            ("W", 1, 1.0, 50),
        ]);

        assert_eq!(busiest_carriers(&airport, 3), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_quarterly_averages_within_quarter() {
        let airport = airport_with(&[("A", 1, 5.0, 60), ("A", 2, 10.0, 60), ("A", 3, 15.0, 60)]);

        let series = trends(&airport, Granularity::Quarterly);

        assert_eq!(series.buckets.len(), 4);
        assert_eq!(series.value("Q1", "A"), Some(10.0));
        assert_eq!(series.value("Q2", "A"), None);
        assert_eq!(series.value("Q3", "A"), None);
        assert_eq!(series.value("Q4", "A"), None);
        assert_eq!(series.buckets[1].display_value(0), 0.0);
    }

    #[test]
    fn test_monthly_buckets_in_order() {
        let airport = airport_with(&[("A", 3, 7.0, 60), ("B", 12, -2.0, 70)]);

        let series = trends(&airport, Granularity::Monthly);
        let labels: Vec<_> = series.buckets.iter().map(|b| b.label.as_str()).collect();

        assert_eq!(labels, (1..=12).map(|m| m.to_string()).collect::<Vec<_>>());
        assert_eq!(series.carriers, vec!["B", "A"]);
        assert_eq!(series.value("3", "A"), Some(7.0));
        assert_eq!(series.value("12", "B"), Some(-2.0));
        assert_eq!(series.value("1", "A"), None);
    }

    #[test]
    fn test_monthly_uses_first_matching_record() {
        let airport = airport_with(&[("A", 5, 4.0, 60), ("A", 5, 40.0, 60)]);

        let series = trends(&airport, Granularity::Monthly);

        assert_eq!(series.value("5", "A"), Some(4.0));
    }

    #[test]
    fn test_zero_delay_is_distinct_from_missing() {
        let airport = airport_with(&[("A", 1, 0.0, 60)]);

        let series = trends(&airport, Granularity::Monthly);

        assert_eq!(series.value("1", "A"), Some(0.0));
        assert_eq!(series.value("2", "A"), None);
    }

    #[test]
    fn test_no_monthly_records() {
        let airport = airport_with(&[]);

        let series = trends(&airport, Granularity::Quarterly);

        assert!(series.carriers.is_empty());
        assert_eq!(series.buckets.len(), 4);
        assert!(series.buckets.iter().all(|b| b.values.is_empty()));
    }

    // Helper functions for tests
    fn airport_with(records: &[(&str, u32, f64, u64)]) -> Airport {
        Airport {
            name: "Test Airport".to_string(),
            airline_performance: vec![],
            monthly_performance: records
                .iter()
                .map(|&(airline, month, delay, flights)| MonthlyPerformance {
                    month: Some(month),
                    airline: airline.to_string(),
                    avg_departure_delay: delay,
                    total_flights: flights,
                    cancellation_rate: None,
                })
                .collect(),
        }
    }
}
