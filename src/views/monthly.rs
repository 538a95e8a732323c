use crate::dataset::{Airport, MonthlyPerformance};
use crate::views::utility::delay_cmp;

/// How many carriers after the best one are listed as alternatives.
pub const RUNNER_UP_COUNT: usize = 3;

/// Carriers with a record for `month`, least delayed first.
///
/// Months outside 1–12 yield an empty ranking. Equal delays keep dataset order.
pub fn monthly_ranked(airport: &Airport, month: u32) -> Vec<&MonthlyPerformance> {
    if !(1..=12).contains(&month) {
        return Vec::new();
    }

    let mut ranked: Vec<&MonthlyPerformance> = airport
        .monthly_performance
        .iter()
        .filter(|record| record.month == Some(month))
        .collect();

    ranked.sort_by(|a, b| delay_cmp(a.avg_departure_delay, b.avg_departure_delay));
    ranked
}

/// Least delayed carrier for `month`, or `None` when the month has no data.
pub fn best_for_month(airport: &Airport, month: u32) -> Option<&MonthlyPerformance> {
    monthly_ranked(airport, month).into_iter().next()
}

/// The next [`RUNNER_UP_COUNT`] carriers after the best one.
pub fn runners_up(airport: &Airport, month: u32) -> Vec<&MonthlyPerformance> {
    monthly_ranked(airport, month)
        .into_iter()
        .skip(1)
        .take(RUNNER_UP_COUNT)
        .collect()
}
