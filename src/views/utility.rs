use std::cmp::Ordering;

/// Delay, in minutes, at which the on-time heuristic bottoms out at 0%.
pub const ON_TIME_DELAY_CEILING: f64 = 15.0;

static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Orders two delays, treating `-0.0` and `0.0` as equal so stable sorts keep
/// those ties in input order.
pub fn delay_cmp(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes a weighted mean from `(value, weight)` pairs.
/// Returns `None` when the weights sum to zero.
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, u64)>) -> Option<f64> {
    let (weighted_total, weight_sum) = pairs
        .into_iter()
        .fold((0.0, 0u64), |(total, sum), (value, weight)| {
            (total + value * weight as f64, sum.saturating_add(weight))
        });

    if weight_sum == 0 {
        None
    } else {
        Some(weighted_total / weight_sum as f64)
    }
}

/// Maps an average delay onto a 0–100% on-time score.
///
/// | Average delay      | Score        |
/// |--------------------|--------------|
/// | <= 0 min           | 100%         |
/// | 0 – 15 min         | linear       |
/// | >= 15 min          | 0%           |
///
/// This is a display heuristic, not a regulatory on-time definition.
pub fn on_time_percentage(avg_delay: f64) -> f64 {
    let penalty = (avg_delay / ON_TIME_DELAY_CEILING).min(1.0) * 100.0;
    (100.0 - penalty).clamp(0.0, 100.0)
}

/// English month name for 1–12.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
}
