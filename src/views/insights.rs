use crate::dataset::Airport;
use crate::names::normalize_airline_name;
use crate::views::monthly::monthly_ranked;
use crate::views::types::MonthInsights;
use crate::views::utility::{month_name, weighted_mean};

/// Headline facts for `month` at `airport`: traffic, weighted delay and the
/// gap between the best and worst carrier.
///
/// Returns `None` when the month has no records.
pub fn month_insights(airport: &Airport, month: u32) -> Option<MonthInsights<'_>> {
    let ranked = monthly_ranked(airport, month);
    let best = *ranked.first()?;
    let max_delay = ranked.last().map_or(best.avg_departure_delay, |r| r.avg_departure_delay);

    // stable sort: equal maxima sit at the tail in dataset order
    let worst = ranked
        .iter()
        .copied()
        .find(|r| r.avg_departure_delay == max_delay)
        .unwrap_or(best);

    Some(MonthInsights {
        month,
        month_name: month_name(month)?,
        total_flights: ranked
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.total_flights)),
        weighted_avg_delay: weighted_mean(
            ranked
                .iter()
                .map(|r| (r.avg_departure_delay, r.total_flights)),
        ),
        best_airline: normalize_airline_name(&best.airline),
        best_avg_delay: best.avg_departure_delay,
        best_total_flights: best.total_flights,
        worst_airline: normalize_airline_name(&worst.airline),
        worst_avg_delay: worst.avg_departure_delay,
        delay_spread: worst.avg_departure_delay - best.avg_departure_delay,
    })
}
