use crate::dataset::{AirlinePerformance, Airport};
use crate::views::types::RankOrder;
use crate::views::utility::delay_cmp;

/// Number of carriers shown in the best/worst panels.
pub const DEFAULT_RANK_LIMIT: usize = 5;

/// Ranks an airport's carriers by average departure delay.
///
/// The sort is stable, so carriers with equal delay keep their dataset order.
/// Returns at most `limit` borrowed records; the airport is left untouched.
pub fn rank_airlines(airport: &Airport, order: RankOrder, limit: usize) -> Vec<&AirlinePerformance> {
    let mut ranked: Vec<&AirlinePerformance> = airport.airline_performance.iter().collect();

    match order {
        RankOrder::Ascending => {
            ranked.sort_by(|a, b| delay_cmp(a.avg_departure_delay, b.avg_departure_delay))
        }
        RankOrder::Descending => {
            ranked.sort_by(|a, b| delay_cmp(b.avg_departure_delay, a.avg_departure_delay))
        }
    }

    ranked.truncate(limit);
    ranked
}

/// The `limit` least delayed carriers.
pub fn top_performers(airport: &Airport, limit: usize) -> Vec<&AirlinePerformance> {
    rank_airlines(airport, RankOrder::Ascending, limit)
}

/// The `limit` most delayed carriers.
pub fn worst_performers(airport: &Airport, limit: usize) -> Vec<&AirlinePerformance> {
    rank_airlines(airport, RankOrder::Descending, limit)
}
