//! Derived team metrics.
//!
//! Every ratio divides by `max(denominator, 1)`, so an empty denominator
//! yields the numerator itself (almost always 0) instead of NaN. Rounding
//! works on the exact decimal value of the float and sends ties to the even
//! digit, so `0.125` rounds to `0.12` while `2.675` (stored just below)
//! rounds to `2.67`.

use crate::records::{DerivedMetrics, TeamBase, TeamStats};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `places` decimals, ties to even. Values outside the decimal
/// range (or NaN) come back unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    exact
        .round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
        .to_string()
        .parse()
        .unwrap_or(value)
}

fn ratio(numerator: f64, denominator: i64) -> f64 {
    numerator / denominator.max(1) as f64
}

/// Upstream counts are unbounded; totals saturate instead of overflowing
fn sum(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
}

pub fn win_percentage(wins: i64, games_played: i64) -> f64 {
    round_to(ratio(wins as f64, games_played) * 100.0, 1)
}

pub fn avg_points_per_game(points_for: f64, games_played: i64) -> f64 {
    round_to(ratio(points_for, games_played), 2)
}

pub fn avg_points_differential_per_game(
    points_for: f64,
    points_against: f64,
    games_played: i64,
) -> f64 {
    round_to(ratio(points_for - points_against, games_played), 2)
}

pub fn defensive_return_touchdowns(stats: &TeamStats) -> i64 {
    sum(&[
        stats.kickoff_return_touchdowns,
        stats.punt_return_touchdowns,
        stats.interception_return_touchdowns,
        stats.fumble_return_touchdowns,
    ])
}

pub fn total_touchdowns(stats: &TeamStats) -> i64 {
    sum(&[
        stats.passing_touchdowns,
        stats.rushing_touchdowns,
        stats.receiving_touchdowns,
        defensive_return_touchdowns(stats),
    ])
}

pub fn total_yards(stats: &TeamStats) -> i64 {
    stats.rushing_yards.saturating_add(stats.receiving_yards)
}

pub fn total_2pt_conversions(stats: &TeamStats) -> i64 {
    sum(&[stats.passing_2pt, stats.rushing_2pt, stats.receiving_2pt])
}

pub fn total_field_goals(stats: &TeamStats) -> i64 {
    sum(&[stats.fg_made_under40, stats.fg_made_40to49, stats.fg_made_50plus])
}

pub fn field_goal_percentage(made: i64, missed: i64) -> f64 {
    round_to(ratio(made as f64, made.saturating_add(missed)) * 100.0, 1)
}

pub fn acquisition_rate(acquisitions: i64, games_played: i64) -> f64 {
    round_to(ratio(acquisitions as f64, games_played), 2)
}

/// Compute every derived metric from normalized base fields
pub fn derive(base: &TeamBase) -> DerivedMetrics {
    let games = base.games_played;
    let field_goals = total_field_goals(&base.stats);

    DerivedMetrics {
        win_percentage: win_percentage(base.wins, games),
        avg_points_per_game: avg_points_per_game(base.points_for, games),
        avg_points_differential_per_game: avg_points_differential_per_game(
            base.points_for,
            base.points_against,
            games,
        ),
        total_yards: total_yards(&base.stats),
        defensive_return_touchdowns: defensive_return_touchdowns(&base.stats),
        total_touchdowns: total_touchdowns(&base.stats),
        total_2pt_conversions: total_2pt_conversions(&base.stats),
        total_field_goals: field_goals,
        field_goal_percentage: field_goal_percentage(field_goals, base.stats.fg_missed),
        acquisition_rate: acquisition_rate(base.acquisitions, games),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(wins: i64, losses: i64, ties: i64) -> TeamBase {
        TeamBase { wins, losses, ties, games_played: wins + losses + ties, ..Default::default() }
    }

    #[test]
    fn test_no_games_played_yields_zero() {
        let metrics = derive(&TeamBase { points_for: 0.0, ..base(0, 0, 0) });
        assert_eq!(metrics.win_percentage, 0.0);
        assert_eq!(metrics.avg_points_per_game, 0.0);
        assert_eq!(metrics.avg_points_differential_per_game, 0.0);
        assert_eq!(metrics.acquisition_rate, 0.0);
        assert!(!metrics.win_percentage.is_nan());
    }

    #[test]
    fn test_win_percentage() {
        let metrics = derive(&base(10, 3, 0));
        assert_eq!(metrics.win_percentage, 76.9);
    }

    #[test]
    fn test_ties_count_as_games() {
        assert_eq!(win_percentage(6, 8), 75.0);
        let metrics = derive(&base(6, 6, 2));
        assert_eq!(metrics.win_percentage, 42.9);
    }

    #[test]
    fn test_point_averages() {
        let metrics = derive(&TeamBase { points_for: 1500.0, points_against: 1400.0, ..base(10, 3, 0) });
        assert_eq!(metrics.avg_points_differential_per_game, 7.69);
        assert_eq!(metrics.avg_points_per_game, 115.38);
    }

    #[test]
    fn test_negative_differential() {
        assert_eq!(avg_points_differential_per_game(1300.0, 1400.0, 13), -7.69);
    }

    #[test]
    fn test_field_goal_percentage() {
        let stats = TeamStats {
            fg_made_under40: 7,
            fg_made_40to49: 3,
            fg_made_50plus: 1,
            fg_missed: 4,
            ..Default::default()
        };
        let metrics = derive(&TeamBase { stats, ..Default::default() });
        assert_eq!(metrics.total_field_goals, 11);
        assert_eq!(metrics.field_goal_percentage, 73.3);
    }

    #[test]
    fn test_no_field_goal_attempts() {
        assert_eq!(field_goal_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_totals() {
        let stats = TeamStats {
            passing_touchdowns: 25,
            rushing_touchdowns: 10,
            receiving_touchdowns: 20,
            kickoff_return_touchdowns: 1,
            punt_return_touchdowns: 1,
            interception_return_touchdowns: 2,
            fumble_return_touchdowns: 1,
            rushing_yards: 1800,
            receiving_yards: 3900,
            passing_2pt: 1,
            rushing_2pt: 2,
            receiving_2pt: 1,
            ..Default::default()
        };
        let metrics = derive(&TeamBase { stats, ..Default::default() });
        assert_eq!(metrics.defensive_return_touchdowns, 5);
        assert_eq!(metrics.total_touchdowns, 60);
        assert_eq!(metrics.total_yards, 5700);
        assert_eq!(metrics.total_2pt_conversions, 4);
    }

    #[test]
    fn test_acquisition_rate() {
        let metrics = derive(&TeamBase { acquisitions: 20, ..base(10, 3, 0) });
        assert_eq!(metrics.acquisition_rate, 1.54);
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(acquisition_rate(1, 8), 0.12);
        assert_eq!(acquisition_rate(3, 8), 0.38);
        assert_eq!(win_percentage(5, 16), 31.2);
        assert_eq!(avg_points_per_game(1234.5, 4), 308.62);
        assert_eq!(field_goal_percentage(1, 15), 6.2);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_round_out_of_range_passthrough() {
        assert_eq!(round_to(1e300, 2), 1e300);
        assert!(round_to(f64::NAN, 1).is_nan());
    }

    #[test]
    fn test_huge_counts_saturate() {
        let stats = TeamStats {
            passing_touchdowns: i64::MAX,
            rushing_touchdowns: 3,
            rushing_yards: i64::MAX,
            receiving_yards: 10,
            fg_made_under40: i64::MAX,
            fg_missed: 2,
            ..Default::default()
        };
        let metrics = derive(&TeamBase { stats, ..Default::default() });
        assert_eq!(metrics.total_touchdowns, i64::MAX);
        assert_eq!(metrics.total_yards, i64::MAX);
        assert_eq!(metrics.total_field_goals, i64::MAX);
        assert_eq!(metrics.field_goal_percentage, 100.0);
    }
}
