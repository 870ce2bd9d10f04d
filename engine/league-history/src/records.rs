//! Output records written to the league history tables.
//!
//! Field order here is column order in the synced sheets.

use crate::metrics;
use serde::Serialize;

/// Display name and identifier of a team's primary owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerIdentity {
    pub name: String,
    pub id: String,
}

impl OwnerIdentity {
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    /// Sentinel used whenever owner data can't be read reliably
    pub fn unknown() -> Self {
        Self { name: Self::UNKNOWN_NAME.to_string(), id: String::new() }
    }
}

/// Season stat totals for a team, `0` when the season didn't report them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamStats {
    pub defensive_sacks: i64,
    pub defensive_interceptions: i64,
    pub defensive_fumbles: i64,
    pub defensive_safeties: i64,
    pub defensive_blocked_kicks: i64,
    pub kickoff_return_touchdowns: i64,
    pub punt_return_touchdowns: i64,
    pub interception_return_touchdowns: i64,
    pub fumble_return_touchdowns: i64,
    pub passing_touchdowns: i64,
    pub passing_interceptions: i64,
    pub passing_2pt: i64,
    pub rushing_yards: i64,
    pub rushing_touchdowns: i64,
    pub rushing_2pt: i64,
    pub receiving_yards: i64,
    pub receiving_touchdowns: i64,
    pub receiving_2pt: i64,
    pub receiving_receptions: i64,
    pub fg_made_under40: i64,
    pub fg_made_40to49: i64,
    pub fg_made_50plus: i64,
    pub fg_missed: i64,
    pub extra_points_made: i64,
}

/// Normalized base fields for one (season, team)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamBase {
    pub year: i32,
    pub team_id: i64,
    pub team_name: String,
    pub team_abbrev: String,
    pub owner_name: String,
    pub owner_id: String,
    pub display_name: String,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub games_played: i64,
    pub points_for: f64,
    pub points_against: f64,
    pub standing: i64,
    pub final_standing: i64,
    pub made_playoffs: bool,
    pub won_championship: bool,
    pub playoff_pct: f64,
    pub acquisitions: i64,
    pub acquisition_budget_spent: i64,
    pub drops: i64,
    pub trades: i64,
    #[serde(flatten)]
    pub stats: TeamStats,
}

/// Statistics computed from the base fields on every run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub win_percentage: f64,
    pub avg_points_per_game: f64,
    pub avg_points_differential_per_game: f64,
    pub total_yards: i64,
    pub defensive_return_touchdowns: i64,
    pub total_touchdowns: i64,
    pub total_2pt_conversions: i64,
    pub total_field_goals: i64,
    pub field_goal_percentage: f64,
    pub acquisition_rate: f64,
}

/// One row of the teams table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeasonRecord {
    #[serde(flatten)]
    pub base: TeamBase,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl TeamSeasonRecord {
    pub fn from_base(base: TeamBase) -> Self {
        let metrics = metrics::derive(&base);
        Self { base, metrics }
    }
}

/// One row of the matchups table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupRecord {
    pub year: i32,
    pub week: u32,
    pub home_team: String,
    pub home_score: f64,
    pub away_team: String,
    pub away_score: f64,
}

/// Both collections produced by one run
#[derive(Debug, Clone, Default)]
pub struct LeagueHistory {
    pub teams: Vec<TeamSeasonRecord>,
    pub matchups: Vec<MatchupRecord>,
}

impl LeagueHistory {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.matchups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_column_order() {
        let record = TeamSeasonRecord::from_base(TeamBase { year: 2016, ..Default::default() });
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(&keys[..3], &["year", "team_id", "team_name"]);
        let stats_at = keys.iter().position(|k| *k == "defensive_sacks").unwrap();
        let trades_at = keys.iter().position(|k| *k == "trades").unwrap();
        assert_eq!(stats_at, trades_at + 1);
        assert_eq!(keys.last(), Some(&"acquisition_rate"));
    }

    #[test]
    fn test_unknown_owner() {
        let owner = OwnerIdentity::unknown();
        assert_eq!(owner.name, "Unknown");
        assert!(owner.id.is_empty());
    }
}
