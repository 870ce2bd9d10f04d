//! Field normalization from upstream attribute bags into fixed-shape records

use crate::records::{MatchupRecord, OwnerIdentity, TeamBase, TeamStats};
use espn_fetcher::{RawGame, RawTeam};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Season-level facts the normalizer needs beyond the team itself
#[derive(Debug, Clone, Copy)]
pub struct SeasonContext {
    pub year: i32,
    /// Final placement is not yet decided
    pub in_progress: bool,
    /// `0` when the league settings didn't say
    pub playoff_team_count: u32,
}

/// Why owner data fell back to the sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerIssue {
    MissingOwners,
    NotASequence,
    EmptyOwners,
    NotAMapping,
    IncompleteName,
}

impl fmt::Display for OwnerIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            OwnerIssue::MissingOwners => "team has no owners attribute",
            OwnerIssue::NotASequence => "owners is not a list",
            OwnerIssue::EmptyOwners => "owners list is empty",
            OwnerIssue::NotAMapping => "first owner is not a mapping",
            OwnerIssue::IncompleteName => "first owner lacks firstName or lastName",
        };
        f.write_str(reason)
    }
}

fn first_owner(raw: &RawTeam) -> Result<&serde_json::Map<String, Value>, OwnerIssue> {
    let owners = raw.owners().ok_or(OwnerIssue::MissingOwners)?;
    let owners = owners.as_array().ok_or(OwnerIssue::NotASequence)?;
    let first = owners.first().ok_or(OwnerIssue::EmptyOwners)?;
    first.as_object().ok_or(OwnerIssue::NotAMapping)
}

pub fn extract_owner(raw: &RawTeam) -> Result<OwnerIdentity, OwnerIssue> {
    let owner = first_owner(raw)?;

    let first_name = owner.get("firstName").and_then(Value::as_str);
    let last_name = owner.get("lastName").and_then(Value::as_str);
    let (Some(first_name), Some(last_name)) = (first_name, last_name) else {
        return Err(OwnerIssue::IncompleteName);
    };

    let id = owner
        .get("id")
        .and_then(Value::as_str)
        .map(|id| id.trim_matches(|c| c == '{' || c == '}').to_string())
        .unwrap_or_default();

    Ok(OwnerIdentity { name: format!("{} {}", first_name, last_name), id })
}

/// Owner name and id, or the `("Unknown", "")` sentinel. Never fails.
pub fn owner_identity(raw: &RawTeam) -> OwnerIdentity {
    match extract_owner(raw) {
        Ok(owner) => owner,
        Err(issue) => {
            warn!(team = %raw.text("team_name"), reason = %issue, "Owner data unavailable, using sentinel");
            OwnerIdentity::unknown()
        }
    }
}

fn display_name(raw: &RawTeam) -> String {
    first_owner(raw)
        .ok()
        .and_then(|owner| owner.get("displayName"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn team_stats(raw: &RawTeam) -> TeamStats {
    TeamStats {
        defensive_sacks: raw.stat("defensiveSacks"),
        defensive_interceptions: raw.stat("defensiveInterceptions"),
        defensive_fumbles: raw.stat("defensiveFumbles"),
        defensive_safeties: raw.stat("defensiveSafeties"),
        defensive_blocked_kicks: raw.stat("defensiveBlockedKicks"),
        kickoff_return_touchdowns: raw.stat("kickoffReturnTouchdowns"),
        punt_return_touchdowns: raw.stat("puntReturnTouchdowns"),
        interception_return_touchdowns: raw.stat("interceptionReturnTouchdowns"),
        fumble_return_touchdowns: raw.stat("fumbleReturnTouchdowns"),
        passing_touchdowns: raw.stat("passingTouchdowns"),
        passing_interceptions: raw.stat("passingInterceptions"),
        passing_2pt: raw.stat("passing2PtConversions"),
        rushing_yards: raw.stat("rushingYards"),
        rushing_touchdowns: raw.stat("rushingTouchdowns"),
        rushing_2pt: raw.stat("rushing2PtConversions"),
        receiving_yards: raw.stat("receivingYards"),
        receiving_touchdowns: raw.stat("receivingTouchdowns"),
        receiving_2pt: raw.stat("receiving2PtConversions"),
        receiving_receptions: raw.stat("receivingReceptions"),
        fg_made_under40: raw.stat("madeFieldGoalsFromUnder40"),
        fg_made_40to49: raw.stat("madeFieldGoalsFrom40To49"),
        fg_made_50plus: raw.stat("madeFieldGoalsFrom50Plus"),
        fg_missed: raw.stat("missedFieldGoals"),
        extra_points_made: raw.stat("madeExtraPoints"),
    }
}

/// Map one upstream team into the fixed team schema, defaulting absent fields
pub fn normalize_team(raw: &RawTeam, ctx: &SeasonContext) -> TeamBase {
    let owner = owner_identity(raw);

    let wins = raw.int("wins");
    let losses = raw.int("losses");
    let ties = raw.int("ties");
    let standing = raw.int("standing");

    // Placement only exists once the season is over.
    let (final_standing, made_playoffs, won_championship) = if ctx.in_progress {
        (0, false, false)
    } else {
        let final_standing = raw.int("final_standing");
        let playoff_teams = i64::from(ctx.playoff_team_count);
        let made_playoffs = raw
            .flag("made_playoffs")
            .unwrap_or(standing > 0 && standing <= playoff_teams);
        (final_standing, made_playoffs, final_standing == 1)
    };

    let base = TeamBase {
        year: ctx.year,
        team_id: raw.int("team_id"),
        team_name: raw.text("team_name"),
        team_abbrev: raw.text("team_abbrev"),
        owner_name: owner.name,
        owner_id: owner.id,
        display_name: display_name(raw),
        wins,
        losses,
        ties,
        games_played: wins.saturating_add(losses).saturating_add(ties),
        points_for: raw.float("points_for"),
        points_against: raw.float("points_against"),
        standing,
        final_standing,
        made_playoffs,
        won_championship,
        playoff_pct: raw.float("playoff_pct"),
        acquisitions: raw.int("acquisitions"),
        acquisition_budget_spent: raw.int("acquisition_budget_spent"),
        drops: raw.int("drops"),
        trades: raw.int("trades"),
        stats: team_stats(raw),
    };

    debug!(year = ctx.year, team = %base.team_name, owner = %base.owner_name, "Normalized team");
    base
}

/// Map one upstream game; `None` when either side is missing
pub fn normalize_game(raw: &RawGame, year: i32, week: u32) -> Option<MatchupRecord> {
    let (Some(home_team), Some(away_team)) = (raw.home_team(), raw.away_team()) else {
        debug!(year, week, "Dropping game with a missing side");
        return None;
    };

    Some(MatchupRecord {
        year,
        week,
        home_team,
        home_score: raw.home_score(),
        away_team,
        away_score: raw.away_score(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completed(year: i32) -> SeasonContext {
        SeasonContext { year, in_progress: false, playoff_team_count: 4 }
    }

    #[test]
    fn test_owner_extraction() {
        let raw = RawTeam::new(json!({
            "owners": [{ "firstName": "Jane", "lastName": "Doe", "id": "{ABC-123}" }]
        }));
        assert_eq!(
            owner_identity(&raw),
            OwnerIdentity { name: "Jane Doe".to_string(), id: "ABC-123".to_string() }
        );
    }

    #[test]
    fn test_owner_sentinel_cases() {
        let cases = [
            (json!({}), OwnerIssue::MissingOwners),
            (json!({ "owners": "{ABC}" }), OwnerIssue::NotASequence),
            (json!({ "owners": [] }), OwnerIssue::EmptyOwners),
            (json!({ "owners": ["{ABC-123}"] }), OwnerIssue::NotAMapping),
            (json!({ "owners": [{ "firstName": "Jane", "id": "{ABC}" }] }), OwnerIssue::IncompleteName),
        ];

        for (value, issue) in cases {
            let raw = RawTeam::new(value);
            assert_eq!(extract_owner(&raw), Err(issue));
            assert_eq!(owner_identity(&raw), OwnerIdentity::unknown());
        }
    }

    #[test]
    fn test_owner_without_id() {
        let raw = RawTeam::new(json!({ "owners": [{ "firstName": "Jane", "lastName": "Doe" }] }));
        assert_eq!(owner_identity(&raw).id, "");
    }

    #[test]
    fn test_absent_fields_default() {
        let base = normalize_team(&RawTeam::new(json!({ "team_name": "Sharks" })), &completed(2015));
        assert_eq!(base.year, 2015);
        assert_eq!(base.team_name, "Sharks");
        assert_eq!(base.team_abbrev, "");
        assert_eq!(base.games_played, 0);
        assert_eq!(base.points_for, 0.0);
        assert_eq!(base.stats, TeamStats::default());
        assert_eq!(base.owner_name, "Unknown");
        assert_eq!(base.display_name, "");
        assert!(!base.made_playoffs);
    }

    #[test]
    fn test_completed_season_championship() {
        let raw = RawTeam::new(json!({
            "team_name": "Sharks",
            "wins": 10, "losses": 3, "ties": 1,
            "standing": 2, "final_standing": 1,
            "owners": [{ "firstName": "Jane", "lastName": "Doe", "displayName": "jdoe", "id": "{A}" }],
            "stats": { "madeFieldGoalsFromUnder40": 7, "missedFieldGoals": 4 }
        }));
        let base = normalize_team(&raw, &completed(2021));
        assert_eq!(base.games_played, 14);
        assert_eq!(base.display_name, "jdoe");
        assert_eq!(base.final_standing, 1);
        assert!(base.made_playoffs);
        assert!(base.won_championship);
        assert_eq!(base.stats.fg_made_under40, 7);
        assert_eq!(base.stats.fg_missed, 4);
    }

    #[test]
    fn test_missed_playoffs_by_seed() {
        let raw = RawTeam::new(json!({ "standing": 5, "final_standing": 5 }));
        let base = normalize_team(&raw, &completed(2021));
        assert!(!base.made_playoffs);
        assert!(!base.won_championship);
    }

    #[test]
    fn test_in_progress_season_forces_placement_to_unknown() {
        let raw = RawTeam::new(json!({
            "standing": 1, "final_standing": 1, "made_playoffs": true
        }));
        let ctx = SeasonContext { year: 2024, in_progress: true, playoff_team_count: 4 };
        let base = normalize_team(&raw, &ctx);
        assert_eq!(base.standing, 1);
        assert_eq!(base.final_standing, 0);
        assert!(!base.made_playoffs);
        assert!(!base.won_championship);
    }

    #[test]
    fn test_normalize_game() {
        let game = RawGame::new(json!({
            "home_team": "Sharks", "home_score": 101.5, "away_team": "Bears", "away_score": 99.0
        }));
        let record = normalize_game(&game, 2020, 3).unwrap();
        assert_eq!(record.week, 3);
        assert_eq!(record.home_team, "Sharks");
        assert_eq!(record.away_score, 99.0);
    }

    #[test]
    fn test_game_missing_side_is_dropped() {
        let bye = RawGame::new(json!({ "home_team": "Sharks", "home_score": 88.0 }));
        assert!(normalize_game(&bye, 2020, 3).is_none());
    }

    #[test]
    fn test_oversized_counts_do_not_overflow() {
        let raw = RawTeam::new(json!({ "team_name": "Sharks", "wins": 1e300, "losses": 1, "ties": 1 }));
        let base = normalize_team(&raw, &completed(2016));
        assert_eq!(base.wins, i64::MAX);
        assert_eq!(base.games_played, i64::MAX);

        let record = crate::records::TeamSeasonRecord::from_base(base);
        assert_eq!(record.metrics.win_percentage, 100.0);
    }
}
