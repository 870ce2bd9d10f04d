use crate::config::EspnConfig;
use crate::error::FetchError;
use crate::models::*;
use crate::provider::LeagueProvider;
use crate::stats::stat_name;
use crate::Result;
use reqwest::header::COOKIE;
use reqwest::Client;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Seasons before this year are only served by the `leagueHistory` endpoint
const LEGACY_ENDPOINT_BEFORE: i32 = 2018;

const LEAGUE_VIEWS: &[&str] = &["mTeam", "mStandings", "mSettings"];
const BOX_SCORE_VIEWS: &[&str] = &["mMatchupScore", "mTeam"];

/// HTTP client for the ESPN fantasy football API
pub struct EspnClient {
    config: EspnConfig,
    client: Client,
}

impl EspnClient {
    /// Create a new client instance
    pub fn new(config: EspnConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// URL serving the given season, plus whether it is the legacy history endpoint
    fn season_url(&self, request: &SeasonRequest) -> (String, bool) {
        if request.year < LEGACY_ENDPOINT_BEFORE {
            (format!("{}/leagueHistory/{}", self.config.base(), request.league_id), true)
        } else {
            (
                format!(
                    "{}/seasons/{}/segments/0/leagues/{}",
                    self.config.base(),
                    request.year,
                    request.league_id
                ),
                false,
            )
        }
    }

    async fn get_season_json(
        &self,
        request: &SeasonRequest,
        views: &[&str],
        scoring_period: Option<u32>,
    ) -> Result<Value> {
        let (url, legacy) = self.season_url(request);

        let mut params: Vec<(&str, String)> =
            views.iter().map(|view| ("view", view.to_string())).collect();
        if legacy {
            params.push(("seasonId", request.year.to_string()));
        }
        if let Some(period) = scoring_period {
            params.push(("scoringPeriodId", period.to_string()));
        }

        debug!(year = request.year, url = %url, "Requesting ESPN season data");

        let mut builder = self.client.get(&url).query(&params);
        if let Some(auth) = &request.auth {
            builder = builder.header(COOKIE, auth.cookie_header());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { year: request.year, status: status.as_u16(), body });
        }

        let value: Value = response.json().await?;
        if legacy {
            first_history_entry(request.year, value)
        } else {
            Ok(value)
        }
    }
}

#[async_trait::async_trait]
impl LeagueProvider for EspnClient {
    async fn fetch_league(&self, request: &SeasonRequest) -> Result<LeagueSnapshot> {
        info!(year = request.year, league_id = request.league_id, "Fetching league snapshot");

        let value = self.get_season_json(request, LEAGUE_VIEWS, None).await?;
        let snapshot = parse_league_snapshot(request.year, &value)?;

        info!(
            year = request.year,
            teams = snapshot.teams.len(),
            current_week = snapshot.current_week,
            "Fetched league snapshot"
        );
        Ok(snapshot)
    }

    async fn box_scores(&self, request: &SeasonRequest, week: u32) -> Result<Vec<RawGame>> {
        let value = self.get_season_json(request, BOX_SCORE_VIEWS, Some(week)).await?;
        let games = parse_box_scores(request.year, week, &value)?;

        debug!(year = request.year, week, games = games.len(), "Fetched box scores");
        Ok(games)
    }
}

/// The legacy endpoint answers with an array holding one league per season
fn first_history_entry(year: i32, value: Value) -> Result<Value> {
    match value {
        Value::Array(entries) => entries.into_iter().next().ok_or_else(|| FetchError::UnexpectedShape {
            year,
            message: "league history response is empty".to_string(),
        }),
        other => Ok(other),
    }
}

/// Convert an ESPN league document into a snapshot of flattened team bags
pub fn parse_league_snapshot(year: i32, league: &Value) -> Result<LeagueSnapshot> {
    let teams = league.get("teams").and_then(Value::as_array).ok_or_else(|| {
        FetchError::UnexpectedShape { year, message: "missing `teams` array".to_string() }
    })?;

    let members: HashMap<&str, &Value> = league
        .get("members")
        .and_then(Value::as_array)
        .map(|members| {
            members
                .iter()
                .filter_map(|m| m.get("id").and_then(Value::as_str).map(|id| (id, m)))
                .collect()
        })
        .unwrap_or_default();

    let current_week = league
        .pointer("/status/currentMatchupPeriod")
        .or_else(|| league.get("scoringPeriodId"))
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    let playoff_team_count = league
        .pointer("/settings/scheduleSettings/playoffTeamCount")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    Ok(LeagueSnapshot {
        year,
        teams: teams.iter().map(|team| flatten_team(team, &members)).collect(),
        current_week,
        playoff_team_count,
    })
}

/// Flatten one ESPN team document into the attribute names the history uses.
/// Attributes missing upstream stay missing.
fn flatten_team(team: &Value, members: &HashMap<&str, &Value>) -> RawTeam {
    if !team.is_object() {
        return RawTeam::new(team.clone());
    }

    let mut out = Map::new();
    put(&mut out, "team_id", team.get("id"));
    put(&mut out, "team_abbrev", team.get("abbrev"));

    if let Some(name) = team_name(team) {
        out.insert("team_name".to_string(), Value::String(name));
    }

    if let Some(owners) = team.get("owners").and_then(Value::as_array) {
        let resolved = owners
            .iter()
            .map(|owner| match owner.as_str() {
                Some(id) => members
                    .get(id)
                    .map(|member| (*member).clone())
                    .unwrap_or_else(|| serde_json::json!({ "id": id })),
                None => owner.clone(),
            })
            .collect();
        out.insert("owners".to_string(), Value::Array(resolved));
    }

    if let Some(overall) = team.pointer("/record/overall") {
        put(&mut out, "wins", overall.get("wins"));
        put(&mut out, "losses", overall.get("losses"));
        put(&mut out, "ties", overall.get("ties"));
        put(&mut out, "points_for", overall.get("pointsFor"));
        put(&mut out, "points_against", overall.get("pointsAgainst"));
    }

    put(&mut out, "standing", team.get("playoffSeed"));
    put(&mut out, "final_standing", team.get("rankCalculatedFinal"));
    put(&mut out, "playoff_pct", team.pointer("/currentSimulationResults/playoffPct"));

    if let Some(counter) = team.get("transactionCounter") {
        put(&mut out, "acquisitions", counter.get("acquisitions"));
        put(&mut out, "acquisition_budget_spent", counter.get("acquisitionBudgetSpent"));
        put(&mut out, "drops", counter.get("drops"));
        put(&mut out, "trades", counter.get("trades"));
    }

    if let Some(values) = team.get("valuesByStat").and_then(Value::as_object) {
        let stats: Map<String, Value> = values
            .iter()
            .filter_map(|(id, value)| {
                let name = id.parse().ok().and_then(stat_name)?;
                Some((name.to_string(), value.clone()))
            })
            .collect();
        out.insert("stats".to_string(), Value::Object(stats));
    }

    RawTeam::new(Value::Object(out))
}

fn team_name(team: &Value) -> Option<String> {
    if let Some(name) = team.get("name").and_then(Value::as_str).filter(|n| !n.trim().is_empty()) {
        return Some(name.trim().to_string());
    }

    let location = team.get("location").and_then(Value::as_str).unwrap_or("");
    let nickname = team.get("nickname").and_then(Value::as_str).unwrap_or("");
    let joined = format!("{} {}", location.trim(), nickname.trim()).trim().to_string();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn put(out: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(value) = value.filter(|v| !v.is_null()) {
        out.insert(key.to_string(), value.clone());
    }
}

/// Extract the games of one matchup period from an ESPN schedule document
pub fn parse_box_scores(year: i32, week: u32, league: &Value) -> Result<Vec<RawGame>> {
    let schedule = league.get("schedule").and_then(Value::as_array).ok_or_else(|| {
        FetchError::UnexpectedShape { year, message: format!("missing `schedule` for week {}", week) }
    })?;

    let names: HashMap<u64, String> = league
        .get("teams")
        .and_then(Value::as_array)
        .map(|teams| {
            teams
                .iter()
                .filter_map(|t| Some((t.get("id")?.as_u64()?, team_name(t)?)))
                .collect()
        })
        .unwrap_or_default();

    let games = schedule
        .iter()
        .filter(|entry| {
            entry.get("matchupPeriodId").and_then(Value::as_u64) == Some(u64::from(week))
        })
        .map(|entry| {
            let mut game = Map::new();
            for (side, name_key, score_key) in
                [("home", "home_team", "home_score"), ("away", "away_team", "away_score")]
            {
                let Some(side) = entry.get(side) else { continue };
                if let Some(name) =
                    side.get("teamId").and_then(Value::as_u64).and_then(|id| names.get(&id))
                {
                    game.insert(name_key.to_string(), Value::String(name.clone()));
                }
                put(&mut game, score_key, side.get("totalPoints"));
            }
            RawGame::new(Value::Object(game))
        })
        .collect();

    Ok(games)
}
