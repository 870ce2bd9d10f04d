//! Scripted league provider for pipeline tests

use espn_fetcher::{FetchError, LeagueProvider, LeagueSnapshot, RawGame, RawTeam, SeasonRequest};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One recorded provider call: `(year, week, had_auth)`, week `None` for season fetches
pub type Call = (i32, Option<u32>, bool);

#[derive(Default)]
pub struct FakeProvider {
    seasons: BTreeMap<i32, LeagueSnapshot>,
    failing_seasons: BTreeSet<i32>,
    weeks: BTreeMap<(i32, u32), Vec<RawGame>>,
    failing_weeks: BTreeSet<(i32, u32)>,
    calls: Mutex<Vec<Call>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_season(mut self, year: i32, current_week: u32, teams: Vec<Value>) -> Self {
        self.seasons.insert(
            year,
            LeagueSnapshot {
                year,
                teams: teams.into_iter().map(RawTeam::new).collect(),
                current_week,
                playoff_team_count: 4,
            },
        );
        self
    }

    pub fn with_failing_season(mut self, year: i32) -> Self {
        self.failing_seasons.insert(year);
        self
    }

    pub fn with_games(mut self, year: i32, week: u32, games: Vec<Value>) -> Self {
        self.weeks.insert((year, week), games.into_iter().map(RawGame::new).collect());
        self
    }

    pub fn with_failing_week(mut self, year: i32, week: u32) -> Self {
        self.failing_weeks.insert((year, week));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn season_calls(&self) -> Vec<i32> {
        self.calls().into_iter().filter(|(_, week, _)| week.is_none()).map(|(year, _, _)| year).collect()
    }

    fn unavailable(year: i32) -> FetchError {
        FetchError::Status { year, status: 503, body: "unavailable".to_string() }
    }
}

#[async_trait::async_trait]
impl LeagueProvider for FakeProvider {
    async fn fetch_league(&self, request: &SeasonRequest) -> espn_fetcher::Result<LeagueSnapshot> {
        self.calls.lock().push((request.year, None, request.auth.is_some()));

        if self.failing_seasons.contains(&request.year) {
            return Err(Self::unavailable(request.year));
        }
        self.seasons.get(&request.year).cloned().ok_or_else(|| FetchError::Status {
            year: request.year,
            status: 404,
            body: "not found".to_string(),
        })
    }

    async fn box_scores(&self, request: &SeasonRequest, week: u32) -> espn_fetcher::Result<Vec<RawGame>> {
        self.calls.lock().push((request.year, Some(week), request.auth.is_some()));

        if self.failing_weeks.contains(&(request.year, week)) {
            return Err(Self::unavailable(request.year));
        }
        Ok(self.weeks.get(&(request.year, week)).cloned().unwrap_or_default())
    }
}
