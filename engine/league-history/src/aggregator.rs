//! Builds the full league history one season at a time.
//!
//! Failures never escape: a bad season, week or team is logged with its
//! year/week/team and skipped, and whatever was collected is returned.

use crate::normalizer::{normalize_game, normalize_team, SeasonContext};
use crate::records::{LeagueHistory, TeamSeasonRecord};
use crate::seasons::{AuthRequirement, SeasonAction, SeasonPlan};
use espn_fetcher::{EspnAuth, LeagueProvider, LeagueSnapshot, SeasonRequest};
use tracing::{error, info, warn};

/// Weeks scanned for matchups when the snapshot doesn't report a current week
pub const DEFAULT_SEASON_WEEKS: u32 = 17;

pub struct HistoryAggregator<P> {
    provider: P,
    league_id: u64,
    plan: SeasonPlan,
    auth: Option<EspnAuth>,
    current_year: i32,
}

impl<P: LeagueProvider> HistoryAggregator<P> {
    pub fn new(
        provider: P,
        league_id: u64,
        start_year: i32,
        end_year: i32,
        auth: Option<EspnAuth>,
        current_year: i32,
    ) -> Self {
        let plan = SeasonPlan::new(start_year, end_year, current_year, auth.is_some());
        Self { provider, league_id, plan, auth, current_year }
    }

    pub fn plan(&self) -> &SeasonPlan {
        &self.plan
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn fetch_league_history(&self) -> LeagueHistory {
        let mut history = LeagueHistory::default();

        for decision in self.plan.iter() {
            let year = decision.year;
            let (auth, matchups) = match decision.action {
                SeasonAction::Skip(reason) => {
                    info!(year, %reason, "Skipping season");
                    continue;
                }
                SeasonAction::Fetch { auth, matchups } => (auth, matchups),
            };

            let request = SeasonRequest {
                league_id: self.league_id,
                year,
                auth: match auth {
                    AuthRequirement::Required => self.auth.clone(),
                    AuthRequirement::None => None,
                },
            };

            info!(year, "Fetching season");
            let snapshot = match self.provider.fetch_league(&request).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!(year, error = %e, "Failed to fetch season, continuing with next year");
                    continue;
                }
            };

            let teams_before = history.teams.len();
            self.collect_teams(year, &snapshot, &mut history);

            let matchups_before = history.matchups.len();
            if matchups {
                self.collect_matchups(&request, &snapshot, &mut history).await;
            }

            info!(
                year,
                teams = history.teams.len() - teams_before,
                matchups = history.matchups.len() - matchups_before,
                "Season complete"
            );
        }

        info!(
            teams = history.teams.len(),
            matchups = history.matchups.len(),
            "League history aggregated"
        );
        history
    }

    fn collect_teams(&self, year: i32, snapshot: &LeagueSnapshot, history: &mut LeagueHistory) {
        let ctx = SeasonContext {
            year,
            in_progress: year >= self.current_year,
            playoff_team_count: snapshot.playoff_team_count,
        };

        for (index, raw) in snapshot.teams.iter().enumerate() {
            if !raw.is_object() {
                warn!(year, index, "Skipping malformed team record");
                continue;
            }

            let record = TeamSeasonRecord::from_base(normalize_team(raw, &ctx));
            info!(year, team = %record.base.team_name, "Collected team");
            history.teams.push(record);
        }
    }

    async fn collect_matchups(
        &self,
        request: &SeasonRequest,
        snapshot: &LeagueSnapshot,
        history: &mut LeagueHistory,
    ) {
        let year = request.year;
        let weeks = match snapshot.current_week {
            0 => DEFAULT_SEASON_WEEKS,
            week => week,
        };

        for week in 1..=weeks {
            match self.provider.box_scores(request, week).await {
                Ok(games) => {
                    let before = history.matchups.len();
                    history
                        .matchups
                        .extend(games.iter().filter_map(|game| normalize_game(game, year, week)));
                    info!(year, week, games = history.matchups.len() - before, "Collected matchups");
                }
                Err(e) => {
                    warn!(year, week, error = %e, "Failed to fetch week, continuing with next week");
                }
            }
        }
    }
}
