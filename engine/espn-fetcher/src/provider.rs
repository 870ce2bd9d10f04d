use crate::models::{LeagueSnapshot, RawGame, SeasonRequest};
use crate::Result;

/// Source of per-season league data
#[async_trait::async_trait]
pub trait LeagueProvider: Send + Sync {
    /// Fetch the teams and season metadata for one league season
    async fn fetch_league(&self, request: &SeasonRequest) -> Result<LeagueSnapshot>;

    /// Fetch the games played in one week of a season
    async fn box_scores(&self, request: &SeasonRequest, week: u32) -> Result<Vec<RawGame>>;
}
