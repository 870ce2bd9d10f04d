//! # League History
//!
//! Pulls multi-season fantasy football league data, normalizes it into a
//! fixed team schema with derived metrics, and reconciles the result into
//! named tables in a remote tabular store.
//!
//! ## Pipeline
//!
//! 1. [`seasons::SeasonPlan`] decides per year whether to fetch, with or
//!    without session credentials, and whether weekly matchups exist.
//! 2. [`aggregator::HistoryAggregator`] fetches through a
//!    [`espn_fetcher::LeagueProvider`], normalizing every team and game.
//! 3. [`sync::SyncEngine`] writes each collection through a
//!    [`sheets_store::TableStore`] so reruns replace rather than duplicate.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod records;
pub mod seasons;
pub mod sync;

#[cfg(test)]
mod testing;

pub use aggregator::HistoryAggregator;
pub use config::LeagueHistoryConfig;
pub use error::{HistoryError, SyncError};
pub use records::{LeagueHistory, MatchupRecord, OwnerIdentity, TeamSeasonRecord};
pub use seasons::SeasonPlan;
pub use sync::{SyncEngine, SyncReport, SyncTarget};

pub type Result<T> = std::result::Result<T, HistoryError>;
