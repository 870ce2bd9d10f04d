//! ESPN Fantasy Football Fetcher
//!
//! This crate fetches league snapshots (teams, owners, standings, transaction
//! counters, stat totals) and weekly box scores from the ESPN fantasy API.
//! Every record is handed out as a loosely-typed attribute bag because the
//! set of attributes ESPN returns drifts from season to season.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod provider;
pub mod stats;

pub use config::EspnConfig;
pub use error::FetchError;
pub use fetcher::EspnClient;
pub use models::*;
pub use provider::LeagueProvider;

pub type Result<T> = std::result::Result<T, FetchError>;
