//! League History
//!
//! Fetches every configured season of a fantasy league, derives the team
//! metrics and syncs the teams and matchups tables into a Drive folder.

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use espn_fetcher::EspnClient;
use league_history::config::LeagueHistoryConfig;
use league_history::logging::{initialize_logging, report_failure};
use league_history::{HistoryAggregator, LeagueHistory, SyncEngine, SyncTarget};
use sheets_store::{GoogleSheetsStore, MemoryTableStore, ServiceAccountAuth, TableStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Aggregate fantasy league history and sync it to Google Sheets
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file layered over `league-history.*` and under the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ESPN league id
    #[arg(long)]
    league_id: Option<u64>,

    /// First season to fetch
    #[arg(long)]
    start_year: Option<i32>,

    /// Last season to fetch (clamped to the current year)
    #[arg(long)]
    end_year: Option<i32>,

    /// Fetch and normalize, but write into an in-memory store instead of Google Sheets
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Logging first, with default settings when the config does not load
    let loaded = LeagueHistoryConfig::load(args.config.as_deref());
    let logging = loaded.as_ref().map(|config| config.logging.clone()).unwrap_or_default();
    initialize_logging(&logging)?;
    info!("Starting League History v{}", env!("CARGO_PKG_VERSION"));

    let result = match loaded {
        Ok(config) => run(args, config).await,
        Err(e) => Err(anyhow::Error::new(e).context("Failed to load configuration")),
    };
    report_failure(result)
}

async fn run(args: Args, mut config: LeagueHistoryConfig) -> Result<()> {
    if let Some(league_id) = args.league_id {
        config.league.league_id = league_id;
    }
    if let Some(start_year) = args.start_year {
        config.league.start_year = start_year;
    }
    if args.end_year.is_some() {
        config.league.end_year = args.end_year;
    }

    let current_year = chrono::Utc::now().year();
    config.validate(current_year).context("Invalid configuration")?;

    let auth = config.espn_auth();
    if auth.is_none() {
        warn!("ESPN_S2/SWID not set, seasons from 2018 on will be skipped");
    }

    let start_year = config.league.start_year;
    let end_year = config.end_year(current_year);
    info!(league_id = config.league.league_id, start_year, end_year, "Aggregating league history");

    let client = EspnClient::new(config.espn_config()).context("Failed to build ESPN client")?;
    let aggregator =
        HistoryAggregator::new(client, config.league.league_id, start_year, end_year, auth, current_year);
    let history = aggregator.fetch_league_history().await;

    if history.is_empty() {
        warn!("No league data collected");
    }

    let target = SyncTarget {
        prefix: config.sheets.table_prefix.clone(),
        container_id: config.sheets.folder_id.clone(),
        start_year,
        end_year,
    };

    if args.dry_run {
        info!("Dry run, syncing into an in-memory store");
        export(MemoryTableStore::new(), target, &history).await?;
        return Ok(());
    }

    config.validate_sheets().context("Invalid Google Sheets configuration")?;

    let sheets_config = config.sheets_config();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(sheets_config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    let service_account = ServiceAccountAuth::from_file(&config.sheets.service_account_path, http.clone())
        .with_context(|| {
            format!("Failed to load service account from {}", config.sheets.service_account_path.display())
        })?;
    info!(account = service_account.client_email(), "Loaded service account");

    let store = GoogleSheetsStore::new(sheets_config, http, service_account);
    export(store, target, &history).await
}

async fn export<S: TableStore>(store: S, target: SyncTarget, history: &LeagueHistory) -> Result<()> {
    let engine = SyncEngine::new(store, target);
    let reports = engine.export(history).await.context("Failed to sync league history")?;

    for report in &reports {
        info!(
            collection = %report.collection,
            table = %report.table_name,
            id = %report.table_id,
            created = report.created,
            rows = report.rows_written,
            "Collection synced"
        );
    }
    info!(teams = history.teams.len(), matchups = history.matchups.len(), "League history export complete");
    Ok(())
}
