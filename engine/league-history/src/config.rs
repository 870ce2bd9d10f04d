//! Configuration for the league history service

use crate::error::HistoryError;
use ::config::{Config, Environment, File};
use espn_fetcher::{EspnAuth, EspnConfig};
use serde::{Deserialize, Serialize};
use sheets_store::SheetsConfig;
use std::path::{Path, PathBuf};

/// Optional config file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "league-history";

/// Environment prefix, e.g. `LEAGUE_HISTORY_LEAGUE__LEAGUE_ID=771239`
pub const ENV_PREFIX: &str = "LEAGUE_HISTORY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    pub league_id: u64,
    pub start_year: i32,
    /// Last season to fetch; the current year when unset
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EspnSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub espn_s2: Option<String>,
    pub swid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsSettings {
    /// Drive folder the tables are kept in
    pub folder_id: String,
    pub table_prefix: String,
    pub service_account_path: PathBuf,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// `pretty`, `json` or `compact`
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueHistoryConfig {
    pub league: LeagueSettings,
    pub espn: EspnSettings,
    pub sheets: SheetsSettings,
    pub logging: LoggingSettings,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self { league_id: 0, start_year: 2012, end_year: None }
    }
}

impl Default for EspnSettings {
    fn default() -> Self {
        let espn = EspnConfig::default();
        Self {
            base_url: espn.base_url,
            request_timeout_secs: espn.request_timeout_secs,
            espn_s2: None,
            swid: None,
        }
    }
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            folder_id: String::new(),
            table_prefix: "Fantasy_Football_Data".to_string(),
            service_account_path: PathBuf::from("service_account.json"),
            request_timeout_secs: 30,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl LeagueHistoryConfig {
    /// Layer the optional config file, an explicit file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, HistoryError> {
        let mut builder =
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_token_fallbacks(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Fill missing ESPN tokens from the conventional `ESPN_S2` / `SWID` variables
    pub fn apply_token_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.espn.espn_s2.as_deref().map_or(true, str::is_empty) {
            self.espn.espn_s2 = lookup("ESPN_S2");
        }
        if self.espn.swid.as_deref().map_or(true, str::is_empty) {
            self.espn.swid = lookup("SWID");
        }
    }

    /// Effective last season, clamped to `current_year`
    pub fn end_year(&self, current_year: i32) -> i32 {
        self.league.end_year.unwrap_or(current_year).min(current_year)
    }

    pub fn validate(&self, current_year: i32) -> Result<(), HistoryError> {
        if self.league.league_id == 0 {
            return Err(HistoryError::invalid_config("league.league_id is not set"));
        }

        let end_year = self.end_year(current_year);
        if self.league.start_year > end_year {
            return Err(HistoryError::invalid_config(format!(
                "league.start_year {} is after the last season {}",
                self.league.start_year, end_year
            )));
        }

        if self.logging.format.parse::<crate::logging::LogFormat>().is_err() {
            return Err(HistoryError::invalid_config(format!(
                "logging.format `{}` is not one of pretty, json, compact",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Checks only needed when writing to Google Sheets
    pub fn validate_sheets(&self) -> Result<(), HistoryError> {
        if self.sheets.folder_id.trim().is_empty() {
            return Err(HistoryError::invalid_config("sheets.folder_id is not set"));
        }
        if self.sheets.table_prefix.trim().is_empty() {
            return Err(HistoryError::invalid_config("sheets.table_prefix is empty"));
        }
        Ok(())
    }

    pub fn espn_auth(&self) -> Option<EspnAuth> {
        EspnAuth::from_parts(self.espn.espn_s2.as_deref(), self.espn.swid.as_deref())
    }

    pub fn espn_config(&self) -> EspnConfig {
        EspnConfig {
            base_url: self.espn.base_url.clone(),
            request_timeout_secs: self.espn.request_timeout_secs,
            ..EspnConfig::default()
        }
    }

    pub fn sheets_config(&self) -> SheetsConfig {
        SheetsConfig { request_timeout_secs: self.sheets.request_timeout_secs, ..SheetsConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LeagueHistoryConfig {
        let mut config = LeagueHistoryConfig::default();
        config.league.league_id = 771239;
        config.sheets.folder_id = "folder-1".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = LeagueHistoryConfig::default();
        assert_eq!(config.league.start_year, 2012);
        assert_eq!(config.sheets.table_prefix, "Fantasy_Football_Data");
        assert_eq!(config.logging.level, "info");
        assert!(config.espn_auth().is_none());
    }

    #[test]
    fn test_missing_league_id_rejected() {
        let err = LeagueHistoryConfig::default().validate(2024).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidConfig { .. }));
    }

    #[test]
    fn test_start_after_end_rejected() {
        let mut config = valid();
        config.league.start_year = 2025;
        assert!(config.validate(2024).is_err());

        config.league.start_year = 2020;
        config.league.end_year = Some(2030);
        assert!(config.validate(2024).is_ok());
        assert_eq!(config.end_year(2024), 2024);
    }

    #[test]
    fn test_bad_log_format_rejected() {
        let mut config = valid();
        config.logging.format = "xml".to_string();
        assert!(config.validate(2024).is_err());
    }

    #[test]
    fn test_sheets_validation() {
        assert!(valid().validate_sheets().is_ok());
        let mut config = valid();
        config.sheets.folder_id = " ".to_string();
        assert!(config.validate_sheets().is_err());
    }

    #[test]
    fn test_token_fallbacks() {
        let mut config = valid();
        config.espn.swid = Some("{CONFIGURED}".to_string());
        config.apply_token_fallbacks(|key| match key {
            "ESPN_S2" => Some("s2-from-env".to_string()),
            "SWID" => Some("{FROM-ENV}".to_string()),
            _ => None,
        });

        let auth = config.espn_auth().unwrap();
        assert_eq!(auth.espn_s2, "s2-from-env");
        assert_eq!(auth.swid, "{CONFIGURED}");
    }

    #[test]
    fn test_deserialize_partial_document() {
        let config: LeagueHistoryConfig = Config::builder()
            .add_source(::config::File::from_str(
                "[league]\nleague_id = 42\nend_year = 2020\n",
                ::config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.league.league_id, 42);
        assert_eq!(config.league.end_year, Some(2020));
        assert_eq!(config.league.start_year, 2012);
        assert_eq!(config.sheets.table_prefix, "Fantasy_Football_Data");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league.toml");
        std::fs::write(
            &path,
            "[league]\nleague_id = 771239\nstart_year = 2016\n\n[sheets]\nfolder_id = \"folder-9\"\n",
        )
        .unwrap();

        let config = LeagueHistoryConfig::load(Some(&path)).unwrap();
        assert_eq!(config.league.league_id, 771239);
        assert_eq!(config.league.start_year, 2016);
        assert_eq!(config.sheets.folder_id, "folder-9");
        assert!(config.validate(2024).is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = LeagueHistoryConfig::load(Some(Path::new("/definitely/not/here/league.toml")));
        assert!(matches!(result, Err(HistoryError::Config(_))));
    }
}
