use serde::{Deserialize, Serialize};

/// Default base path for the ESPN Fantasy Football v3 API
pub const DEFAULT_BASE_URL: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

/// Configuration for the ESPN client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspnConfig {
    /// API base URL (without trailing slash)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for EspnConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            user_agent: format!("league-history/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EspnConfig {
    /// Base URL with any trailing slash removed
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
