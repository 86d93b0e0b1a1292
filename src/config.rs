use clap::Parser;
use std::time::Duration;

use crate::live_scores::api_football::DEFAULT_API_HOST;

/// Live football scores, refreshed periodically from API-Football
#[derive(Parser, Debug, Clone)]
#[command(name = "livescores-sync", version, about)]
pub struct Config {
    /// RapidAPI key sent as X-RapidAPI-Key (every fetch fails as unauthorized without it)
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// RapidAPI host sent as X-RapidAPI-Host
    #[arg(long, env = "RAPIDAPI_HOST", default_value = DEFAULT_API_HOST)]
    pub api_host: String,

    /// Override the API base URL (defaults to https://<api-host>)
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Live scores refresh interval in seconds
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "120")]
    pub refresh_interval_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Only show matches of this league on startup (e.g. "Premier League")
    #[arg(long, env = "LEAGUE_FILTER")]
    pub league: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_host.trim().is_empty() {
            anyhow::bail!("api_host must not be empty");
        }
        if let Some(base) = &self.api_base_url {
            if let Err(e) = url::Url::parse(base) {
                anyhow::bail!("api_base_url '{}' is not a valid URL: {}", base, e);
            }
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
