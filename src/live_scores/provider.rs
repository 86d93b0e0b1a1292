use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::error::NetworkError;

/// Remote resource a data source can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endpoint {
    /// `/v3/fixtures`, restricted to in-play fixtures when `live_only`
    Fixtures { live_only: bool },
    /// `/v3/leagues`
    Leagues,
}

impl Endpoint {
    pub fn live_fixtures() -> Self {
        Endpoint::Fixtures { live_only: true }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Fixtures { live_only: true } => f.write_str("fixtures?live=all"),
            Endpoint::Fixtures { live_only: false } => f.write_str("fixtures"),
            Endpoint::Leagues => f.write_str("leagues"),
        }
    }
}

/// Trait that every football data source must implement.
///
/// One call is one request: implementations never retry and never touch
/// shared state. Retry policy belongs to the scheduler.
#[async_trait]
pub trait FootballDataSource: Send + Sync {
    /// Return the raw records found under the payload's `response` array.
    async fn fetch(&self, endpoint: Endpoint) -> Result<Vec<serde_json::Value>, NetworkError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
