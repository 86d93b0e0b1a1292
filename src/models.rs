use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NetworkError;
use crate::live_scores::Endpoint;

/// Provider-assigned fixture identifier. API-Football sends integers, but
/// some mirrors send them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureId {
    Number(u64),
    Text(String),
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureId::Number(n) => write!(f, "{}", n),
            FixtureId::Text(s) => f.write_str(s),
        }
    }
}

/// A live, in-play or finished fixture as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: FixtureId,
    /// Competition display name
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    /// Short status code: "FT" once finished, "1H" / "HT" / "2H" / ... otherwise
    pub status: String,
    /// Minutes played, 0 when the provider does not report it
    pub elapsed_minutes: u32,
    pub home_logo_url: Option<String>,
    pub away_logo_url: Option<String>,
}

impl Match {
    pub fn is_finished(&self) -> bool {
        self.status == "FT"
    }

    /// Badge text: "Full Time" for finished matches, otherwise the minute, e.g. "31'".
    pub fn status_label(&self) -> String {
        if self.is_finished() {
            "Full Time".to_string()
        } else {
            format!("{}'", self.elapsed_minutes)
        }
    }

    pub fn scoreline(&self) -> String {
        format!("{} - {}", self.home_score, self.away_score)
    }
}

/// A domestic league competition (cups are filtered out during normalization)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub logo_url: Option<String>,
}

impl League {
    /// "Premier League (England)"
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.country)
    }
}

/// Observable description of a failed fetch, kept in the view model until
/// the next successful fetch of the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub endpoint: Endpoint,
    /// Short user-facing message
    pub message: String,
    /// Underlying error text
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

impl SyncFailure {
    pub fn from_network(endpoint: Endpoint, err: &NetworkError) -> Self {
        let message = match endpoint {
            Endpoint::Fixtures { .. } => "Failed to fetch live scores",
            Endpoint::Leagues => "Failed to fetch leagues",
        };
        SyncFailure {
            endpoint,
            message: message.to_string(),
            detail: err.to_string(),
            occurred_at: Utc::now(),
        }
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.detail)
    }
}

/// Everything a renderer needs, written only by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Latest fixtures snapshot, replaced wholesale on every successful fetch
    pub matches: Vec<Match>,
    /// Fetched once per session
    pub leagues: Vec<League>,
    /// When set, only matches of this league are visible
    pub selected_league: Option<String>,
    /// True while the latest fixtures request is in flight
    pub is_loading: bool,
    pub last_error: Option<SyncFailure>,
    pub leagues_error: Option<SyncFailure>,
    /// When the current `matches` snapshot was applied
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for ViewModel {
    fn default() -> Self {
        ViewModel {
            matches: Vec::new(),
            leagues: Vec::new(),
            selected_league: None,
            is_loading: true,
            last_error: None,
            leagues_error: None,
            last_updated: None,
        }
    }
}

impl ViewModel {
    /// Matches after applying the league filter, in provider order.
    pub fn visible_matches(&self) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| match &self.selected_league {
                Some(league) => &m.league == league,
                None => true,
            })
            .collect()
    }
}
