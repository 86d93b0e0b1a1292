//! Projection of loosely-typed API-Football records into [`Match`] and
//! [`League`].
//!
//! Both entry points are pure: identical input always yields identical
//! output, and a malformed record only costs that record. Rejected records
//! are returned alongside the items so the caller decides how to report them.

use serde_json::Value;

use crate::error::MalformedRecordError;
use crate::models::{FixtureId, League, Match};

/// Leagues retained after filtering, in provider order
pub const MAX_LEAGUES: usize = 10;

/// Competition type kept by [`normalize_leagues`]; cups are dropped.
const LEAGUE_TYPE: &str = "League";

const UNKNOWN: &str = "Unknown";
/// API-Football's "time to be defined" status code
const UNKNOWN_STATUS: &str = "TBD";

/// Result of normalizing one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub rejected: Vec<MalformedRecordError>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Normalized {
            items: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Normalize `/v3/fixtures` records.
pub fn normalize_matches(records: &[Value]) -> Normalized<Match> {
    let mut out = Normalized::default();
    for (index, record) in records.iter().enumerate() {
        match parse_fixture(record) {
            Ok(m) => out.items.push(m),
            Err(reason) => out.rejected.push(MalformedRecordError::new(index, reason)),
        }
    }
    out
}

/// Normalize `/v3/leagues` records: keep type "League" only, first
/// [`MAX_LEAGUES`] of them.
pub fn normalize_leagues(records: &[Value]) -> Normalized<League> {
    let mut out = Normalized::default();
    for (index, record) in records.iter().enumerate() {
        if out.items.len() == MAX_LEAGUES {
            break;
        }
        let kind = record.pointer("/league/type").and_then(Value::as_str);
        if kind != Some(LEAGUE_TYPE) {
            continue;
        }
        match parse_league(record) {
            Ok(league) => out.items.push(league),
            Err(reason) => out.rejected.push(MalformedRecordError::new(index, reason)),
        }
    }
    out
}

fn parse_fixture(ev: &Value) -> Result<Match, &'static str> {
    let id = ev
        .pointer("/fixture/id")
        .and_then(fixture_id)
        .ok_or("missing fixture.id")?;
    let home_team = text(ev, "/teams/home/name").ok_or("missing teams.home.name")?;
    let away_team = text(ev, "/teams/away/name").ok_or("missing teams.away.name")?;

    Ok(Match {
        id,
        league: text(ev, "/league/name").unwrap_or_else(|| UNKNOWN.to_string()),
        home_team,
        away_team,
        home_score: count(ev, "/goals/home"),
        away_score: count(ev, "/goals/away"),
        status: text(ev, "/fixture/status/short").unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        elapsed_minutes: count(ev, "/fixture/status/elapsed"),
        home_logo_url: text(ev, "/teams/home/logo"),
        away_logo_url: text(ev, "/teams/away/logo"),
    })
}

fn parse_league(ev: &Value) -> Result<League, &'static str> {
    let id = ev
        .pointer("/league/id")
        .and_then(Value::as_u64)
        .ok_or("missing league.id")?;
    let name = text(ev, "/league/name").ok_or("missing league.name")?;

    Ok(League {
        id,
        name,
        country: text(ev, "/country/name").unwrap_or_else(|| UNKNOWN.to_string()),
        logo_url: text(ev, "/league/logo"),
    })
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn fixture_id(v: &Value) -> Option<FixtureId> {
    match v {
        Value::Number(n) => n.as_u64().map(FixtureId::Number),
        Value::String(s) if !s.trim().is_empty() => Some(FixtureId::Text(s.clone())),
        _ => None,
    }
}

/// Non-empty string at `path`
fn text(ev: &Value, path: &str) -> Option<String> {
    ev.pointer(path)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Non-negative count at `path`; null, missing, negative or garbage → 0.
fn count(ev: &Value, path: &str) -> u32 {
    let Some(v) = ev.pointer(path) else {
        return 0;
    };
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}
