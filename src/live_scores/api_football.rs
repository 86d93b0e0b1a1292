use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::provider::{Endpoint, FootballDataSource};
use crate::error::NetworkError;

pub const DEFAULT_API_HOST: &str = "api-football-v1.p.rapidapi.com";

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Football data source backed by API-Football v3 through RapidAPI.
/// Docs: <https://www.api-football.com/documentation-v3>
pub struct ApiFootballClient {
    http: Client,
    api_key: Option<String>,
    api_host: String,
    fixtures_url: Url,
    leagues_url: Url,
}

impl ApiFootballClient {
    /// `base_url` overrides `https://{api_host}` (used for proxies and tests).
    pub fn new(
        api_key: Option<&str>,
        api_host: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base = match base_url {
            Some(b) => b.to_string(),
            None => format!("https://{}", api_host),
        };
        let mut base =
            Url::parse(&base).with_context(|| format!("Invalid API base URL '{}'", base))?;
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(ApiFootballClient {
            http,
            api_key: api_key.map(str::to_string),
            api_host: api_host.to_string(),
            fixtures_url: base.join("v3/fixtures").context("Failed to build fixtures URL")?,
            leagues_url: base.join("v3/leagues").context("Failed to build leagues URL")?,
        })
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Url {
        match endpoint {
            Endpoint::Fixtures { live_only } => {
                let mut url = self.fixtures_url.clone();
                if live_only {
                    url.query_pairs_mut().append_pair("live", "all");
                }
                url
            }
            Endpoint::Leagues => self.leagues_url.clone(),
        }
    }

    fn credential(&self) -> Result<&str, NetworkError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(NetworkError::Unauthorized("no API key configured".to_string())),
        }
    }
}

#[async_trait]
impl FootballDataSource for ApiFootballClient {
    fn name(&self) -> &str {
        "API-Football"
    }

    async fn fetch(&self, endpoint: Endpoint) -> Result<Vec<Value>, NetworkError> {
        let key = self.credential()?;
        let url = self.endpoint_url(endpoint);
        debug!("Fetching {} from {}", endpoint, url);

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, key)
            .header(API_HOST_HEADER, &self.api_host)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| NetworkError::Decode(e.to_string()))?;

        extract_records(raw)
    }
}

fn classify_status(status: StatusCode, body: String) -> NetworkError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            NetworkError::Unauthorized(format!("HTTP {}", status))
        }
        StatusCode::TOO_MANY_REQUESTS => NetworkError::RateLimited,
        _ => NetworkError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Pull the `response` array out of an API-Football envelope.
///
/// The API answers some request problems (bad key, plan limits, bad params)
/// with HTTP 200 and a non-empty `errors` field instead of a status code.
fn extract_records(raw: Value) -> Result<Vec<Value>, NetworkError> {
    let Value::Object(mut envelope) = raw else {
        return Err(NetworkError::Decode("expected a JSON object".to_string()));
    };

    if let Some(message) = envelope.get("errors").and_then(describe_errors) {
        return Err(NetworkError::Api(message));
    }

    match envelope.remove("response") {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(NetworkError::Decode("`response` is not an array".to_string())),
        None => Err(NetworkError::Decode("missing `response` field".to_string())),
    }
}

fn describe_errors(errors: &Value) -> Option<String> {
    let parts: Vec<String> = match errors {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v.as_str() {
                Some(s) => format!("{}: {}", k, s),
                None => format!("{}: {}", k, v),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect(),
        _ => return None,
    };
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
