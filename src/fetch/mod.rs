//! SSR data fetching.
//!
//! # Responsibilities
//! - Resolve the page's fetch URL (absolute, or relative to `fetch.base_url`)
//! - Issue a GET request and parse the body as JSON
//! - Classify failures (bad URL, network, status, body)
//!
//! # Design Decisions
//! - No retries and no timeout: a stalled upstream stalls only its request
//! - An empty URL means "no data"; the page renders against `{}`
//! - One shared `reqwest::Client` so connections are pooled across requests

use std::time::Instant;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::FetchConfig;
use crate::observability::metrics;

/// Errors raised while fetching page data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed or resolved against the base URL.
    #[error("invalid fetch url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Building the HTTP client failed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection or transport failure.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-2xx status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Upstream body was not JSON.
    #[error("{url} returned a non-JSON body: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Fetches the JSON a page declares in its `<ssr>` wrapper.
#[derive(Debug, Clone)]
pub struct DataFetcher {
    client: Client,
    base_url: Option<Url>,
}

impl DataFetcher {
    /// Create a fetcher from configuration.
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let base_url = match &config.base_url {
            Some(raw) => Some(Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let client = Client::builder()
            .user_agent(concat!("satto/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, base_url })
    }

    /// Resolve a page URL to an absolute one.
    pub fn resolve(&self, raw: &str) -> FetchResult<Url> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_ref().ok_or_else(|| FetchError::InvalidUrl {
                    url: raw.to_string(),
                    reason: "relative url and no fetch.base_url configured".to_string(),
                })?;
                base.join(raw).map_err(|e| FetchError::InvalidUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Fetch and decode the data for `raw_url`.
    ///
    /// An empty URL yields an empty object without any request.
    pub async fn fetch(&self, raw_url: &str) -> FetchResult<Value> {
        if raw_url.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        let url = self.resolve(raw_url)?;
        let start = Instant::now();
        let result = self.get_json(&url).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(FetchError::Status { .. }) => "status",
            Err(FetchError::Decode { .. }) => "decode",
            Err(_) => "error",
        };
        metrics::record_fetch(outcome, start);

        tracing::debug!(
            url = %url,
            outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Page data fetched"
        );

        result
    }

    async fn get_json(&self, url: &Url) -> FetchResult<Value> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
