//! Fetch a page over HTTP and extract its metadata
//!
//! Thin blocking wrapper around ureq. No retries and no caching: one request,
//! one extraction.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::engine;
use crate::error::{ExtractError, Result};
use crate::ogp::OgpPageInfo;
use crate::schema::MetaSchema;

/// HTTP settings for fetching pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Bodies larger than this are rejected
    pub max_body_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("ogp_parser/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: u64) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    fn agent(&self) -> ureq::Agent {
        ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(self.timeout_secs)))
                .user_agent(self.user_agent.as_str())
                .http_status_as_error(false)
                .build(),
        )
    }
}

/// Only http and https URLs are fetched.
fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExtractError::UnsupportedScheme(other.to_string())),
    }
}

/// Fetch `url` and populate a fresh `T` from the response body.
pub fn fetch_into<T: MetaSchema>(url: &str, config: &FetchConfig) -> Result<T> {
    let parsed = parse_url(url)?;
    debug!(url = %parsed, "fetching page");

    let response = config.agent().get(parsed.as_str()).call()?;
    if !response.status().is_success() {
        return Err(ExtractError::Status {
            status: response.status().as_u16(),
            url: parsed.to_string(),
        });
    }

    let html = response
        .into_body()
        .with_config()
        .limit(config.max_body_bytes)
        .read_to_vec()
        .map_err(|e| ExtractError::Body {
            url: parsed.to_string(),
            reason: e.to_string(),
        })?;

    engine::extract_from_bytes(&html)
}

/// Fetch `url` and extract its Open Graph data.
pub fn fetch_page_info(url: &str, config: &FetchConfig) -> Result<OgpPageInfo> {
    fetch_into(url, config)
}

/// Extract from a response the caller already holds. The status code is not
/// inspected.
pub fn from_response<T: MetaSchema>(response: ureq::http::Response<ureq::Body>) -> Result<T> {
    let html = response
        .into_body()
        .read_to_vec()
        .map_err(|e| ExtractError::Body {
            url: "<response>".to_string(),
            reason: e.to_string(),
        })?;
    engine::extract_from_bytes(&html)
}

pub fn page_info_from_response(response: ureq::http::Response<ureq::Body>) -> Result<OgpPageInfo> {
    from_response(response)
}
