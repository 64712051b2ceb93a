//! HTTP client for the Zamarank REST API.
//!
//! Wraps `reqwest` with the upstream URL layout and a lenient JSON fetch:
//! bodies are parsed regardless of HTTP status, and a body that is not JSON
//! surfaces as [`ZamaError::Parse`] carrying the URL and a short snippet.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Client;
use zamarank_core::{AppConfig, Timeframe};

use crate::error::ZamaError;

/// Characters of a non-JSON body kept in [`ZamaError::Parse`].
pub const SNIPPET_CHARS: usize = 120;

const DEFAULT_USER_AGENT: &str = "zamarank-helper/0.1";

/// Characters escaped when a handle is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Settings for [`ZamaClient::new`].
#[derive(Debug, Clone)]
pub struct ZamaClientConfig {
    /// API root, e.g. `https://zamarank.live/api`. A trailing slash is ignored.
    pub api_base_url: String,
    /// Upper bound on leaderboard pages scanned per timeframe.
    pub max_pages: u32,
    /// `None` leaves requests without a timeout.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl ZamaClientConfig {
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            max_pages: zamarank_core::config::DEFAULT_MAX_PAGES,
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            max_pages: config.max_pages,
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Client for the Zamarank search and leaderboard endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ZamaClient {
    client: Client,
    api_base_url: String,
    pub(crate) max_pages: u32,
}

impl ZamaClient {
    /// # Errors
    ///
    /// Returns [`ZamaError::InvalidBaseUrl`] if `api_base_url` is not an
    /// absolute http(s) URL, or [`ZamaError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(config: &ZamaClientConfig) -> Result<Self, ZamaError> {
        let parsed = reqwest::Url::parse(&config.api_base_url).map_err(|e| {
            ZamaError::InvalidBaseUrl {
                base_url: config.api_base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ZamaError::InvalidBaseUrl {
                base_url: config.api_base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            max_pages: config.max_pages.max(1),
        })
    }

    /// URL of the seasonal-search document for `handle`.
    #[must_use]
    pub fn search_url(&self, handle: &str) -> String {
        let encoded = utf8_percent_encode(handle, PATH_SEGMENT);
        format!("{}/search/{encoded}", self.api_base_url)
    }

    /// Leaderboard URL for `timeframe` ending in `page=`; the page number is
    /// appended per request.
    #[must_use]
    pub fn timeframe_base_url(&self, timeframe: Timeframe) -> String {
        format!(
            "{}/zama?timeframe={}&sortBy=mindshare&page=",
            self.api_base_url,
            timeframe.as_str()
        )
    }

    /// Issues one GET and parses the body as JSON.
    ///
    /// The HTTP status is not checked: error pages are parsed like any other
    /// body and fail as [`ZamaError::Parse`] when they are not JSON.
    ///
    /// # Errors
    ///
    /// - [`ZamaError::Http`] if the request cannot be sent or the body cannot
    ///   be read.
    /// - [`ZamaError::Parse`] if the body is not valid JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, ZamaError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            tracing::trace!(url, status = status.as_u16(), bytes = body.len(), "upstream response");
        } else {
            tracing::debug!(
                url,
                status = status.as_u16(),
                bytes = body.len(),
                "upstream returned non-success status; parsing body anyway"
            );
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(url, error = %e, "upstream body is not JSON");
            ZamaError::Parse {
                url: url.to_owned(),
                snippet: snippet(&body),
            }
        })
    }
}

/// First [`SNIPPET_CHARS`] characters of `body`.
fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}
