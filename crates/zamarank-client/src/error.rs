use thiserror::Error;

/// Errors returned by the Zamarank API client.
#[derive(Debug, Error)]
pub enum ZamaError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON. `snippet` holds the first
    /// [`SNIPPET_CHARS`](crate::client::SNIPPET_CHARS) characters of the body.
    #[error("invalid JSON at {url} -> {snippet}...")]
    Parse { url: String, snippet: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
