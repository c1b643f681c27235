//! Error types for s2ds-client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl { url: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid proxy URL {url}: {source}")]
    Proxy {
        url:    String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API key header value")]
    InvalidApiKey,

    #[error("request to {url} failed: {source}")]
    Request {
        url:    String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} still returned HTTP {status} after {retries} retries")]
    RetriesExhausted { url: String, status: u16, retries: u32 },

    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url:    String,
        #[source]
        source: serde_json::Error,
    },

    #[error("release index is empty")]
    NoReleases,
}

impl Error {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } | Error::RetriesExhausted { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server reported the release or dataset as unknown.
    pub fn is_not_found(&self) -> bool { self.status() == Some(404) }
}

pub type Result<T> = std::result::Result<T, Error>;
