use std::fmt;
use std::time::Duration;

use reqwest::Url;

use super::retry::RetryPolicy;

/// Root of the datasets API; releases live under `{base}/release/`.
pub const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/datasets/v1";

/// Page size sent as `limit` on JSON requests unless overridden.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Configuration for [`S2Client`](crate::S2Client).
///
/// # Examples
///
/// ```
/// use s2ds_client::{ClientOptions, RetryPolicy};
///
/// let options = ClientOptions::new("my-key")
///     .base_url("http://127.0.0.1:8080/datasets/v1")
///     .page_limit(None)
///     .retry(RetryPolicy::default().max_retries(3));
/// assert_eq!(options.page_limit, None);
/// ```
#[derive(Clone)]
pub struct ClientOptions {
    /// Sent as `x-api-key` on every request.
    pub api_key: String,

    /// Default: [`DEFAULT_BASE_URL`]
    pub base_url: String,

    /// Value of the `limit` query parameter on JSON requests; `None` omits it.
    ///
    /// Default: `Some(10)`
    pub page_limit: Option<u32>,

    pub retry: RetryPolicy,

    /// Default: 30s
    pub connect_timeout: Duration,

    /// Whole-request timeout, body included. Shards run to several gigabytes,
    /// so this is off unless set.
    ///
    /// Default: None
    pub timeout: Option<Duration>,

    /// `https` URLs are installed as HTTPS proxies, anything else as HTTP proxies.
    pub proxies: Vec<Url>,

    pub user_agent: String,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("page_limit", &self.page_limit)
            .field("retry", &self.retry)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .field("proxies", &self.proxies)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key:         api_key.into(),
            base_url:        DEFAULT_BASE_URL.to_string(),
            page_limit:      Some(DEFAULT_PAGE_LIMIT),
            retry:           RetryPolicy::default(),
            connect_timeout: Duration::from_secs(30),
            timeout:         None,
            proxies:         Vec::new(),
            user_agent:      concat!("s2ds/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn page_limit(mut self, page_limit: Option<u32>) -> Self {
        self.page_limit = page_limit;
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: Url) -> Self {
        self.proxies.push(proxy);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// `{base}/release`, the release index.
    pub fn releases_url(&self) -> String { format!("{}/release", self.base()) }

    /// `{base}/release/{release_id}/dataset/{dataset}`.
    pub fn dataset_url(&self, dataset: &str, release_id: &str) -> String {
        format!("{}/release/{release_id}/dataset/{dataset}", self.base())
    }

    fn base(&self) -> &str { self.base_url.trim_end_matches('/') }
}
