use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use s2ds_client::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, RetryPolicy, Url};
use serde::{Deserialize, Serialize};

use crate::cli::app::GlobalArgs;

const CONFIG_FILE: &str = "s2ds.toml";
const ENV_PREFIX: &str = "S2DS_";

/// Effective settings, merged from defaults, `s2ds.toml`, `S2DS_*`
/// variables and command-line flags, later sources winning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key:              Option<String>,
    pub base_url:             String,
    /// `0` disables the `limit` query parameter.
    pub page_limit:           u32,
    pub max_retries:          u32,
    pub backoff_factor_secs:  f64,
    pub backoff_max_secs:     u64,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout; unset means shard bodies may take as long as they need.
    pub timeout_secs:         Option<u64>,
    pub proxies:              Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            api_key:              None,
            base_url:             DEFAULT_BASE_URL.to_string(),
            page_limit:           DEFAULT_PAGE_LIMIT,
            max_retries:          retry.max_retries,
            backoff_factor_secs:  retry.backoff_factor.as_secs_f64(),
            backoff_max_secs:     retry.backoff_max.as_secs(),
            connect_timeout_secs: 30,
            timeout_secs:         None,
            proxies:              Vec::new(),
        }
    }
}

impl Settings {
    /// Loads `path` if given (it must exist), otherwise the nearest `s2ds.toml`
    /// if any, then applies `S2DS_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file {} does not exist", path.display());
                }
                Toml::file_exact(path)
            }
            None => Toml::file(CONFIG_FILE),
        };

        Figment::from(Serialized::defaults(Settings::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("invalid configuration")
    }

    #[must_use]
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(ref api_key) = args.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(ref base_url) = args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(page_limit) = args.page_limit {
            self.page_limit = page_limit;
        }
        if args.no_page_limit {
            self.page_limit = 0;
        }
        self
    }

    pub fn client_options(&self) -> Result<ClientOptions> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .context("no API key: pass --api-key, set S2_API_KEY or put api_key in s2ds.toml")?;

        let backoff_factor = Duration::try_from_secs_f64(self.backoff_factor_secs)
            .with_context(|| format!("invalid backoff_factor_secs {}", self.backoff_factor_secs))?;
        let retry = RetryPolicy::default()
            .max_retries(self.max_retries)
            .backoff_factor(backoff_factor)
            .backoff_max(Duration::from_secs(self.backoff_max_secs));

        let mut options = ClientOptions::new(api_key)
            .base_url(self.base_url.clone())
            .page_limit((self.page_limit > 0).then_some(self.page_limit))
            .retry(retry)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(self.timeout_secs.map(Duration::from_secs));

        for proxy in &self.proxies {
            let url = Url::parse(proxy).with_context(|| format!("invalid proxy url {proxy}"))?;
            options = options.proxy(url);
        }
        Ok(options)
    }
}
