use std::thread;
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Proxy, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::transport::Transport;
use crate::core::{backoff_delay, parse_retry_after};
use crate::data::ClientOptions;
use crate::error::{Error, Result};

/// Streaming shard body returned by [`S2Client`].
pub type ShardBody = Response;

/// Production [`Transport`] over blocking `reqwest`.
///
/// Every request carries the `x-api-key` header and goes through the
/// configured [`RetryPolicy`](crate::RetryPolicy).
pub struct S2Client {
    http:    Client,
    options: ClientOptions,
}

#[derive(Deserialize)]
struct DatasetFiles {
    files: Vec<String>,
}

impl S2Client {
    pub fn new(options: ClientOptions) -> Result<Self> {
        Url::parse(&options.base_url).map_err(|_| Error::InvalidBaseUrl {
            url: options.base_url.clone(),
        })?;

        let mut api_key = HeaderValue::from_str(&options.api_key).map_err(|_| Error::InvalidApiKey)?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(options.user_agent.clone())
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout);

        let (secure, insecure): (Vec<&Url>, Vec<&Url>) =
            options.proxies.iter().partition(|u| u.scheme() == "https");
        for u in secure {
            builder = builder.proxy(Proxy::https(u.as_str()).map_err(|source| Error::Proxy {
                url: u.to_string(),
                source,
            })?);
        }
        for u in insecure {
            builder = builder.proxy(Proxy::http(u.as_str()).map_err(|source| Error::Proxy {
                url: u.to_string(),
                source,
            })?);
        }

        let http = builder.build().map_err(Error::ClientBuild)?;
        Ok(Self { http, options })
    }

    pub fn options(&self) -> &ClientOptions { &self.options }

    /// GET `url` until it succeeds, fails for good, or runs out of retries.
    ///
    /// `paged` requests carry the `limit` query parameter when one is configured.
    fn get(&self, url: &str, paged: bool) -> Result<Response> {
        let policy = &self.options.retry;
        let mut retries = 0;

        loop {
            let mut request = self.http.get(url);
            if paged {
                if let Some(limit) = self.options.page_limit {
                    request = request.query(&[("limit", limit)]);
                }
            }

            trace!(url, retries, "sending request");
            let response = request.send().map_err(|source| Error::Request {
                url: url.to_string(),
                source,
            })?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let status = status.as_u16();
            if !policy.retries_status(status) {
                return Err(Error::Status {
                    url: url.to_string(),
                    status,
                });
            }
            if retries >= policy.max_retries {
                return Err(Error::RetriesExhausted {
                    url: url.to_string(),
                    status,
                    retries,
                });
            }

            let delay = self.delay_for(&response, retries);
            warn!(
                url,
                status,
                retry = retries + 1,
                max_retries = policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                "transient server error, retrying"
            );
            drop(response);
            thread::sleep(delay);
            retries += 1;
        }
    }

    fn delay_for(&self, response: &Response, retries: u32) -> Duration {
        let policy = &self.options.retry;
        let hinted = if policy.respect_retry_after {
            response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| parse_retry_after(v, Utc::now()))
        } else {
            None
        };
        hinted.unwrap_or_else(|| backoff_delay(policy, retries))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self
            .get(url, true)?
            .bytes()
            .map_err(|source| Error::Request {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| Error::Parse {
            url: url.to_string(),
            source,
        })
    }
}

impl Transport for S2Client {
    type Body = ShardBody;

    fn release_ids(&self) -> Result<Vec<String>> {
        let url = self.options.releases_url();
        let releases: Vec<String> = self.get_json(&url)?;
        debug!(releases = releases.len(), "fetched release index");
        Ok(releases)
    }

    fn shard_urls(&self, dataset: &str, release_id: &str) -> Result<Vec<String>> {
        let url = self.options.dataset_url(dataset, release_id);
        let listing: DatasetFiles = self.get_json(&url)?;
        Ok(listing.files)
    }

    fn open_shard(&self, url: &str) -> Result<Self::Body> {
        let response = self.get(url, false)?;
        debug!(url, content_length = response.content_length(), "opened shard stream");
        Ok(response)
    }
}
