use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::data::RetryPolicy;

/// Calculate the delay before a retry attempt using exponential backoff.
///
/// The delay formula is: `base * 2^retry_count`
///
/// # Arguments
///
/// * `retry_count` - The current retry number (0-indexed: 0 = first retry)
/// * `base` - The base delay duration
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use s2ds_client::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_secs(2)), Duration::from_secs(2));
/// assert_eq!(retry_delay(1, Duration::from_secs(2)), Duration::from_secs(4));
/// assert_eq!(retry_delay(2, Duration::from_secs(2)), Duration::from_secs(8));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    let multiplier = 2_u32.saturating_pow(retry_count);
    base.saturating_mul(multiplier)
}

/// Backoff for `retry_count` under `policy`, capped at `policy.backoff_max`.
pub fn backoff_delay(policy: &RetryPolicy, retry_count: u32) -> Duration {
    retry_delay(retry_count, policy.backoff_factor).min(policy.backoff_max)
}

/// Parse a `Retry-After` header value.
///
/// Accepts delta-seconds (`"120"`) or an HTTP date
/// (`"Wed, 21 Oct 2015 07:28:00 GMT"`). A date in the past yields zero.
/// Returns `None` for anything unparseable.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use chrono::Utc;
/// use s2ds_client::parse_retry_after;
///
/// assert_eq!(parse_retry_after("3", Utc::now()), Some(Duration::from_secs(3)));
/// assert_eq!(parse_retry_after("soon", Utc::now()), None);
/// ```
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = at.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}
