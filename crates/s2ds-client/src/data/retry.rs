use std::time::Duration;

/// Retry behaviour for transient server failures.
///
/// Applied uniformly to every request the client issues, whatever the method.
///
/// # Examples
///
/// ```
/// use s2ds_client::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .max_retries(3)
///     .backoff_factor(Duration::from_millis(50));
/// assert!(policy.retries_status(503));
/// assert!(!policy.retries_status(404));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    ///
    /// Total attempts = 1 (initial) + max_retries
    ///
    /// Default: 15
    pub max_retries: u32,

    /// Base delay for exponential backoff.
    ///
    /// The delay before retry N (0-based) is `backoff_factor * 2^N`,
    /// capped at [`backoff_max`](Self::backoff_max).
    ///
    /// Default: 2s
    pub backoff_factor: Duration,

    /// Upper bound for a computed backoff delay. Does not bound `Retry-After`.
    ///
    /// Default: 120s
    pub backoff_max: Duration,

    /// Use the server's `Retry-After` header instead of the computed delay.
    ///
    /// Default: true
    pub respect_retry_after: bool,

    /// Response statuses that count as transient.
    ///
    /// Default: 502, 503, 504
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries:         15,
            backoff_factor:      Duration::from_secs(2),
            backoff_max:         Duration::from_secs(120),
            respect_retry_after: true,
            retry_statuses:      vec![502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self { Self::default().max_retries(0) }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn backoff_factor(mut self, backoff_factor: Duration) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    #[must_use]
    pub fn backoff_max(mut self, backoff_max: Duration) -> Self {
        self.backoff_max = backoff_max;
        self
    }

    #[must_use]
    pub fn respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    #[must_use]
    pub fn retry_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.retry_statuses = statuses;
        self
    }

    /// Whether a response with this status should be retried.
    pub fn retries_status(&self, status: u16) -> bool { self.retry_statuses.contains(&status) }
}
