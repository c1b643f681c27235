//! Pure transformations used by the client's retry loop.
//!
//! Nothing here performs I/O; the current time is passed in where needed.

mod retry;

pub use retry::{backoff_delay, parse_retry_after, retry_delay};
