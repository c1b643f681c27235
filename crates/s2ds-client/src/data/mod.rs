//! Immutable configuration for the datasets API client.
//!
//! These types are built once, handed to [`S2Client::new`](crate::S2Client::new)
//! and never mutated afterwards.

pub mod options;
pub mod retry;

pub use options::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT};
pub use retry::RetryPolicy;
