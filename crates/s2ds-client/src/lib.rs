//! Authenticated HTTP access to the Semantic Scholar datasets API.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration
//! - [`core`](crate::core) - Pure transformations (backoff, `Retry-After` parsing)
//! - [`effects`] - I/O operations behind the [`Transport`] trait
//!
//! # Key Features
//!
//! - **Retrying**: 502/503/504 responses are retried with exponential backoff,
//!   honoring `Retry-After`
//! - **Streaming**: shard bodies are never buffered; [`Transport::open_decompressed`]
//!   inflates gzip on the fly
//! - **Mechanism-Only**: no orchestration; see `s2ds-datasets` for the shard pipeline

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::{backoff_delay, parse_retry_after, retry_delay};
pub use data::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, RetryPolicy};
pub use effects::{GzipStream, S2Client, ShardBody, Transport};
pub use error::{Error, Result};
pub use reqwest::Url;
