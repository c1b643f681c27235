//! Network I/O against the datasets API.
//!
//! [`Transport`] is the seam the orchestrator is written against; [`S2Client`]
//! is the production implementation over blocking `reqwest`.

mod client;
mod transport;

pub use client::{S2Client, ShardBody};
pub use transport::{GzipStream, Transport};
