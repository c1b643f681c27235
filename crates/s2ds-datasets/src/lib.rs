//! Fetch every shard of a Semantic Scholar bulk dataset.
//!
//! [`Datasets`] resolves the latest release, lists the shards of a named
//! dataset and then either yields its records or copies its shard files to
//! disk. Everything is blocking and strictly sequential: one shard is open
//! at a time, in the order the service lists them.
//!
//! # Example
//!
//! ```no_run
//! use s2ds_client::{ClientOptions, S2Client};
//! use s2ds_datasets::Datasets;
//!
//! # fn main() -> Result<(), s2ds_datasets::Error> {
//! let datasets = Datasets::new(S2Client::new(ClientOptions::new("my-key"))?);
//!
//! for record in datasets.records("papers")?.take(5) {
//!     println!("{}", record?["title"]);
//! }
//!
//! datasets.download_all("abstracts", "./data/abstracts")?;
//! # Ok(())
//! # }
//! ```

mod datasets;
mod download;
mod error;
mod event;
mod records;
mod shard;

pub use datasets::Datasets;
pub use error::{Error, Result};
pub use event::{DatasetEvent, DatasetOptions, EventCallback};
pub use records::{BoxLines, DatasetRecords, Passthrough, Records, ShardLines, passthrough};
pub use shard::{Shard, shard_file_name};
