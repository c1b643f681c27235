use s2ds_client::Transport;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{DatasetEvent, DatasetOptions};
use crate::records::{BoxLines, DatasetRecords, Passthrough, Records, ShardLines, open_lines, passthrough};
use crate::shard::Shard;

/// Fetches every shard of a named dataset, either as records or as files.
///
/// Holds no state between calls: each dataset-level operation resolves the
/// latest release and the shard listing afresh.
pub struct Datasets<T> {
    pub(crate) transport: T,
    pub(crate) options:   DatasetOptions,
}

impl<T: Transport> Datasets<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            options: DatasetOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DatasetOptions) -> Self {
        self.options = options;
        self
    }

    pub fn transport(&self) -> &T { &self.transport }

    /// Every release id, oldest first.
    pub fn release_ids(&self) -> Result<Vec<String>> { Ok(self.transport.release_ids()?) }

    pub fn latest_release_id(&self) -> Result<String> {
        let release_id = self.transport.latest_release_id()?;
        debug!(release_id = %release_id, "latest release");
        self.options.emit(DatasetEvent::ReleaseResolved {
            release_id: release_id.clone(),
        });
        Ok(release_id)
    }

    /// Shard URLs of `dataset` at `release_id`, exactly as listed by the server.
    pub fn shards(&self, dataset: &str, release_id: &str) -> Result<Vec<String>> {
        Ok(self.transport.shard_urls(dataset, release_id)?)
    }

    /// Latest release, then its shard listing for `dataset`.
    pub(crate) fn resolve(&self, dataset: &str) -> Result<Vec<Shard>> {
        let release_id = self.latest_release_id()?;
        let shards = Shard::enumerate(self.shards(dataset, &release_id)?);
        debug!(dataset, release_id = %release_id, shards = shards.len(), "found shards");
        self.options.emit(DatasetEvent::ShardsListed {
            dataset: dataset.to_string(),
            release_id,
            count: shards.len(),
        });
        Ok(shards)
    }

    /// Raw decompressed lines of one shard.
    pub fn shard_lines(&self, shard_url: &str) -> Result<ShardLines<T::Body>> {
        open_lines(&self.transport, shard_url)
    }

    /// Parsed records of one shard.
    pub fn shard_records(&self, shard_url: &str) -> Result<Records<ShardLines<T::Body>>> {
        Ok(Records::new(self.shard_lines(shard_url)?, shard_url))
    }

    /// Records of every shard of `dataset` at the latest release.
    ///
    /// The release and the listing are fetched now; shards are opened lazily
    /// as the iterator advances.
    pub fn records<'a>(&'a self, dataset: &str) -> Result<DatasetRecords<'a, T, Passthrough<'a>>>
    where
        T::Body: 'a,
    {
        let layer: Passthrough<'a> = passthrough;
        self.records_with(dataset, layer)
    }

    /// Like [`records`](Self::records), passing each shard's raw lines
    /// through `layer` before they are parsed.
    pub fn records_with<'a, L>(&'a self, dataset: &str, layer: L) -> Result<DatasetRecords<'a, T, L>>
    where
        L: FnMut(&Shard, BoxLines<'a>) -> BoxLines<'a>,
        T::Body: 'a,
    {
        let shards = self.resolve(dataset)?;
        Ok(DatasetRecords::new(&self.transport, &self.options, shards, layer))
    }

    /// Hand every record of one shard to `handler`, in line order.
    ///
    /// Stops at the first error, whether it comes from the stream or from `handler`.
    pub fn stream_shard<E, H>(&self, shard_url: &str, mut handler: H) -> std::result::Result<(), E>
    where
        H: FnMut(Value) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        let mut records = self.shard_records(shard_url)?;
        for record in records.by_ref() {
            handler(record?)?;
        }
        debug!(url = shard_url, records = records.records_read(), "shard done");
        Ok(())
    }

    /// Hand every record of every shard of `dataset` to `handler`.
    ///
    /// Shards are processed in listing order, one at a time. The first error
    /// aborts the run; shards after it are never requested.
    ///
    /// ```no_run
    /// use s2ds_client::{ClientOptions, S2Client};
    /// use s2ds_datasets::{Datasets, Error};
    ///
    /// # fn main() -> Result<(), Error> {
    /// let datasets = Datasets::new(S2Client::new(ClientOptions::new("my-key"))?);
    /// let mut count = 0u64;
    /// datasets.stream_all("papers", |_record| -> Result<(), Error> {
    ///     count += 1;
    ///     Ok(())
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn stream_all<'a, E, H>(&'a self, dataset: &str, handler: H) -> std::result::Result<(), E>
    where
        T::Body: 'a,
        H: FnMut(Value) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        self.stream_all_with(dataset, passthrough, handler)
    }

    /// Like [`stream_all`](Self::stream_all), with a line layer.
    pub fn stream_all_with<'a, L, E, H>(
        &'a self,
        dataset: &str,
        layer: L,
        mut handler: H,
    ) -> std::result::Result<(), E>
    where
        L: FnMut(&Shard, BoxLines<'a>) -> BoxLines<'a>,
        T::Body: 'a,
        H: FnMut(Value) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        for record in self.records_with(dataset, layer)? {
            handler(record?)?;
        }
        Ok(())
    }
}
