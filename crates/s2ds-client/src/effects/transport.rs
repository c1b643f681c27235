use std::io::Read;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};

/// A shard body inflated on the fly.
///
/// Shards may be written as several concatenated gzip members, so this
/// decodes all of them rather than stopping after the first.
pub type GzipStream<R> = MultiGzDecoder<R>;

/// Blocking access to the datasets API.
///
/// This trait provides the minimal interface needed by the shard pipeline.
/// Implementations handle authentication, retries and error mapping.
///
/// # Implementations
///
/// - [`S2Client`](crate::S2Client): production implementation using `reqwest`
/// - In-memory implementations for testing
pub trait Transport {
    /// Raw, still-compressed shard body. Dropping it releases the connection.
    type Body: Read;

    /// Every release id the service knows, oldest first.
    fn release_ids(&self) -> Result<Vec<String>>;

    /// The most recent release id: the last entry of [`release_ids`](Self::release_ids).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoReleases`] when the index is empty.
    fn latest_release_id(&self) -> Result<String> {
        self.release_ids()?.pop().ok_or(Error::NoReleases)
    }

    /// Shard URLs of `dataset` at `release_id`, in server order.
    fn shard_urls(&self, dataset: &str, release_id: &str) -> Result<Vec<String>>;

    /// Open a streaming request for a shard without decompressing it.
    fn open_shard(&self, url: &str) -> Result<Self::Body>;

    /// Open a shard and wrap it in a gzip decoder.
    ///
    /// Decompression errors surface as `io::Error` while reading.
    fn open_decompressed(&self, url: &str) -> Result<GzipStream<Self::Body>> {
        Ok(MultiGzDecoder::new(self.open_shard(url)?))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    type Body = T::Body;

    fn release_ids(&self) -> Result<Vec<String>> { (**self).release_ids() }

    fn latest_release_id(&self) -> Result<String> { (**self).latest_release_id() }

    fn shard_urls(&self, dataset: &str, release_id: &str) -> Result<Vec<String>> {
        (**self).shard_urls(dataset, release_id)
    }

    fn open_shard(&self, url: &str) -> Result<Self::Body> { (**self).open_shard(url) }

    fn open_decompressed(&self, url: &str) -> Result<GzipStream<Self::Body>> {
        (**self).open_decompressed(url)
    }
}
