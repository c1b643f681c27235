use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use s2ds_client::Transport;
use tracing::{debug, info};

use crate::datasets::Datasets;
use crate::error::{Error, Result};
use crate::event::DatasetEvent;
use crate::shard::shard_file_name;

impl<T: Transport> Datasets<T> {
    /// Copy one shard's compressed bytes to `path`, unmodified.
    ///
    /// The file is created or truncated. An interrupted copy leaves a
    /// truncated file behind; nothing is resumed or retried here.
    /// Returns the number of bytes written.
    pub fn download_shard(&self, shard_url: &str, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let mut body = self.transport.open_shard(shard_url)?;

        let file = File::create(path).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let bytes = io::copy(&mut body, &mut writer).map_err(|source| Error::Download {
            url: shard_url.to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(url = shard_url, path = %path.display(), bytes, "shard written");
        Ok(bytes)
    }

    /// Download every shard of `dataset` at the latest release into `dir`.
    ///
    /// `dir` is created if missing. Shard `k` lands in `{dataset}_{k:03}.gz`;
    /// existing files of that name are overwritten. Returns the written
    /// paths in listing order.
    pub fn download_all(&self, dataset: &str, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let shards = self.resolve(dataset)?;

        fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(shards.len());
        for shard in shards {
            debug!(shard = shard.index, shards = shard.total, url = %shard.url, "downloading shard");
            self.options.emit(DatasetEvent::ShardStarted {
                shard: shard.clone(),
            });

            let path = dir.join(shard_file_name(dataset, shard.index));
            let bytes = self.download_shard(&shard.url, &path)?;

            info!(dataset, shard = shard.index, path = %path.display(), bytes, "downloaded shard");
            self.options.emit(DatasetEvent::ShardDownloaded {
                shard,
                path: path.clone(),
                bytes,
            });
            written.push(path);
        }

        Ok(written)
    }
}
