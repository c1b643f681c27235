use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] s2ds_client::Error),

    #[error("invalid JSON on line {line} of {shard}: {source}")]
    Parse {
        shard:  String,
        line:   u64,
        source: serde_json::Error,
    },

    #[error("failed to read {shard}: {source}")]
    Read { shard: String, source: io::Error },

    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to download {url} to {path}: {source}")]
    Download {
        url:    String,
        path:   PathBuf,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
