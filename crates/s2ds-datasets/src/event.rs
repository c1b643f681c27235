use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::shard::Shard;

/// Progress notifications emitted while a dataset is processed.
///
/// Purely observational: handlers cannot influence control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetEvent {
    /// The latest release id was fetched.
    ReleaseResolved { release_id: String },

    /// The shard listing for a dataset was fetched.
    ShardsListed {
        dataset:    String,
        release_id: String,
        count:      usize,
    },

    /// A shard is about to be opened.
    ShardStarted { shard: Shard },

    /// Every record of a shard was yielded.
    ShardStreamed { shard: Shard, records: u64 },

    /// A shard was written to disk.
    ShardDownloaded {
        shard: Shard,
        path:  PathBuf,
        bytes: u64,
    },
}

pub type EventCallback = Arc<dyn Fn(&DatasetEvent) + Send + Sync>;

/// Configuration for [`Datasets`](crate::Datasets).
///
/// # Examples
///
/// ```
/// use s2ds_datasets::{DatasetEvent, DatasetOptions};
/// use std::sync::Arc;
///
/// let options = DatasetOptions::default().on_event(Arc::new(|event| {
///     if let DatasetEvent::ShardStarted { shard } = event {
///         eprintln!("processing {shard}");
///     }
/// }));
/// ```
#[derive(Clone, Default)]
pub struct DatasetOptions {
    /// Invoked synchronously for every [`DatasetEvent`].
    ///
    /// Default: None
    pub on_event: Option<EventCallback>,
}

impl fmt::Debug for DatasetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetOptions")
            .field("on_event", &self.on_event.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl DatasetOptions {
    #[must_use]
    pub fn on_event(mut self, on_event: EventCallback) -> Self {
        self.on_event = Some(on_event);
        self
    }

    pub(crate) fn emit(&self, event: DatasetEvent) {
        if let Some(ref callback) = self.on_event {
            callback(&event);
        }
    }
}
