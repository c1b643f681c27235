use std::fmt;

/// One shard of a dataset-at-a-release, with its position in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// 0-based position in the server's listing.
    pub index: usize,
    /// Number of shards in the listing.
    pub total: usize,
    pub url:   String,
}

impl Shard {
    /// Number the URLs of a listing in order.
    pub fn enumerate(urls: Vec<String>) -> Vec<Shard> {
        let total = urls.len();
        urls.into_iter()
            .enumerate()
            .map(|(index, url)| Shard { index, total, url })
            .collect()
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shard #{} of {}", self.index, self.total)
    }
}

/// File name for a downloaded shard: `{dataset}_{index:03}.gz`.
///
/// ```
/// use s2ds_datasets::shard_file_name;
///
/// assert_eq!(shard_file_name("papers", 7), "papers_007.gz");
/// assert_eq!(shard_file_name("papers", 1234), "papers_1234.gz");
/// ```
pub fn shard_file_name(dataset: &str, index: usize) -> String { format!("{dataset}_{index:03}.gz") }
