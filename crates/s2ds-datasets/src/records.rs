//! Lazy record iterators over shard line streams.
//!
//! [`Records`] turns any line iterator into parsed JSON records;
//! [`DatasetRecords`] chains the shards of a dataset, opening each one only
//! when the previous one is exhausted. Both stop for good after the first error.

use std::io::{self, BufRead, BufReader};

use s2ds_client::{GzipStream, Transport};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{DatasetEvent, DatasetOptions};
use crate::shard::Shard;

/// Decompressed lines of one shard, straight off the wire, as raw bytes.
///
/// Lines are not checked for UTF-8 here; a bad byte is reported by
/// [`Records`] as a parse error on that line.
pub type ShardLines<R> = io::Split<BufReader<GzipStream<R>>>;

/// Type-erased line iterator handed to a line layer.
pub type BoxLines<'a> = Box<dyn Iterator<Item = io::Result<Vec<u8>>> + 'a>;

/// Identity line layer, used when no layer is given.
///
/// A line layer is any `FnMut(&Shard, BoxLines) -> BoxLines` applied to each
/// shard's raw lines before parsing, e.g. for progress tracking. A layer that
/// drops or reorders lines changes what the caller receives.
pub type Passthrough<'a> = fn(&Shard, BoxLines<'a>) -> BoxLines<'a>;

pub fn passthrough<'a>(_: &Shard, lines: BoxLines<'a>) -> BoxLines<'a> { lines }

pub(crate) fn open_lines<T: Transport>(transport: &T, url: &str) -> Result<ShardLines<T::Body>> {
    Ok(BufReader::new(transport.open_decompressed(url)?).split(b'\n'))
}

/// Parses one JSON record per non-blank line.
///
/// Lines may be `String`s or raw bytes. Yields `Err` for the first unreadable or invalid line and `None` ever after.
///
/// ```
/// use s2ds_datasets::Records;
/// use std::io::BufRead;
///
/// let text = "{\"corpusid\": 1}\n\n{\"corpusid\": 2}\n";
/// let ids: Vec<_> = Records::new(text.as_bytes().lines(), "inline")
///     .map(|r| r.unwrap()["corpusid"].as_u64().unwrap())
///     .collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub struct Records<I> {
    lines:   I,
    shard:   String,
    line:    u64,
    records: u64,
    done:    bool,
}

impl<I> Records<I> {
    /// `shard` names the source in error messages, usually its URL.
    pub fn new(lines: I, shard: impl Into<String>) -> Self {
        Self {
            lines,
            shard: shard.into(),
            line: 0,
            records: 0,
            done: false,
        }
    }

    /// Records yielded so far.
    pub fn records_read(&self) -> u64 { self.records }

    /// Lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> u64 { self.line }
}

impl<I, B> Iterator for Records<I>
where
    I: Iterator<Item = io::Result<B>>,
    B: AsRef<[u8]>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    self.done = true;
                    return Some(Err(Error::Read {
                        shard: self.shard.clone(),
                        source,
                    }));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };
            self.line += 1;

            let line = line.as_ref();
            if line.trim_ascii().is_empty() {
                continue;
            }

            return match serde_json::from_slice(line) {
                Ok(record) => {
                    self.records += 1;
                    Some(Ok(record))
                }
                Err(source) => {
                    self.done = true;
                    Some(Err(Error::Parse {
                        shard: self.shard.clone(),
                        line: self.line,
                        source,
                    }))
                }
            };
        }
    }
}

/// Records of every shard of a dataset, in listing order.
///
/// Created by [`Datasets::records`](crate::Datasets::records) and
/// [`Datasets::records_with`](crate::Datasets::records_with). Shards are
/// opened one at a time; after an error no further shard is requested.
pub struct DatasetRecords<'a, T: Transport, L> {
    transport: &'a T,
    options:   &'a DatasetOptions,
    shards:    std::vec::IntoIter<Shard>,
    current:   Option<(Shard, Records<BoxLines<'a>>)>,
    layer:     L,
    done:      bool,
}

impl<'a, T, L> DatasetRecords<'a, T, L>
where
    T: Transport,
    T::Body: 'a,
    L: FnMut(&Shard, BoxLines<'a>) -> BoxLines<'a>,
{
    pub(crate) fn new(
        transport: &'a T,
        options: &'a DatasetOptions,
        shards: Vec<Shard>,
        layer: L,
    ) -> Self {
        Self {
            transport,
            options,
            shards: shards.into_iter(),
            current: None,
            layer,
            done: false,
        }
    }

    /// Shards not yet opened.
    pub fn remaining_shards(&self) -> usize { self.shards.len() }

    fn open(&mut self, shard: Shard) -> Result<()> {
        debug!(shard = shard.index, shards = shard.total, url = %shard.url, "processing shard");
        self.options.emit(DatasetEvent::ShardStarted {
            shard: shard.clone(),
        });

        let lines: BoxLines<'a> = Box::new(open_lines(self.transport, &shard.url)?);
        let lines = (self.layer)(&shard, lines);
        let records = Records::new(lines, shard.url.clone());
        self.current = Some((shard, records));
        Ok(())
    }
}

impl<'a, T, L> Iterator for DatasetRecords<'a, T, L>
where
    T: Transport,
    T::Body: 'a,
    L: FnMut(&Shard, BoxLines<'a>) -> BoxLines<'a>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some((shard, mut records)) = self.current.take() {
                match records.next() {
                    Some(Ok(record)) => {
                        self.current = Some((shard, records));
                        return Some(Ok(record));
                    }
                    Some(Err(err)) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                    None => {
                        debug!(shard = shard.index, records = records.records_read(), "shard done");
                        self.options.emit(DatasetEvent::ShardStreamed {
                            records: records.records_read(),
                            shard,
                        });
                        continue;
                    }
                }
            }

            let Some(shard) = self.shards.next() else {
                self.done = true;
                return None;
            };
            if let Err(err) = self.open(shard) {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}
