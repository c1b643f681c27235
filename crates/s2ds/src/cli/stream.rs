use std::io::{self, BufWriter, Write};

use anyhow::Result;
use clap::Args;
use s2ds_client::S2Client;
use s2ds_datasets::{BoxLines, Datasets, Records};
use serde_json::Value;
use tracing::info;

use crate::ui::tracker::ShardProgress;

#[derive(Debug, Args)]
pub struct StreamArg {
    #[arg(required_unless_present = "shard", help = "Dataset name, e.g. papers")]
    pub dataset: Option<String>,

    #[arg(long, value_name = "URL", conflicts_with = "dataset", help = "Stream a single shard URL instead")]
    pub shard: Option<String>,

    #[arg(long, short = 'n', value_name = "N", help = "Stop after N records")]
    pub limit: Option<usize>,
}

pub fn run(datasets: &Datasets<S2Client>, arg: StreamArg, progress: Option<&ShardProgress>) -> Result<()> {
    let limit = arg.limit.unwrap_or(usize::MAX);

    let written = match (arg.shard, arg.dataset) {
        (Some(url), _) => {
            let lines: BoxLines<'static> = Box::new(datasets.shard_lines(&url)?);
            let lines = match progress {
                Some(progress) => {
                    progress.start_shard(url.as_str());
                    progress.count_lines(lines)
                }
                None => lines,
            };
            write_records(Records::new(lines, url), limit)?
        }
        (None, Some(dataset)) => match progress {
            Some(progress) => write_records(datasets.records_with(&dataset, progress.layer())?, limit)?,
            None => write_records(datasets.records(&dataset)?, limit)?,
        },
        (None, None) => anyhow::bail!("either a dataset or --shard is required"),
    };

    info!(records = written, "stream finished");
    Ok(())
}

/// Writes one compact JSON document per line to stdout.
///
/// A closed stdout (e.g. piped into `head`) ends the run without error.
fn write_records<I>(records: I, limit: usize) -> Result<usize>
where
    I: Iterator<Item = s2ds_datasets::Result<Value>>,
{
    let mut out = BufWriter::new(io::stdout().lock());
    let mut written = 0;

    for record in records.take(limit) {
        let line = serde_json::to_string(&record?)?;
        if let Err(err) = writeln!(out, "{line}") {
            return closed_or(err, written);
        }
        written += 1;
    }

    if let Err(err) = out.flush() {
        return closed_or(err, written);
    }
    Ok(written)
}

fn closed_or(err: io::Error, written: usize) -> Result<usize> {
    if err.kind() == io::ErrorKind::BrokenPipe {
        info!(records = written, "stdout closed");
        return Ok(written);
    }
    Err(err.into())
}
