use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use s2ds_client::Transport;
use s2ds_datasets::Datasets;

#[derive(Debug, Args)]
pub struct ShardsArg {
    #[arg(help = "Dataset name, e.g. papers")]
    pub dataset: String,

    #[arg(long, short, help = "Release id [default: latest]")]
    pub release: Option<String>,
}

pub fn releases<T: Transport>(datasets: &Datasets<T>) -> Result<()> {
    print_lines(datasets.release_ids()?)
}

pub fn latest<T: Transport>(datasets: &Datasets<T>) -> Result<()> {
    print_lines([datasets.latest_release_id()?])
}

pub fn shards<T: Transport>(datasets: &Datasets<T>, arg: ShardsArg) -> Result<()> {
    let release_id = match arg.release {
        Some(release_id) => release_id,
        None => datasets.latest_release_id()?,
    };
    print_lines(datasets.shards(&arg.dataset, &release_id)?)
}

fn print_lines(lines: impl IntoIterator<Item = String>) -> Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
