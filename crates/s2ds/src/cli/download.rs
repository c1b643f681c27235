use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use s2ds_client::Transport;
use s2ds_datasets::Datasets;
use tracing::info;

#[derive(Debug, Args)]
pub struct DownloadArg {
    #[arg(required_unless_present = "shard", help = "Dataset name, e.g. papers")]
    pub dataset: Option<String>,

    #[arg(default_value = ".", help = "Directory to write {dataset}_{index:03}.gz files into")]
    pub dir: PathBuf,

    #[arg(long, value_name = "URL", requires = "output", conflicts_with = "dataset", help = "Download a single shard URL instead")]
    pub shard: Option<String>,

    #[arg(long, short, value_name = "FILE", requires = "shard", help = "Destination file for --shard")]
    pub output: Option<PathBuf>,
}

pub fn run<T: Transport>(datasets: &Datasets<T>, arg: DownloadArg) -> Result<()> {
    if let (Some(url), Some(output)) = (arg.shard.as_deref(), arg.output.as_ref()) {
        let bytes = datasets
            .download_shard(url, output)
            .with_context(|| format!("failed to download {url}"))?;
        info!(path = %output.display(), bytes, "shard saved");
        println!("{}", output.display());
        return Ok(());
    }

    let dataset = arg.dataset.context("either a dataset or --shard is required")?;
    let paths = datasets
        .download_all(&dataset, &arg.dir)
        .with_context(|| format!("failed to download dataset `{dataset}`"))?;

    info!(dataset, files = paths.len(), dir = %arg.dir.display(), "dataset saved");
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}
