use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::cli::{download, list, stream};

#[derive(Debug, Parser)]
#[command(
    name = "s2ds",
    version = env!("CARGO_PKG_VERSION"),
    about = "Stream or download Semantic Scholar bulk datasets",
    long_about = None,
    propagate_version = true
)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, value_name = "FILE", help = "TOML config file [default: ./s2ds.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "S2_API_KEY", hide_env_values = true, help = "Datasets API key")]
    pub api_key: Option<String>,

    #[arg(long, global = true, value_name = "URL", help = "Datasets API root")]
    pub base_url: Option<String>,

    #[arg(long, global = true, value_name = "N", help = "`limit` sent on listing requests")]
    pub page_limit: Option<u32>,

    #[arg(long, global = true, conflicts_with = "page_limit", help = "Do not send `limit` at all")]
    pub no_page_limit: bool,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More logging (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[arg(long, global = true, help = "Show progress bars on stderr")]
    pub progress: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "r", name = "releases", about = "List every release id, oldest first")]
    Releases,
    #[command(name = "latest", about = "Print the latest release id")]
    Latest,
    #[command(alias = "ls", name = "shards", about = "List the shard URLs of a dataset")]
    Shards(list::ShardsArg),
    #[command(alias = "s", name = "stream", about = "Write every record of a dataset to stdout as JSON lines")]
    Stream(stream::StreamArg),
    #[command(alias = "dl", name = "download", about = "Save the gzip shards of a dataset to a directory")]
    Download(download::DownloadArg),
}
