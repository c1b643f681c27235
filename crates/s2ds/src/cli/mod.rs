pub mod app;
pub mod download;
pub mod list;
pub mod stream;

use anyhow::Result;
use s2ds_client::S2Client;
use s2ds_datasets::{DatasetOptions, Datasets};

use crate::cli::app::{App, Commands};
use crate::config::Settings;
use crate::ui::tracker::ShardProgress;

pub fn run(app: App) -> Result<()> {
    let settings = Settings::load(app.global.config.as_deref())?.with_overrides(&app.global);
    let client = S2Client::new(settings.client_options()?)?;

    let progress = app.global.progress.then(ShardProgress::new);
    let mut options = DatasetOptions::default();
    if let Some(ref progress) = progress {
        options = options.on_event(progress.event_callback());
    }
    let datasets = Datasets::new(client).with_options(options);

    let result = match app.cmd {
        Commands::Releases => list::releases(&datasets),
        Commands::Latest => list::latest(&datasets),
        Commands::Shards(arg) => list::shards(&datasets, arg),
        Commands::Stream(arg) => stream::run(&datasets, arg, progress.as_ref()),
        Commands::Download(arg) => download::run(&datasets, arg),
    };

    if let Some(progress) = progress {
        progress.finish();
    }
    result
}
