mod cli;
mod config;
mod logging;
mod ui;

use clap::Parser;

use crate::cli::app::App;

fn main() -> anyhow::Result<()> {
    let app = App::parse();
    logging::init(app.global.verbose);
    cli::run(app)
}
