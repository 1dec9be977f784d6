// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;

use retrojukebox::{
    app,
    config::{Cli, Command, Settings},
    logging, ui,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading settings")?;
    cli.apply_overrides(&mut settings);

    let _log_guard = logging::init(&settings.logging)?;

    match &cli.command {
        Some(Command::Snapshot(args)) => app::run_snapshot(&settings, args),
        None => {
            let start_dir = match &cli.directory {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().context("reading current directory")?,
            };
            ui::run(settings, cli.config.clone(), start_dir)
        }
    }
}
