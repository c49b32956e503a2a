#![allow(clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{check, feeds, show, url};
use crate::models::args::{Cli, Commands};

use anyhow::{Context, Result};
use clap::Parser;
use obs_kernel::config::SettingsLoader;
use obs_logger::{Logger, level_for_verbosity};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = Logger::builder()
        .name(env!("CARGO_BIN_NAME"))
        .level(level_for_verbosity(cli.verbose, cli.quiet));
    if let Some(dir) = &cli.log_dir {
        logger = logger.log_dir(dir);
    }
    let _log = logger.init().context("Failed to initialize logging")?;

    match &cli.command {
        Commands::Check { file, locate } => check::run(loader(&cli, file), file, *locate)?,
        Commands::Show { file, key, format } => {
            show::run(&loader(&cli, file), key.as_deref(), *format)?;
        },
        Commands::Feeds { file } => feeds::run(&loader(&cli, file))?,
        Commands::Url { file, slug, page, date, lang } => {
            url::run(&loader(&cli, file), slug, *page, *date, lang.as_deref())?;
        },
    }

    Ok(())
}

fn loader(cli: &Cli, file: &Path) -> SettingsLoader {
    let loader = SettingsLoader::new().path(file);
    if cli.no_env { loader.without_env() } else { loader }
}
