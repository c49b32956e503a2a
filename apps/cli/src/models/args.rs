//! # CLI Argument Definitions

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use obs_kernel::config::DEFAULT_SETTINGS_FILE;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "obs-site")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Check and inspect the settings of the Observatory site")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write rolling log files to this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Ignore `SITE__*` environment overrides
    #[arg(long, global = true)]
    pub no_env: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load and validate the settings
    Check {
        /// Settings file (extension optional)
        #[arg(default_value = DEFAULT_SETTINGS_FILE)]
        file: PathBuf,
        /// Also check that the theme and plugins exist
        #[arg(long)]
        locate: bool,
    },
    /// Print the settings record, or a single option
    Show {
        #[arg(default_value = DEFAULT_SETTINGS_FILE)]
        file: PathBuf,
        /// Option name, in either case (e.g. `SITENAME`)
        #[arg(long, short)]
        key: Option<String>,
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// List the feeds the generator will write
    Feeds {
        #[arg(default_value = DEFAULT_SETTINGS_FILE)]
        file: PathBuf,
    },
    /// Print the URL and output path of a piece of content
    Url {
        #[arg(default_value = DEFAULT_SETTINGS_FILE)]
        file: PathBuf,
        #[arg(long)]
        slug: String,
        /// Use the page patterns instead of the article ones
        #[arg(long)]
        page: bool,
        /// Publication date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        lang: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Toml,
}
