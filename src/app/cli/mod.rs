//! CLI Adapter.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::api::{self, RotateOptions};
use crate::app::config::load_config;
use crate::app::logging::init_logging;
use crate::domain::folder_name::{DEFAULT_DATE_FORMAT, DEFAULT_DATE_PATTERN};
use crate::domain::{AppError, LoggingConfig};

#[derive(Parser)]
#[command(name = "era")]
#[command(version)]
#[command(
    about = "Sync the ERAP extract into its feature layer and keep the web map's color ramp current",
    long_about = None
)]
struct Cli {
    /// Log filter directive (overrides [logging].level)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rotate, download, update the feature layer, and reclassify the map
    #[clap(visible_alias = "r")]
    Run {
        /// Configuration file (defaults to ./era.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a dated download folder and prune the oldest ones
    #[clap(visible_alias = "rot")]
    Rotate {
        /// Directory the dated folders live in
        #[arg(short, long)]
        base_dir: PathBuf,
        /// Literal prefix for folder names
        #[arg(short, long, default_value = "")]
        prefix: String,
        /// strftime template for the date part
        #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,
        /// Regex the date part must match for a folder to be managed
        #[arg(long, default_value = DEFAULT_DATE_PATTERN)]
        pattern: String,
        /// Number of managed folders to keep, including the new one
        #[arg(short = 'n', long, default_value_t = 10)]
        max_folders: usize,
        /// Reuse today's folder if it already exists
        #[arg(long)]
        exist_ok: bool,
    },
    /// Print color ramp stops for a column of a CSV file
    #[clap(visible_alias = "s")]
    Stops {
        /// CSV file whose first record names the columns
        #[arg(long)]
        csv: PathBuf,
        /// Column to classify
        #[arg(short, long)]
        column: String,
        /// Number of stops
        #[arg(short = 'k', long, default_value_t = 5)]
        count: usize,
    },
    /// Recompute the configured web map layer's color ramp stops
    Reclassify {
        /// Configuration file (defaults to ./era.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), AppError> {
    let log_level = cli.log_level;

    match cli.command {
        Commands::Run { config } => {
            let config = load_config(&api::config_path(config.as_deref())?)?;
            init_logging(&with_level(config.logging.clone(), log_level))?;
            let summary = api::run(&config)?;
            println!("{}", summary);
        }
        Commands::Rotate { base_dir, prefix, date_format, pattern, max_folders, exist_ok } => {
            init_logging(&with_level(LoggingConfig::default(), log_level))?;
            let created = api::rotate(&RotateOptions {
                base_dir,
                prefix,
                date_format,
                pattern,
                exist_ok,
                max_folder_count: max_folders,
            })?;
            println!("{}", created.display());
        }
        Commands::Stops { csv, column, count } => {
            init_logging(&with_level(LoggingConfig::default(), log_level))?;
            let stops = api::stops_from_csv(&csv, &column, count)?;
            let rendered: Vec<String> = stops.iter().map(ToString::to_string).collect();
            println!("{}", rendered.join(","));
        }
        Commands::Reclassify { config } => {
            let config = load_config(&api::config_path(config.as_deref())?)?;
            init_logging(&with_level(config.logging.clone(), log_level))?;
            let result = if api::reclassify(&config)? { "Success" } else { "Failure" };
            println!("Reclassifier webmap update operation: {}", result);
        }
    }
    Ok(())
}

fn with_level(mut logging: LoggingConfig, level: Option<String>) -> LoggingConfig {
    if let Some(level) = level {
        logging.level = level;
    }
    logging
}
