//! Subscriber setup for the binary: stderr plus an optional per-run log file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::{AppError, LoggingConfig};

/// Install the global subscriber. Rolls over `log_path` first so each run gets a fresh file.
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = match &config.log_path {
        Some(path) => {
            roll_over(path, config.rotate_count)?;
            let file = File::options().create(true).append(true).open(path)?;
            Some(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::config_error(format!("Failed to initialise logging: {}", e)))
}

/// Shift `log`, `log.1`, ... up by one, keeping at most `backups` old files.
pub fn roll_over(path: &Path, backups: usize) -> io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if backups == 0 {
        return fs::remove_file(path);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..backups).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            fs::rename(&from, backup_path(path, index + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
