//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::config::parse_config_content;
use crate::domain::{AppError, EraConfig};

/// Load and validate `era.toml` at `path`.
pub fn load_config(path: &Path) -> Result<EraConfig, AppError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            AppError::config_error(format!("Configuration file not found: {}", path.display()))
        }
        _ => AppError::Io(e),
    })?;
    parse_config_content(&content)
}
