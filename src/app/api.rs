//! API Facade for the application.
//!
//! Glues configuration, adapter construction, and command execution together.

use std::path::{Path, PathBuf};

use crate::adapters::{
    ArcGisPortalClient, LocalFolderFilesystem, MirroredDirectoryTransfer, read_headed_csv,
};
use crate::app::AppContext;
use crate::app::commands::process;
use crate::app::commands::reclassify::ColorRampReclassifier;
use crate::app::commands::rotate;
use crate::app::config::load_config;
use crate::domain::config::DEFAULT_CONFIG_FILE;
use crate::domain::folder_name::{DEFAULT_DATE_FORMAT, DEFAULT_DATE_PATTERN};
use crate::domain::stops::calculate_new_stops;
use crate::domain::{AppError, EraConfig};

pub use crate::app::commands::process::RunSummary;
pub use crate::app::commands::rotate::{FolderDeletion, RotationReport};

/// Options for a standalone rotation.
#[derive(Debug, Clone)]
pub struct RotateOptions {
    pub base_dir: PathBuf,
    pub prefix: String,
    pub date_format: String,
    pub pattern: String,
    pub exist_ok: bool,
    pub max_folder_count: usize,
}

impl RotateOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            pattern: DEFAULT_DATE_PATTERN.to_string(),
            exist_ok: false,
            max_folder_count: 10,
        }
    }
}

/// Resolve the configuration path, defaulting to `era.toml` in the current directory.
pub fn config_path(path: Option<&Path>) -> Result<PathBuf, AppError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(std::env::current_dir()?.join(DEFAULT_CONFIG_FILE)),
    }
}

/// Sign in with the password from the environment.
fn sign_in(config: &EraConfig) -> Result<ArcGisPortalClient, AppError> {
    let password = config.portal.password_from_env()?;
    ArcGisPortalClient::sign_in(&config.portal, &password)
}

/// Run the full update: rotate, download, update the feature layer, reclassify.
pub fn run(config: &EraConfig) -> Result<RunSummary, AppError> {
    let portal = sign_in(config)?;
    let ctx = AppContext::new(
        LocalFolderFilesystem,
        portal.clone(),
        portal,
        MirroredDirectoryTransfer::new(&config.transfer.source_dir),
    );
    process::execute(&ctx, config)
}

/// Load `path` and run the full update.
pub fn run_at(path: &Path) -> Result<RunSummary, AppError> {
    run(&load_config(path)?)
}

/// Create a dated folder and prune old ones; returns the new folder's path.
pub fn rotate(options: &RotateOptions) -> Result<PathBuf, AppError> {
    rotate::get_rotated_directory(
        &options.base_dir,
        &options.prefix,
        &options.date_format,
        options.exist_ok,
        &options.pattern,
        options.max_folder_count,
    )
}

/// Compute color ramp stops for `column` of a headed CSV file.
pub fn stops_from_csv(path: &Path, column: &str, stop_count: usize) -> Result<Vec<i64>, AppError> {
    let table = read_headed_csv(path)?;
    calculate_new_stops(&table, column, stop_count)
}

/// Reclassify the configured web map layer from its current data.
pub fn reclassify(config: &EraConfig) -> Result<bool, AppError> {
    let portal = sign_in(config)?;
    let target = &config.reclassify;
    ColorRampReclassifier::new(&portal, &portal, target.webmap_item_id.as_str())
        .update_color_ramp_values(&target.layer_title, &target.column, target.stop_count)
}
