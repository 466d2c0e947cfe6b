//! Configuration domain models loaded from `era.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::domain::folder_name::{DEFAULT_DATE_FORMAT, DEFAULT_DATE_PATTERN, FolderNamePattern};

/// Environment variable holding the portal password.
pub const PORTAL_PASSWORD_ENV: &str = "ERA_PORTAL_PASSWORD";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "era.toml";

/// Full configuration for one scheduled run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EraConfig {
    pub rotation: RotationConfig,
    pub transfer: TransferConfig,
    pub data: DataConfig,
    pub portal: PortalConfig,
    pub reclassify: ReclassifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EraConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.rotation.validate()?;
        self.data.validate()?;
        self.portal.validate()?;
        self.reclassify.validate()?;
        Ok(())
    }
}

/// Download folder naming and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationConfig {
    /// Directory holding the dated download folders. Must already exist.
    pub base_dir: PathBuf,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Regex for the date portion of a folder name.
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Matching folders kept after rotation, the new one included.
    #[serde(default = "default_max_folder_count")]
    pub max_folder_count: usize,
    #[serde(default)]
    pub exist_ok: bool,
}

impl RotationConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: String::new(),
            date_format: default_date_format(),
            pattern: default_pattern(),
            max_folder_count: default_max_folder_count(),
            exist_ok: false,
        }
    }

    pub fn name_pattern(&self) -> Result<FolderNamePattern, AppError> {
        FolderNamePattern::new(&self.prefix, &self.date_format, &self.pattern)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(AppError::config_error("rotation.base_dir must not be empty"));
        }
        self.name_pattern()?;
        Ok(())
    }
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_pattern() -> String {
    DEFAULT_DATE_PATTERN.to_string()
}

fn default_max_folder_count() -> usize {
    10
}

/// Source of the extract files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferConfig {
    /// Local mount of the transfer share.
    pub source_dir: PathBuf,
    /// Folder on the share, relative to `source_dir`.
    #[serde(default = "default_transfer_folder")]
    pub folder: String,
}

fn default_transfer_folder() -> String {
    "upload".to_string()
}

/// Declared type of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

/// One positional CSV column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self { name: name.into(), column_type }
    }
}

/// Extract layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub file_name: String,
    /// Column matched against the feature service key field.
    pub key_column: String,
    #[serde(default)]
    pub has_header: bool,
    pub columns: Vec<ColumnSpec>,
}

impl DataConfig {
    /// Column names in file order; the first is the update key field.
    pub fn field_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.file_name.trim().is_empty() {
            return Err(AppError::config_error("data.file_name must not be empty"));
        }
        if self.columns.is_empty() {
            return Err(AppError::config_error("data.columns must not be empty"));
        }
        if self.columns.first().map(|c| c.name.as_str()) != Some(self.key_column.as_str()) {
            return Err(AppError::config_error(format!(
                "data.key_column '{}' must be the first entry of data.columns",
                self.key_column
            )));
        }
        Ok(())
    }
}

/// Mapping portal connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortalConfig {
    pub org_url: Url,
    pub username: String,
    /// Layer endpoint receiving the in-line updates, e.g. `.../FeatureServer/0`.
    pub feature_service_url: Url,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl PortalConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::config_error("portal.username must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("portal.timeout_secs must be greater than 0"));
        }
        if self.page_size == 0 {
            return Err(AppError::config_error("portal.page_size must be greater than 0"));
        }
        Ok(())
    }

    /// Portal password from the environment.
    pub fn password_from_env(&self) -> Result<String, AppError> {
        std::env::var(PORTAL_PASSWORD_ENV)
            .map_err(|_| AppError::EnvironmentVariableMissing(PORTAL_PASSWORD_ENV.into()))
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    2000
}

/// Color ramp reclassification target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReclassifyConfig {
    pub webmap_item_id: String,
    pub layer_title: String,
    pub column: String,
    #[serde(default = "default_stop_count")]
    pub stop_count: usize,
}

impl ReclassifyConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.webmap_item_id.trim().is_empty() {
            return Err(AppError::config_error("reclassify.webmap_item_id must not be empty"));
        }
        if self.stop_count == 0 {
            return Err(AppError::config_error("reclassify.stop_count must be greater than 0"));
        }
        Ok(())
    }
}

fn default_stop_count() -> usize {
    5
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    #[serde(default = "default_level")]
    pub level: String,
    pub log_path: Option<PathBuf>,
    /// Rolled-over log files kept next to `log_path`.
    #[serde(default = "default_rotate_count")]
    pub rotate_count: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level(), log_path: None, rotate_count: default_rotate_count() }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_rotate_count() -> usize {
    10
}
