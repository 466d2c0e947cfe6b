pub mod era_config;
pub mod parse;

pub use era_config::{
    ColumnSpec, ColumnType, DEFAULT_CONFIG_FILE, DataConfig, EraConfig, LoggingConfig,
    PORTAL_PASSWORD_ENV, PortalConfig, ReclassifyConfig, RotationConfig, TransferConfig,
};
pub use parse::parse_config_content;
