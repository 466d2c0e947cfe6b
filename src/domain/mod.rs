pub mod config;
pub mod error;
pub mod folder_name;
pub mod stops;
pub mod table;
pub mod webmap;

pub use config::{
    ColumnSpec, ColumnType, DataConfig, EraConfig, LoggingConfig, PortalConfig, ReclassifyConfig,
    RotationConfig, TransferConfig,
};
pub use error::AppError;
pub use folder_name::FolderNamePattern;
pub use stops::{ColumnStats, calculate_new_stops};
pub use table::DataTable;
pub use webmap::{apply_new_stops, find_layer_index};
