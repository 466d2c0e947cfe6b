//! era: keep the ERAP feature layer and its web map in step with the delivered extract.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    FolderDeletion, RotateOptions, RotationReport, RunSummary, config_path, reclassify, rotate, run,
    run_at, stops_from_csv,
};
pub use app::commands::rotate::get_rotated_directory;
pub use app::config::load_config;
pub use domain::{AppError, DataTable, EraConfig, FolderNamePattern, calculate_new_stops};
