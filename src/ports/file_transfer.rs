//! File transfer port for fetching the extract.

use std::path::Path;

use crate::domain::AppError;

/// Copies files from a remote folder into a local directory.
pub trait FileTransfer {
    /// Download every file in `remote_folder` into `dest_dir`. Returns the number of files.
    fn download(&self, remote_folder: &str, dest_dir: &Path) -> Result<usize, AppError>;
}
