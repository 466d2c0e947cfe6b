//! `FileTransfer` that mirrors a mounted share into the download folder.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::ports::FileTransfer;

/// Copies the files of `<source_dir>/<remote_folder>` keeping modification times.
#[derive(Debug, Clone)]
pub struct MirroredDirectoryTransfer {
    source_dir: PathBuf,
}

impl MirroredDirectoryTransfer {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self { source_dir: source_dir.into() }
    }
}

impl FileTransfer for MirroredDirectoryTransfer {
    fn download(&self, remote_folder: &str, dest_dir: &Path) -> Result<usize, AppError> {
        let remote = self.source_dir.join(remote_folder);
        tracing::info!(from = %remote.display(), to = %dest_dir.display(), "Downloading files");
        if !remote.is_dir() {
            return Err(AppError::RemoteFolderNotFound(PathBuf::from(remote_folder)));
        }

        let mut copied = 0;
        for entry in fs::read_dir(&remote)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let target = dest_dir.join(entry.file_name());
            fs::copy(entry.path(), &target)?;
            File::options().write(true).open(&target)?.set_modified(metadata.modified()?)?;
            tracing::debug!(file = %target.display(), "Copied");
            copied += 1;
        }

        tracing::info!(count = copied, "Files downloaded");
        Ok(copied)
    }
}
