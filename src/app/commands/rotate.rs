//! Dated download folders with a keep-the-newest-N retention policy.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::Span;

use crate::adapters::LocalFolderFilesystem;
use crate::domain::{AppError, FolderNamePattern};
use crate::ports::FolderFilesystem;

/// Result of one attempted folder deletion.
#[derive(Debug)]
pub struct FolderDeletion {
    pub path: PathBuf,
    pub outcome: io::Result<()>,
}

impl FolderDeletion {
    pub fn is_deleted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// What a create-then-rotate pass did.
#[derive(Debug)]
pub struct RotationReport {
    pub created: PathBuf,
    pub deletions: Vec<FolderDeletion>,
}

impl RotationReport {
    pub fn deleted(&self) -> Vec<&Path> {
        self.deletions.iter().filter(|d| d.is_deleted()).map(|d| d.path.as_path()).collect()
    }

    pub fn failed(&self) -> Vec<&FolderDeletion> {
        self.deletions.iter().filter(|d| !d.is_deleted()).collect()
    }
}

/// Creates timestamped folders under `base_dir` and prunes the oldest matching ones.
///
/// Folder order is name order, which is only time order for fixed-width,
/// zero-padded date formats such as the default `%Y%m%d_%H%M%S`.
pub struct FolderRotator<F: FolderFilesystem> {
    fs: F,
    base_dir: PathBuf,
    names: FolderNamePattern,
    span: Span,
}

impl<F: FolderFilesystem> FolderRotator<F> {
    pub fn new(fs: F, base_dir: impl Into<PathBuf>, names: FolderNamePattern) -> Self {
        let base_dir = base_dir.into();
        let span = tracing::info_span!("folder_rotator", base_dir = %base_dir.display());
        Self { fs, base_dir, names, span }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the folder for the current local time.
    pub fn create_download_dir(&self, exist_ok: bool) -> Result<PathBuf, AppError> {
        self.create_download_dir_at(&Local::now(), exist_ok)
    }

    pub fn create_download_dir_at<Tz: TimeZone>(
        &self,
        when: &DateTime<Tz>,
        exist_ok: bool,
    ) -> Result<PathBuf, AppError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let _entered = self.span.enter();
        let path = self.base_dir.join(self.names.name_for(when));
        tracing::debug!(path = %path.display(), "Attempting to create new directory");

        if !self.fs.is_dir(&self.base_dir) {
            return Err(AppError::MissingBaseDirectory(self.base_dir.clone()));
        }

        match self.fs.create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if !(exist_ok && self.fs.is_dir(&path)) {
                    return Err(AppError::DirectoryExists(path));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AppError::MissingBaseDirectory(self.base_dir.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(path = %path.display(), "Successfully created");
        Ok(path)
    }

    /// Children of `base_dir` whose names match the pattern, oldest first.
    pub fn matching_folders(&self) -> Result<Vec<PathBuf>, AppError> {
        let mut matches: Vec<PathBuf> = self
            .fs
            .list_children(&self.base_dir)?
            .into_iter()
            .filter(|path| {
                path.file_name().and_then(|n| n.to_str()).is_some_and(|n| self.names.matches(n))
            })
            .collect();
        matches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(matches)
    }

    /// All matching folders except the newest `max_folder_count`.
    pub fn folders_to_delete(&self, max_folder_count: usize) -> Result<Vec<PathBuf>, AppError> {
        let mut matches = self.matching_folders()?;
        let excess = matches.len().saturating_sub(max_folder_count);
        matches.truncate(excess);
        Ok(matches)
    }

    /// Delete the excess folders. A failed deletion is recorded and the rest still run.
    pub fn rotate_download_dirs(
        &self,
        max_folder_count: usize,
    ) -> Result<Vec<FolderDeletion>, AppError> {
        let _entered = self.span.enter();
        let to_delete = self.folders_to_delete(max_folder_count)?;

        let deletions = to_delete
            .into_iter()
            .map(|path| {
                tracing::debug!(path = %path.display(), "Attempting to delete");
                let outcome = self.fs.remove_dir_all(&path);
                match &outcome {
                    Ok(()) => tracing::debug!(path = %path.display(), "Successfully deleted"),
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Could not delete; leaving in place"
                    ),
                }
                FolderDeletion { path, outcome }
            })
            .collect();
        Ok(deletions)
    }

    /// Create today's folder, then rotate. The new folder counts toward `max_folder_count`.
    pub fn get_rotated_directory(
        &self,
        exist_ok: bool,
        max_folder_count: usize,
    ) -> Result<RotationReport, AppError> {
        self.get_rotated_directory_at(&Local::now(), exist_ok, max_folder_count)
    }

    pub fn get_rotated_directory_at<Tz: TimeZone>(
        &self,
        when: &DateTime<Tz>,
        exist_ok: bool,
        max_folder_count: usize,
    ) -> Result<RotationReport, AppError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let created = self.create_download_dir_at(when, exist_ok)?;
        let deletions = self.rotate_download_dirs(max_folder_count)?;
        let report = RotationReport { created, deletions };

        let _entered = self.span.enter();
        let deleted: Vec<String> =
            report.deleted().iter().map(|p| p.display().to_string()).collect();
        tracing::info!(created = %report.created.display(), ?deleted, "Rotated download folders");
        Ok(report)
    }
}

/// Create a dated folder under `base_dir` and keep only the newest `max_folder_count` matches.
///
/// Returns the new folder's path. Folders that could not be deleted are logged and left on disk.
pub fn get_rotated_directory(
    base_dir: &Path,
    prefix: &str,
    date_format: &str,
    exist_ok: bool,
    pattern: &str,
    max_folder_count: usize,
) -> Result<PathBuf, AppError> {
    let names = FolderNamePattern::new(prefix, date_format, pattern)?;
    let rotator = FolderRotator::new(LocalFolderFilesystem, base_dir, names);
    Ok(rotator.get_rotated_directory(exist_ok, max_folder_count)?.created)
}
