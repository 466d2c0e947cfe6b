//! Filesystem port used by folder rotation.

use std::io;
use std::path::{Path, PathBuf};

/// Directory operations needed to create and rotate dated folders.
pub trait FolderFilesystem {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a single directory. The parent must exist.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Immediate children of `dir`, files included.
    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Recursively delete `path`.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

impl<T: FolderFilesystem + ?Sized> FolderFilesystem for &T {
    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir(path)
    }

    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_children(dir)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }
}
