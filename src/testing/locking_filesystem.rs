use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::adapters::LocalFolderFilesystem;
use crate::ports::FolderFilesystem;

/// Real filesystem where selected paths refuse deletion.
#[derive(Default)]
pub struct LockingFilesystem {
    inner: LocalFolderFilesystem,
    locked: RefCell<HashSet<PathBuf>>,
}

impl LockingFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self, path: impl Into<PathBuf>) {
        self.locked.borrow_mut().insert(path.into());
    }
}

impl FolderFilesystem for LockingFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir(path)
    }

    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        self.inner.list_children(dir)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.locked.borrow().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "folder is locked"));
        }
        self.inner.remove_dir_all(path)
    }
}
