//! `FolderFilesystem` over `std::fs`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ports::FolderFilesystem;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFolderFilesystem;

impl FolderFilesystem for LocalFolderFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(dir)? {
            children.push(entry?.path());
        }
        Ok(children)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}
