//! Filesystem-backed directory listing

use std::fs;
use std::path::Path;

use crate::domain::catalog::DirectoryLister;
use crate::domain::error::DomainError;

/// Lists directory entries with `std::fs::read_dir`.
///
/// Names come back in the order the OS yields them; the catalog builder
/// applies its own ordering where it matters.
#[derive(Debug, Default, Clone)]
pub struct FsDirectoryLister;

impl FsDirectoryLister {
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryLister for FsDirectoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<String>, DomainError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| DomainError::catalog_io(dir.display().to_string(), e.to_string()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| DomainError::catalog_io(dir.display().to_string(), e.to_string()))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        Ok(names)
    }
}
