//! Query image service - lists the showcase image directory

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::catalog::DirectoryLister;
use crate::domain::error::DomainError;
use crate::domain::image::QueryImageEntry;

/// Lists query images with their class prefixes
#[derive(Debug, Clone)]
pub struct QueryImageService {
    lister: Arc<dyn DirectoryLister>,
}

impl QueryImageService {
    pub fn new(lister: Arc<dyn DirectoryLister>) -> Self {
        Self { lister }
    }

    /// List `dir` in scan order. Every entry is included as-is; nothing
    /// filters on extension or sorts.
    pub fn list(&self, dir: &Path) -> Result<Vec<QueryImageEntry>, DomainError> {
        let names = self.lister.list(dir)?;
        let entries: Vec<QueryImageEntry> = names
            .iter()
            .map(|name| QueryImageEntry::from_file(dir, name))
            .collect();

        debug!(directory = %dir.display(), count = entries.len(), "query images listed");
        Ok(entries)
    }
}
