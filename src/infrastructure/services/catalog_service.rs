//! Catalog service - scans the model directory on demand

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::catalog::{CatalogBuild, CatalogBuilder, DirectoryLister};
use crate::domain::error::DomainError;

/// Builds the artifact catalog.
///
/// Holds no cached state. Every scan walks the directory again, so the
/// catalog always reflects what is on disk right now.
#[derive(Debug, Clone)]
pub struct CatalogService {
    builder: CatalogBuilder,
}

impl CatalogService {
    pub fn new(lister: Arc<dyn DirectoryLister>) -> Self {
        Self {
            builder: CatalogBuilder::new(lister),
        }
    }

    /// Scan `dir` and build the catalog, logging every dropped file
    pub fn scan(&self, dir: &Path) -> Result<CatalogBuild, DomainError> {
        let build = self.builder.build(dir)?;

        for warning in &build.warnings {
            warn!(directory = %dir.display(), %warning, "catalog drop");
        }
        debug!(
            directory = %dir.display(),
            entries = build.catalog.len(),
            warnings = build.warnings.len(),
            "catalog scan complete"
        );

        Ok(build)
    }
}
