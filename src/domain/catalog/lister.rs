//! Directory listing seam used by the catalog and query-image scans

use std::path::Path;

use crate::domain::error::DomainError;

/// Lists file names in a directory, in scan order.
///
/// Implementations must not sort; the catalog builder applies its own ordering
/// rules where they matter.
pub trait DirectoryLister: Send + Sync + std::fmt::Debug {
    fn list(&self, dir: &Path) -> Result<Vec<String>, DomainError>;
}
