//! Catalog listing types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactReference, CatalogBuild, CatalogEntry};

/// One loadable model from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogModel {
    pub name: String,
    pub kind: String,
    pub sources: Vec<String>,
}

impl CatalogModel {
    /// Create a wire model from a catalog entry
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let kind = match entry.reference {
            ArtifactReference::Single { .. } => "single",
            ArtifactReference::Paired { .. } => "paired",
        };

        Self {
            name: entry.name.clone(),
            kind: kind.to_string(),
            sources: entry
                .reference
                .source_paths()
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        }
    }
}

/// Catalog listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<CatalogModel>,
    pub warnings: Vec<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ModelsResponse {
    /// Create a response from a finished catalog build
    pub fn from_build(build: &CatalogBuild) -> Self {
        Self {
            models: build.catalog.iter().map(CatalogModel::from_entry).collect(),
            warnings: build
                .warnings
                .iter()
                .map(|warning| warning.to_string())
                .collect(),
            scanned_at: Utc::now(),
        }
    }
}
