//! Artifact files and references discovered in a model directory

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Classification of a discovered artifact file, by filename convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Architecture descriptor (`*model.json`)
    Architecture,
    /// Weights payload (`*weights.h5` / `*weights.hdf5`)
    Weights,
    /// Self-contained model (`*model.h5` / `*model.hdf5`)
    SelfContained,
}

/// A discovered file together with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl ArtifactFile {
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Reference to a loadable model: one file, or an architecture/weights pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactReference {
    Single { path: PathBuf },
    Paired { architecture: PathBuf, weights: PathBuf },
}

impl ArtifactReference {
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self::Single { path: path.into() }
    }

    pub fn paired(architecture: impl Into<PathBuf>, weights: impl Into<PathBuf>) -> Self {
        Self::Paired {
            architecture: architecture.into(),
            weights: weights.into(),
        }
    }

    pub fn is_paired(&self) -> bool {
        matches!(self, Self::Paired { .. })
    }

    /// Path the catalog entry name derives from
    pub fn primary_path(&self) -> &Path {
        match self {
            Self::Single { path } => path,
            Self::Paired { architecture, .. } => architecture,
        }
    }

    /// All files backing this reference
    pub fn source_paths(&self) -> Vec<&Path> {
        match self {
            Self::Single { path } => vec![path],
            Self::Paired {
                architecture,
                weights,
            } => vec![architecture, weights],
        }
    }
}

/// Classify a directory entry by its filename. Substring tests, first match
/// wins, case-sensitive. Unrecognized names return `None` and are excluded
/// from the catalog.
pub fn classify(file_name: &str) -> Option<ArtifactKind> {
    if file_name.contains("model.json") {
        Some(ArtifactKind::Architecture)
    } else if file_name.contains("weights.h5") || file_name.contains("weights.hdf5") {
        Some(ArtifactKind::Weights)
    } else if file_name.contains("model.h5") || file_name.contains("model.hdf5") {
        Some(ArtifactKind::SelfContained)
    } else {
        None
    }
}

/// Catalog entry name: the file basename truncated at the first `.`
/// (`VGG19_model.json` -> `VGG19_model`).
pub fn derive_entry_name(path: &Path) -> String {
    truncate_at(&base_name(path), '.')
}

/// Pairing name: the file basename, extension included, truncated at the
/// first `_` (`VGG19_model.json` -> `VGG19`). A basename without `_` is
/// returned whole.
pub fn derive_pairing_name(path: &Path) -> String {
    truncate_at(&base_name(path), '_')
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn truncate_at(name: &str, separator: char) -> String {
    match name.split(separator).next() {
        Some(head) => head.to_string(),
        None => name.to_string(),
    }
}
