//! Diagnostics for files the catalog silently excludes

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A file or pairing the catalog build dropped without failing.
///
/// Dropping is part of the catalog contract; these exist so the drops are
/// visible in logs and listings instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogWarning {
    /// Entry matched no filename convention
    Unclassified { file: String },
    /// Architecture popped for a weight whose file name did not contain its
    /// pairing name; both sides are dropped
    PairMismatch {
        architecture: PathBuf,
        weights: PathBuf,
    },
    /// Architecture never popped because the weights ran out first
    UnmatchedArchitecture { path: PathBuf },
    /// Weight left over after the architectures ran out
    UnmatchedWeights { path: PathBuf },
    /// Paired entries replaced wholesale because self-contained models exist
    PairedShadowedBySingle { names: Vec<String> },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassified { file } => {
                write!(f, "unclassified file excluded: {file}")
            }
            Self::PairMismatch {
                architecture,
                weights,
            } => write!(
                f,
                "pairing mismatch: {} dropped against {}",
                architecture.display(),
                weights.display()
            ),
            Self::UnmatchedArchitecture { path } => {
                write!(f, "architecture left unpaired: {}", path.display())
            }
            Self::UnmatchedWeights { path } => {
                write!(f, "weights left unpaired: {}", path.display())
            }
            Self::PairedShadowedBySingle { names } => write!(
                f,
                "paired entries shadowed by self-contained models: {}",
                names.join(", ")
            ),
        }
    }
}
