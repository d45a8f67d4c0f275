//! Query image references and directory listing entries

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An image to classify: a file on disk or bytes received in-memory
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Memory { name: String, bytes: Bytes },
}

impl ImageSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Human-readable identity for logs and errors
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Memory { name, .. } => format!("upload '{name}'"),
        }
    }
}

/// One file in the query-image directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryImageEntry {
    /// Class prefix of the filename, before the first `_`
    pub class_name: String,
    pub file_name: String,
    /// Directory-joined path
    pub path: PathBuf,
}

/// Class name of a query image: the filename up to the first `_`.
/// A name without `_` is returned whole, extension included.
pub fn derive_class_name(file_name: &str) -> String {
    file_name
        .split('_')
        .next()
        .unwrap_or(file_name)
        .to_string()
}

impl QueryImageEntry {
    pub fn from_file(dir: &Path, file_name: &str) -> Self {
        Self {
            class_name: derive_class_name(file_name),
            file_name: file_name.to_string(),
            path: dir.join(file_name),
        }
    }
}
