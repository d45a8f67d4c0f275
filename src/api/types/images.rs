//! Query image listing types

use serde::{Deserialize, Serialize};

use crate::domain::QueryImageEntry;

/// One sample image available for classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryImage {
    pub class_name: String,
    pub file_name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl QueryImage {
    /// Create a wire image from a directory entry
    pub fn from_entry(entry: &QueryImageEntry) -> Self {
        let content_type = mime_guess::from_path(&entry.path)
            .first_raw()
            .map(|mime| mime.to_string());

        Self {
            class_name: entry.class_name.clone(),
            file_name: entry.file_name.clone(),
            path: entry.path.display().to_string(),
            content_type,
        }
    }
}

/// Query image listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryImagesResponse {
    pub images: Vec<QueryImage>,
}

impl QueryImagesResponse {
    pub fn new(entries: &[QueryImageEntry]) -> Self {
        Self {
            images: entries.iter().map(QueryImage::from_entry).collect(),
        }
    }
}
