use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Catalog I/O error at {path}: {message}")]
    CatalogIo { path: String, message: String },

    #[error("Model load error for '{artifact}': {message}")]
    ModelLoad { artifact: String, message: String },

    #[error("Image decode error: {message}")]
    ImageDecode { message: String },

    #[error("Inference error: {message}")]
    Inference { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn catalog_io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CatalogIo {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn model_load(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    pub fn image_decode(message: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
