//! Domain layer - Core business logic and entities

pub mod catalog;
pub mod error;
pub mod image;
pub mod prediction;
pub mod preprocess;
pub mod runtime;

pub use catalog::{
    classify, derive_entry_name, derive_pairing_name, validate_model_selector, ArtifactFile,
    ArtifactKind, ArtifactReference, Catalog, CatalogBuild, CatalogBuilder, CatalogEntry,
    CatalogWarning, DirectoryLister, SelectorError,
};
pub use error::DomainError;
pub use image::{
    derive_class_name, ImageDecoder, ImageSource, PixelFormat, QueryImageEntry, RasterImage,
};
pub use prediction::Prediction;
pub use preprocess::{ColorMode, ImageTensor, Preprocessor};
pub use runtime::{InputShape, LoadedModel, ModelRuntime};
