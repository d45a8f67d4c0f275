//! Wire types for the HTTP API

pub mod error;
pub mod images;
pub mod json;
pub mod models;
pub mod predictions;

pub use error::{ApiError, ApiErrorResponse};
pub use images::{QueryImage, QueryImagesResponse};
pub use json::Json;
pub use models::{CatalogModel, ModelsResponse};
pub use predictions::{
    CompareRequest, CompareResponse, LabeledScore, PredictRequest, PredictionResponse,
};
