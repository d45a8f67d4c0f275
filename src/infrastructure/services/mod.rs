//! Infrastructure services

mod catalog_service;
mod prediction_service;
mod query_image_service;

pub use catalog_service::CatalogService;
pub use prediction_service::PredictionService;
pub use query_image_service::QueryImageService;
