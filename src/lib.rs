//! PMP Vision Gateway
//!
//! An image classification service over filesystem model artifacts:
//! - Model catalog discovered by filename convention (paired architecture +
//!   weights files, or self-contained payloads)
//! - Adaptive preprocessing driven by each model's declared input shape
//! - JSON API plus one-shot CLI commands

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod testkit;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, ClassifierSettings};
use infrastructure::fs_lister::FsDirectoryLister;
use infrastructure::imaging::BilinearDecoder;
use infrastructure::runtime::SequentialRuntime;
use infrastructure::services::{CatalogService, PredictionService, QueryImageService};

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let lister = Arc::new(FsDirectoryLister);
    let decoder = Arc::new(BilinearDecoder);
    let runtime = Arc::new(SequentialRuntime::new());

    let catalog_service = Arc::new(CatalogService::new(lister.clone()));
    let query_image_service = Arc::new(QueryImageService::new(lister.clone()));
    let prediction_service = Arc::new(PredictionService::new(
        lister,
        decoder,
        runtime,
        config.classifier.color_mode,
    ));

    let settings = ClassifierSettings {
        model_dir: config.artifacts.model_dir.clone(),
        query_image_dir: config.artifacts.query_image_dir.clone(),
        upload_dir: config.artifacts.upload_dir.clone(),
        labels: config.classifier.labels.clone(),
    };

    Ok(AppState::new(
        catalog_service,
        query_image_service,
        prediction_service,
        settings,
    ))
}
