//! Application state for shared services

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{CatalogBuild, DomainError, ImageSource, Prediction, QueryImageEntry};
use crate::infrastructure::services::{CatalogService, PredictionService, QueryImageService};

/// Directories and class labels the handlers work against
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub model_dir: PathBuf,
    pub query_image_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub labels: Vec<String>,
}

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<dyn CatalogServiceTrait>,
    pub query_image_service: Arc<dyn QueryImageServiceTrait>,
    pub prediction_service: Arc<dyn PredictionServiceTrait>,
    pub settings: Arc<ClassifierSettings>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        catalog_service: Arc<dyn CatalogServiceTrait>,
        query_image_service: Arc<dyn QueryImageServiceTrait>,
        prediction_service: Arc<dyn PredictionServiceTrait>,
        settings: ClassifierSettings,
    ) -> Self {
        Self {
            catalog_service,
            query_image_service,
            prediction_service,
            settings: Arc::new(settings),
        }
    }
}

/// Trait for catalog scanning
#[async_trait::async_trait]
pub trait CatalogServiceTrait: Send + Sync {
    async fn scan(&self, dir: &Path) -> Result<CatalogBuild, DomainError>;
}

/// Trait for query image listing
#[async_trait::async_trait]
pub trait QueryImageServiceTrait: Send + Sync {
    async fn list(&self, dir: &Path) -> Result<Vec<QueryImageEntry>, DomainError>;
}

/// Trait for prediction operations
#[async_trait::async_trait]
pub trait PredictionServiceTrait: Send + Sync {
    async fn predict_one(
        &self,
        name: &str,
        model_dir: &Path,
        image: ImageSource,
    ) -> Result<Prediction, DomainError>;

    async fn predict_many(
        &self,
        names: &[String],
        model_dir: &Path,
        image: ImageSource,
    ) -> Result<Vec<Prediction>, DomainError>;
}

// The concrete services are synchronous: they read directories, decode
// images and run inference on the CPU. The trait impls move each call onto
// the blocking pool so handlers never stall the async runtime.

fn join_error(err: tokio::task::JoinError) -> DomainError {
    DomainError::internal(format!("blocking task failed: {err}"))
}

#[async_trait::async_trait]
impl CatalogServiceTrait for CatalogService {
    async fn scan(&self, dir: &Path) -> Result<CatalogBuild, DomainError> {
        let service = self.clone();
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || CatalogService::scan(&service, &dir))
            .await
            .map_err(join_error)?
    }
}

#[async_trait::async_trait]
impl QueryImageServiceTrait for QueryImageService {
    async fn list(&self, dir: &Path) -> Result<Vec<QueryImageEntry>, DomainError> {
        let service = self.clone();
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || QueryImageService::list(&service, &dir))
            .await
            .map_err(join_error)?
    }
}

#[async_trait::async_trait]
impl PredictionServiceTrait for PredictionService {
    async fn predict_one(
        &self,
        name: &str,
        model_dir: &Path,
        image: ImageSource,
    ) -> Result<Prediction, DomainError> {
        let service = self.clone();
        let name = name.to_string();
        let model_dir = model_dir.to_path_buf();
        tokio::task::spawn_blocking(move || {
            PredictionService::predict_one(&service, &name, &model_dir, &image)
        })
        .await
        .map_err(join_error)?
    }

    async fn predict_many(
        &self,
        names: &[String],
        model_dir: &Path,
        image: ImageSource,
    ) -> Result<Vec<Prediction>, DomainError> {
        let service = self.clone();
        let names = names.to_vec();
        let model_dir = model_dir.to_path_buf();
        tokio::task::spawn_blocking(move || {
            PredictionService::predict_many(&service, &names, &model_dir, &image)
        })
        .await
        .map_err(join_error)?
    }
}
