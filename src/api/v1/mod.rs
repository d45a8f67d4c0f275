//! v1 API endpoints

pub mod models;
pub mod predictions;
pub mod query_images;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/models", get(models::list_models))
        .route("/query-images", get(query_images::list_query_images))
        .route("/predictions", post(predictions::create_prediction))
        .route(
            "/predictions/compare",
            post(predictions::compare_predictions),
        )
        .route(
            "/predictions/upload",
            post(predictions::create_prediction_from_upload),
        )
        .route(
            "/predictions/compare/upload",
            post(predictions::compare_predictions_from_upload),
        )
}
