//! Query image listing endpoint handler

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, QueryImagesResponse};

/// GET /v1/query-images
pub async fn list_query_images(
    State(state): State<AppState>,
) -> Result<Json<QueryImagesResponse>, ApiError> {
    debug!("Listing query images");

    let entries = state
        .query_image_service
        .list(&state.settings.query_image_dir)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(QueryImagesResponse::new(&entries)))
}
