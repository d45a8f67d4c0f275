//! Catalog listing endpoint handler

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ModelsResponse};

/// GET /v1/models
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    debug!("Listing catalog models");

    let build = state
        .catalog_service
        .scan(&state.settings.model_dir)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ModelsResponse::from_build(&build)))
}
