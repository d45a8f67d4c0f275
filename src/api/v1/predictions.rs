//! Prediction endpoint handlers

use axum::extract::{Multipart, State};
use bytes::Bytes;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CompareRequest, CompareResponse, Json, PredictRequest, PredictionResponse,
};
use crate::domain::{validate_model_selector, ImageSource, Prediction};

/// Uploads are always persisted under this name, replacing the previous one
const UPLOAD_FILE_NAME: &str = "temp.jpg";

/// POST /v1/predictions
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    validate_model_selector(&request.model)?;

    info!(
        model = %request.model,
        image = %request.image,
        "Processing prediction request"
    );

    let image = ImageSource::from_path(&request.image);
    let prediction = state
        .prediction_service
        .predict_one(&request.model, &state.settings.model_dir, image)
        .await?;

    Ok(Json(PredictionResponse::from_prediction(
        &prediction,
        &request.image,
        &state.settings.labels,
    )))
}

/// POST /v1/predictions/compare
pub async fn compare_predictions(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    validate_selectors(&request.models)?;

    info!(
        models = request.models.len(),
        image = %request.image,
        "Processing comparison request"
    );

    let image = ImageSource::from_path(&request.image);
    let predictions = state
        .prediction_service
        .predict_many(&request.models, &state.settings.model_dir, image)
        .await?;

    Ok(Json(build_comparison(
        request.image,
        &predictions,
        &state.settings.labels,
    )))
}

/// POST /v1/predictions/upload
pub async fn create_prediction_from_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PredictionResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let model = form.single_model()?;
    validate_model_selector(&model)?;

    let saved_path = save_upload(&state, &form.file).await?;
    info!(
        model = %model,
        bytes = form.file.len(),
        "Processing upload prediction"
    );

    let image = ImageSource::from_bytes(UPLOAD_FILE_NAME, form.file.clone());
    let prediction = state
        .prediction_service
        .predict_one(&model, &state.settings.model_dir, image)
        .await?;

    Ok(Json(PredictionResponse::from_prediction(
        &prediction,
        &saved_path,
        &state.settings.labels,
    )))
}

/// POST /v1/predictions/compare/upload
pub async fn compare_predictions_from_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CompareResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;
    validate_selectors(&form.models)?;

    let saved_path = save_upload(&state, &form.file).await?;
    info!(
        models = form.models.len(),
        bytes = form.file.len(),
        "Processing upload comparison"
    );

    let image = ImageSource::from_bytes(UPLOAD_FILE_NAME, form.file.clone());
    let predictions = state
        .prediction_service
        .predict_many(&form.models, &state.settings.model_dir, image)
        .await?;

    Ok(Json(build_comparison(
        saved_path,
        &predictions,
        &state.settings.labels,
    )))
}

/// Fields accepted by the upload endpoints
struct UploadForm {
    models: Vec<String>,
    file: Bytes,
}

impl UploadForm {
    /// The single `model` field; repeats are rejected
    fn single_model(&self) -> Result<String, ApiError> {
        match self.models.as_slice() {
            [model] => Ok(model.clone()),
            [] => Err(ApiError::bad_request("Missing 'model' field").with_param("model")),
            _ => Err(
                ApiError::bad_request("Expected exactly one 'model' field").with_param("model"),
            ),
        }
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut models = Vec::new();
    let mut file: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name().map(str::to_owned).as_deref() {
            Some("model") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable 'model' field: {e}")))?;
                models.push(value);
            }
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable 'file' field: {e}")))?;
                file = Some(bytes);
            }
            // unknown fields are ignored
            _ => {}
        }
    }

    let file =
        file.ok_or_else(|| ApiError::bad_request("Missing 'file' field").with_param("file"))?;

    Ok(UploadForm { models, file })
}

/// Persist the upload under its fixed name inside the upload directory
async fn save_upload(state: &AppState, bytes: &Bytes) -> Result<String, ApiError> {
    let dir = &state.settings.upload_dir;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot create upload directory: {e}")))?;

    let path = dir.join(UPLOAD_FILE_NAME);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| {
            ApiError::internal(format!("Cannot save upload to {}: {e}", path.display()))
        })?;

    Ok(path.display().to_string())
}

fn validate_selectors(models: &[String]) -> Result<(), ApiError> {
    if models.is_empty() {
        return Err(ApiError::bad_request("At least one model is required").with_param("models"));
    }
    for model in models {
        validate_model_selector(model)?;
    }
    Ok(())
}

fn build_comparison(
    image: String,
    predictions: &[Prediction],
    labels: &[String],
) -> CompareResponse {
    let responses = predictions
        .iter()
        .map(|prediction| PredictionResponse::from_prediction(prediction, &image, labels))
        .collect();

    CompareResponse {
        image,
        predictions: responses,
    }
}
