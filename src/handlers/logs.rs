// Log handlers
// HTTP handlers for cooking log operations

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use super::AppState;
use crate::{
    error::ApiError,
    models::{CreateLogRequest, UpdateLogRequest},
};

/// Create a new log
/// POST /api/v1/logs
pub async fn create_log(
    State(state): State<AppState>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("Creating new log for recipe_id: {} on {}", request.recipe_id, request.date_of_event);

    let log = state.logs.insert(request).await?;

    info!("Successfully created log with id: {}", log.id);
    Ok((StatusCode::CREATED, Json(log)))
}

/// Get all logs
/// GET /api/v1/logs
pub async fn get_all_logs(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all logs");

    let logs = state.logs.find().await?;

    info!("Retrieved {} logs", logs.len());
    Ok((StatusCode::OK, Json(logs)))
}

/// Get log by ID
/// GET /api/v1/logs/:id
pub async fn get_log_by_id(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching log with id: {}", log_id);

    let log = state.logs.find_by_id(&log_id).await?;

    Ok((StatusCode::OK, Json(log)))
}

/// Update log by ID
/// PUT /api/v1/logs/:id
pub async fn update_log(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
    payload: Result<Json<UpdateLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("Updating log with id: {}", log_id);

    let log = state.logs.update(&log_id, request).await?;

    info!("Successfully updated log with id: {}", log_id);
    Ok((StatusCode::OK, Json(log)))
}

/// Delete log by ID
/// DELETE /api/v1/logs/:id
pub async fn delete_log(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting log with id: {}", log_id);

    let log = state.logs.delete(&log_id).await?;

    info!("Successfully deleted log with id: {}", log_id);
    Ok((StatusCode::OK, Json(log)))
}
