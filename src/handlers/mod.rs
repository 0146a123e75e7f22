// Handlers module
// HTTP handlers for the REST API

pub mod logs;
pub mod recipes;

use axum::{http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::{
    db::Database,
    error::ApiError,
    repository::{LogRepository, RecipeRepository},
};

/// Shared handler state: one repository per resource.
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeRepository>,
    pub logs: Arc<dyn LogRepository>,
}

impl AppState {
    /// Both resources served from the same PostgreSQL pool
    pub fn from_database(database: Arc<Database>) -> Self {
        AppState {
            recipes: database.clone(),
            logs: database,
        }
    }
}

/// Health check handler
/// Returns "OK" with 200 status for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback for routes that match nothing
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
