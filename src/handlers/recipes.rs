// Recipe handlers
// HTTP handlers for recipe management operations

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
    models::{CreateRecipeRequest, UpdateRecipeRequest},
};

/// Create a new recipe
/// POST /api/v1/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("Creating new recipe: {}", request.name);

    let recipe = state.recipes.insert(request).await?;

    info!("Successfully created recipe with id: {}", recipe.id);
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Get all recipes
/// GET /api/v1/recipes
pub async fn get_all_recipes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all recipes");

    let recipes = state.recipes.find().await?;

    info!("Retrieved {} recipes", recipes.len());
    Ok((StatusCode::OK, Json(recipes)))
}

/// Get recipe by ID
/// GET /api/v1/recipes/:id
pub async fn get_recipe_by_id(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching recipe with id: {}", recipe_id);

    let recipe = state.recipes.find_by_id(&recipe_id).await?;

    Ok((StatusCode::OK, Json(recipe)))
}

/// Update recipe by ID
/// PUT /api/v1/recipes/:id
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("Updating recipe with id: {}", recipe_id);

    let recipe = state.recipes.update(&recipe_id, request).await?;

    info!("Successfully updated recipe with id: {}", recipe_id);
    Ok((StatusCode::OK, Json(recipe)))
}

/// Delete recipe by ID, answering with the deleted recipe
/// DELETE /api/v1/recipes/:id
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting recipe with id: {}", recipe_id);

    let recipe = state.recipes.delete(&recipe_id).await?;

    info!("Successfully deleted recipe with id: {} (cascade deleted its ingredients)", recipe_id);
    Ok((StatusCode::OK, Json(recipe)))
}
