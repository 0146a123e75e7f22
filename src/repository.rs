// Repository traits
// Data-access seams between the HTTP handlers and the datastore

use async_trait::async_trait;

use crate::{
    error::ApiResult,
    models::{CreateLogRequest, CreateRecipeRequest, Log, Recipe, UpdateLogRequest, UpdateRecipeRequest},
};

/// Recipe persistence, including the owned ingredient list.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn insert(&self, request: CreateRecipeRequest) -> ApiResult<Recipe>;

    async fn find(&self) -> ApiResult<Vec<Recipe>>;

    async fn find_by_id(&self, id: &str) -> ApiResult<Recipe>;

    /// Fails with `NotFound` when no recipe has this id
    async fn update(&self, id: &str, request: UpdateRecipeRequest) -> ApiResult<Recipe>;

    /// Returns the recipe as it was before deletion
    async fn delete(&self, id: &str) -> ApiResult<Recipe>;
}

#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn insert(&self, request: CreateLogRequest) -> ApiResult<Log>;

    async fn find(&self) -> ApiResult<Vec<Log>>;

    async fn find_by_id(&self, id: &str) -> ApiResult<Log>;

    async fn update(&self, id: &str, request: UpdateLogRequest) -> ApiResult<Log>;

    async fn delete(&self, id: &str) -> ApiResult<Log>;
}

pub(crate) fn recipe_not_found(id: &str) -> crate::error::ApiError {
    crate::error::ApiError::not_found(format!("Recipe with id {} not found", id))
}

pub(crate) fn log_not_found(id: &str) -> crate::error::ApiError {
    crate::error::ApiError::not_found(format!("Log with id {} not found", id))
}
