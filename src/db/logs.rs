use async_trait::async_trait;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracing::info;

use super::{parse_id, Database};
use crate::{
    error::{ApiError, ApiResult},
    models::{CreateLogRequest, Log, UpdateLogRequest},
    repository::{log_not_found, LogRepository},
};

const LOG_COLUMNS: &str = "id, recipe_id, date_of_event, notes, rating";

fn log_from_row(row: &Row) -> Log {
    let id: i64 = row.get(0);
    let recipe_id: i64 = row.get(1);
    Log {
        id: id.to_string(),
        recipe_id: recipe_id.to_string(),
        date_of_event: row.get(2),
        notes: row.get(3),
        rating: row.get(4),
    }
}

/// A `recipeId` that is not a BIGINT cannot reference any recipe.
fn parse_recipe_id(recipe_id: &str) -> ApiResult<i64> {
    recipe_id
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation("Referenced recipe does not exist"))
}

#[async_trait]
impl LogRepository for Database {
    async fn insert(&self, request: CreateLogRequest) -> ApiResult<Log> {
        let recipe_id = parse_recipe_id(&request.recipe_id)?;
        let client = self.get_connection().await?;

        let query = format!(
            "INSERT INTO logs (recipe_id, date_of_event, notes, rating) VALUES ($1, $2, $3, $4) RETURNING {}",
            LOG_COLUMNS
        );

        let row = client
            .query_one(
                query.as_str(),
                &[&recipe_id, &request.date_of_event, &request.notes, &request.rating],
            )
            .await?;

        let log = log_from_row(&row);
        info!("Created log with id: {} for recipe: {}", log.id, log.recipe_id);
        Ok(log)
    }

    async fn find(&self) -> ApiResult<Vec<Log>> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM logs ORDER BY id", LOG_COLUMNS);

        let rows = client.query(query.as_str(), &[]).await?;

        Ok(rows.iter().map(log_from_row).collect())
    }

    async fn find_by_id(&self, id: &str) -> ApiResult<Log> {
        let key = parse_id(id, log_not_found)?;
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM logs WHERE id = $1", LOG_COLUMNS);

        let row = client.query_opt(query.as_str(), &[&key]).await?;

        row.as_ref().map(log_from_row).ok_or_else(|| log_not_found(id))
    }

    /// Builds the SET clause from the fields present in the request, numbering
    /// placeholders in the same order the parameters are pushed.
    async fn update(&self, id: &str, request: UpdateLogRequest) -> ApiResult<Log> {
        if request.is_empty() {
            return LogRepository::find_by_id(self, id).await;
        }

        let key = parse_id(id, log_not_found)?;
        let recipe_id = request.recipe_id.as_deref().map(parse_recipe_id).transpose()?;

        let mut query_parts = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(ref recipe_id) = recipe_id {
            params.push(recipe_id);
            query_parts.push(format!("recipe_id = ${}", params.len()));
        }

        if let Some(ref date_of_event) = request.date_of_event {
            params.push(date_of_event);
            query_parts.push(format!("date_of_event = ${}", params.len()));
        }

        if let Some(ref notes) = request.notes {
            params.push(notes);
            query_parts.push(format!("notes = ${}", params.len()));
        }

        if let Some(ref rating) = request.rating {
            params.push(rating);
            query_parts.push(format!("rating = ${}", params.len()));
        }

        params.push(&key);
        let query = format!(
            "UPDATE logs SET {} WHERE id = ${} RETURNING {}",
            query_parts.join(", "),
            params.len(),
            LOG_COLUMNS
        );

        let client = self.get_connection().await?;
        let row = client.query_opt(query.as_str(), &params).await?;

        let log = row.as_ref().map(log_from_row).ok_or_else(|| log_not_found(id))?;

        info!("Updated log with id: {}", log.id);
        Ok(log)
    }

    async fn delete(&self, id: &str) -> ApiResult<Log> {
        let key = parse_id(id, log_not_found)?;
        let client = self.get_connection().await?;
        let query = format!("DELETE FROM logs WHERE id = $1 RETURNING {}", LOG_COLUMNS);

        let row = client.query_opt(query.as_str(), &[&key]).await?;

        let log = row.as_ref().map(log_from_row).ok_or_else(|| log_not_found(id))?;

        info!("Deleted log with id: {}", log.id);
        Ok(log)
    }
}
