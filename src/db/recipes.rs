use async_trait::async_trait;
use postgres_types::Json;
use tokio_postgres::{error::SqlState, Row};
use tracing::info;

use super::{parse_id, Database};
use crate::{
    error::{ApiError, ApiResult},
    models::{recipe::ingredient_columns, CreateRecipeRequest, Ingredient, Recipe, UpdateRecipeRequest},
    repository::{recipe_not_found, RecipeRepository},
};

// Ordered ingredient list of the recipe row aliased `r`, as a JSON array.
// In a statement that also modifies `ingredients`, this sees the rows as they were before it.
const INGREDIENTS_OF_R: &str = r#"
    COALESCE((
        SELECT json_agg(
            json_build_object('amount', i.amount, 'measurement', i.measurement, 'name', i.name)
            ORDER BY i.position
        )
        FROM ingredients i
        WHERE i.recipe_id = r.id
    ), '[]'::json)
"#;

fn recipe_from_row(row: &Row) -> Recipe {
    let id: i64 = row.get(0);
    let Json(ingredients): Json<Vec<Ingredient>> = row.get(3);
    Recipe {
        id: id.to_string(),
        name: row.get(1),
        directions: row.get(2),
        ingredients,
    }
}

#[async_trait]
impl RecipeRepository for Database {
    /// The recipe row and its ingredient rows go in with one statement, so a
    /// failure leaves neither behind.
    async fn insert(&self, request: CreateRecipeRequest) -> ApiResult<Recipe> {
        let client = self.get_connection().await?;
        let (amounts, measurements, names) = ingredient_columns(&request.ingredients);

        let query = r#"
            WITH r AS (
                INSERT INTO recipes (name, directions)
                VALUES ($1, $2)
                RETURNING id
            ), added AS (
                INSERT INTO ingredients (recipe_id, position, amount, measurement, name)
                SELECT r.id, t.position, t.amount, t.measurement, t.name
                FROM r, UNNEST($3::float8[], $4::text[], $5::text[])
                    WITH ORDINALITY AS t(amount, measurement, name, position)
            )
            SELECT id FROM r
        "#;

        let row = client
            .query_one(query, &[&request.name, &request.directions, &amounts, &measurements, &names])
            .await?;

        let id: i64 = row.get(0);
        info!("Created recipe with id: {} ({} ingredients)", id, request.ingredients.len());
        Ok(Recipe::from_request(id.to_string(), request))
    }

    async fn find(&self) -> ApiResult<Vec<Recipe>> {
        let client = self.get_connection().await?;
        let query = format!(
            "SELECT r.id, r.name, r.directions, {} FROM recipes r ORDER BY r.id",
            INGREDIENTS_OF_R
        );

        let rows = client.query(query.as_str(), &[]).await?;

        Ok(rows.iter().map(recipe_from_row).collect())
    }

    async fn find_by_id(&self, id: &str) -> ApiResult<Recipe> {
        let key = parse_id(id, recipe_not_found)?;
        let client = self.get_connection().await?;
        let query = format!(
            "SELECT r.id, r.name, r.directions, {} FROM recipes r WHERE r.id = $1",
            INGREDIENTS_OF_R
        );

        let row = client.query_opt(query.as_str(), &[&key]).await?;

        row.as_ref().map(recipe_from_row).ok_or_else(|| recipe_not_found(id))
    }

    /// Name and directions fall back to the stored value when absent. A supplied
    /// ingredient list replaces the stored one: old rows deleted, new rows inserted.
    async fn update(&self, id: &str, request: UpdateRecipeRequest) -> ApiResult<Recipe> {
        let key = parse_id(id, recipe_not_found)?;
        let client = self.get_connection().await?;

        let replace_ingredients = request.ingredients.is_some();
        let (amounts, measurements, names) = ingredient_columns(request.ingredients.as_deref().unwrap_or_default());

        let query = format!(
            r#"
            WITH r AS (
                UPDATE recipes
                SET name = COALESCE($2, name), directions = COALESCE($3, directions)
                WHERE id = $1
                RETURNING id, name, directions
            ), removed AS (
                DELETE FROM ingredients
                WHERE $4 AND recipe_id IN (SELECT id FROM r)
            ), added AS (
                INSERT INTO ingredients (recipe_id, position, amount, measurement, name)
                SELECT r.id, t.position, t.amount, t.measurement, t.name
                FROM r, UNNEST($5::float8[], $6::text[], $7::text[])
                    WITH ORDINALITY AS t(amount, measurement, name, position)
                WHERE $4
            )
            SELECT r.id, r.name, r.directions, {} FROM r
            "#,
            INGREDIENTS_OF_R
        );

        let row = client
            .query_opt(
                query.as_str(),
                &[
                    &key,
                    &request.name,
                    &request.directions,
                    &replace_ingredients,
                    &amounts,
                    &measurements,
                    &names,
                ],
            )
            .await?;

        let mut recipe = row.as_ref().map(recipe_from_row).ok_or_else(|| recipe_not_found(id))?;

        // The aggregate above still reads the pre-update ingredient rows
        if let Some(ingredients) = request.ingredients {
            recipe.ingredients = ingredients;
        }

        info!("Updated recipe with id: {}", recipe.id);
        Ok(recipe)
    }

    async fn delete(&self, id: &str) -> ApiResult<Recipe> {
        let key = parse_id(id, recipe_not_found)?;
        let client = self.get_connection().await?;

        // Ingredients cascade at end of statement, so the aggregate still sees them
        let query = format!(
            r#"
            WITH r AS (
                DELETE FROM recipes WHERE id = $1
                RETURNING id, name, directions
            )
            SELECT r.id, r.name, r.directions, {} FROM r
            "#,
            INGREDIENTS_OF_R
        );

        // The only key a recipe delete can break is a log still pointing at it
        let row = client.query_opt(query.as_str(), &[&key]).await.map_err(|err| {
            if err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
                ApiError::conflict("Recipe is still referenced by logs")
            } else {
                ApiError::from(err)
            }
        })?;

        let recipe = row.as_ref().map(recipe_from_row).ok_or_else(|| recipe_not_found(id))?;

        info!("Deleted recipe with id: {}", recipe.id);
        Ok(recipe)
    }
}
