use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{
        health_check,
        logs::{create_log, delete_log, get_all_logs, get_log_by_id, update_log},
        not_found,
        recipes::{create_recipe, delete_recipe, get_all_recipes, get_recipe_by_id, update_recipe},
        AppState,
    },
    middleware::create_middleware_stack,
};

/// Versioned API routes
fn api_v1() -> Router<AppState> {
    Router::new()
        // Recipe endpoints
        .route("/recipes", post(create_recipe).get(get_all_recipes).fallback(not_found))
        .route(
            "/recipes/:id",
            get(get_recipe_by_id)
                .put(update_recipe)
                .delete(delete_recipe)
                .fallback(not_found),
        )
        // Log endpoints
        .route("/logs", post(create_log).get(get_all_logs).fallback(not_found))
        .route(
            "/logs/:id",
            get(get_log_by_id).put(update_log).delete(delete_log).fallback(not_found),
        )
}

/// Create the Axum router with all endpoints and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1())
        .fallback(not_found)
        .with_state(state)
        .layer(create_middleware_stack())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = Arc::new(MemoryStore::default());
        create_router(AppState {
            recipes: store.clone(),
            logs: store,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, value)
    }

    fn cookies() -> Value {
        json!({
            "name": "cookies",
            "directions": [
                "preheat oven to 375",
                "mix ingredients",
                "put dough on cookie sheet",
                "bake for 10 minutes"
            ],
            "ingredients": [
                { "amount": 2.0, "measurement": "cups", "name": "flour" },
                { "amount": 1.0, "measurement": "bag", "name": "chocolate chips" },
                { "amount": 1.0, "measurement": "egg", "name": "egg" }
            ]
        })
    }

    /// The submitted body plus the generated id
    fn with_id(mut body: Value, id: &Value) -> Value {
        body["id"] = id.clone();
        body
    }

    async fn create_recipe_for(app: &Router) -> Value {
        let (status, recipe) = send(app, "POST", "/api/v1/recipes", Some(cookies())).await;
        assert_eq!(status, StatusCode::CREATED);
        recipe
    }

    fn pretty_good(recipe_id: &Value) -> Value {
        json!({
            "recipeId": recipe_id,
            "dateOfEvent": "2020-12-04",
            "notes": "pretty good",
            "rating": 4
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".to_string()));
    }

    #[tokio::test]
    async fn test_creates_a_recipe() {
        let app = app();
        let recipe = create_recipe_for(&app).await;

        assert!(recipe["id"].is_string());
        assert_eq!(recipe, with_id(cookies(), &recipe["id"]));
    }

    #[tokio::test]
    async fn test_gets_all_recipes() {
        let app = app();
        let mut created = Vec::new();
        for name in ["cookies", "cake", "pie"] {
            let (_, recipe) = send(&app, "POST", "/api/v1/recipes", Some(json!({ "name": name, "directions": [] }))).await;
            created.push(recipe);
        }

        let (status, body) = send(&app, "GET", "/api/v1/recipes", None).await;
        assert_eq!(status, StatusCode::OK);

        let all = body.as_array().unwrap();
        for recipe in created {
            assert_eq!(recipe["ingredients"], json!([]));
            assert!(all.contains(&recipe));
        }
    }

    #[tokio::test]
    async fn test_gets_recipe_by_id() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let id = recipe["id"].as_str().unwrap();

        let (status, body) = send(&app, "GET", &format!("/api/v1/recipes/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, with_id(cookies(), &recipe["id"]));
    }

    #[tokio::test]
    async fn test_updates_a_recipe() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let id = recipe["id"].as_str().unwrap();

        let changes = json!({
            "name": "brownies",
            "ingredients": [{ "amount": 1.0, "measurement": "box", "name": "brownie mix" }]
        });
        let (status, body) = send(&app, "PUT", &format!("/api/v1/recipes/{}", id), Some(changes)).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["id"], recipe["id"]);
        assert_eq!(body["name"], "brownies");
        assert_eq!(body["directions"], cookies()["directions"]);
        assert_eq!(body["ingredients"], json!([{ "amount": 1.0, "measurement": "box", "name": "brownie mix" }]));
    }

    #[tokio::test]
    async fn test_deletes_a_recipe() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let uri = format!("/api/v1/recipes/{}", recipe["id"].as_str().unwrap());

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, with_id(cookies(), &recipe["id"]));

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_creates_a_log() {
        let app = app();
        let recipe = create_recipe_for(&app).await;

        let (status, log) = send(&app, "POST", "/api/v1/logs", Some(pretty_good(&recipe["id"]))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(log["id"].is_string());
        assert_eq!(log, with_id(pretty_good(&recipe["id"]), &log["id"]));
    }

    #[tokio::test]
    async fn test_numeric_recipe_id_is_accepted() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let recipe_id: i64 = recipe["id"].as_str().unwrap().parse().unwrap();

        let (status, log) = send(&app, "POST", "/api/v1/logs", Some(pretty_good(&json!(recipe_id)))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(log["recipeId"], recipe["id"]);
    }

    #[tokio::test]
    async fn test_gets_all_logs() {
        let app = app();
        let recipe = create_recipe_for(&app).await;

        let mut created = Vec::new();
        for (notes, rating) in [("pretty good", 4), ("alright", 3), ("could be better", 2)] {
            let body = json!({
                "recipeId": recipe["id"],
                "dateOfEvent": "2020-12-04",
                "notes": notes,
                "rating": rating
            });
            let (_, log) = send(&app, "POST", "/api/v1/logs", Some(body)).await;
            created.push(log);
        }

        let (status, body) = send(&app, "GET", "/api/v1/logs", None).await;
        assert_eq!(status, StatusCode::OK);
        let all = body.as_array().unwrap();
        for log in created {
            assert!(all.contains(&log));
        }
    }

    #[tokio::test]
    async fn test_gets_log_by_id() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let (_, log) = send(&app, "POST", "/api/v1/logs", Some(pretty_good(&recipe["id"]))).await;

        let uri = format!("/api/v1/logs/{}", log["id"].as_str().unwrap());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, log);
    }

    #[tokio::test]
    async fn test_updates_a_log() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let (_, log) = send(&app, "POST", "/api/v1/logs", Some(pretty_good(&recipe["id"]))).await;

        // Whole-object PUT, id in the body is ignored
        let mut replacement = log.clone();
        replacement["id"] = json!("9999");
        replacement["notes"] = json!("extremely good");
        replacement["rating"] = json!(5);

        let uri = format!("/api/v1/logs/{}", log["id"].as_str().unwrap());
        let (status, body) = send(&app, "PUT", &uri, Some(replacement)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": log["id"],
                "recipeId": recipe["id"],
                "dateOfEvent": "2020-12-04",
                "notes": "extremely good",
                "rating": 5
            })
        );
    }

    #[tokio::test]
    async fn test_deletes_a_log() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let (_, log) = send(&app, "POST", "/api/v1/logs", Some(pretty_good(&recipe["id"]))).await;

        let uri = format!("/api/v1/logs/{}", log["id"].as_str().unwrap());
        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, log);

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_ids_are_404_for_every_operation() {
        let app = app();
        let update_recipe = json!({ "name": "ghost" });
        let update_log = json!({ "rating": 1 });

        for resource in ["recipes", "logs"] {
            for id in ["424242", "not-a-number"] {
                let uri = format!("/api/v1/{}/{}", resource, id);
                let body = if resource == "recipes" { &update_recipe } else { &update_log };

                for (method, payload) in [("GET", None), ("PUT", Some(body.clone())), ("DELETE", None)] {
                    let (status, response) = send(&app, method, &uri, payload).await;
                    assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
                    assert_eq!(response["status"], 404);
                    assert!(response["message"].as_str().unwrap().contains("not found"));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_unmatched_route_falls_back_to_404() {
        let (status, body) = send(&app(), "GET", "/api/v2/recipes", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": 404, "message": "Not Found" }));
    }

    #[tokio::test]
    async fn test_unsupported_method_falls_back_to_404() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        let uri = format!("/api/v1/recipes/{}", recipe["id"].as_str().unwrap());

        for (method, uri) in [
            ("PATCH", uri.as_str()),
            ("POST", uri.as_str()),
            ("DELETE", "/api/v1/recipes"),
            ("PATCH", "/api/v1/logs/1"),
            ("PUT", "/api/v1/logs"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
            assert_eq!(body, json!({ "status": 404, "message": "Not Found" }));
        }
    }

    #[tokio::test]
    async fn test_log_for_unknown_recipe_is_400() {
        let (status, body) = send(&app(), "POST", "/api/v1/logs", Some(pretty_good(&json!("77")))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_deleting_a_logged_recipe_is_409() {
        let app = app();
        let recipe = create_recipe_for(&app).await;
        send(&app, "POST", "/api/v1/logs", Some(pretty_good(&recipe["id"]))).await;

        let uri = format!("/api/v1/recipes/{}", recipe["id"].as_str().unwrap());
        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let app = app();

        // Missing required name
        let (status, body) = send(&app, "POST", "/api/v1/recipes", Some(json!({ "directions": [] }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
        assert!(body["message"].is_string());

        // Not JSON at all
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/logs")
            .header("content-type", "application/json")
            .body(Body::from("{"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
