// Library root for the recipe-lab API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;

// Re-export commonly used types
pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
pub use models::{Ingredient, Log, Recipe};
pub use routes::create_router;
