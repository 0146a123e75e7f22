// Models module

pub mod log;
pub mod recipe;

// Re-export commonly used types
pub use log::{CreateLogRequest, Log, UpdateLogRequest};
pub use recipe::{CreateRecipeRequest, Ingredient, Recipe, UpdateRecipeRequest};
