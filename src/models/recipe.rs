use serde::{Deserialize, Serialize};

/// A dish with ordered preparation steps and an ordered ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub directions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub amount: f64,
    pub measurement: String,
    pub name: String,
}

/// Request structure for creating a new recipe
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// Request structure for updating a recipe.
/// Absent fields keep their stored value; a present `ingredients` list replaces the old one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub directions: Option<Vec<String>>,
    pub ingredients: Option<Vec<Ingredient>>,
}

impl Recipe {
    pub fn from_request(id: String, request: CreateRecipeRequest) -> Self {
        Recipe {
            id,
            name: request.name,
            directions: request.directions,
            ingredients: request.ingredients,
        }
    }

    /// Apply the supplied fields, replacing the ingredient list wholesale
    #[cfg(test)]
    pub(crate) fn apply(&mut self, request: UpdateRecipeRequest) {
        if let Some(name) = request.name {
            self.name = name;
        }

        if let Some(directions) = request.directions {
            self.directions = directions;
        }

        if let Some(ingredients) = request.ingredients {
            self.ingredients = ingredients;
        }
    }
}

/// Split an ingredient list into the parallel columns bound to `UNNEST`.
pub(crate) fn ingredient_columns(ingredients: &[Ingredient]) -> (Vec<f64>, Vec<String>, Vec<String>) {
    let amounts = ingredients.iter().map(|i| i.amount).collect();
    let measurements = ingredients.iter().map(|i| i.measurement.clone()).collect();
    let names = ingredients.iter().map(|i| i.name.clone()).collect();
    (amounts, measurements, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour() -> Ingredient {
        Ingredient {
            amount: 2.0,
            measurement: "cups".to_string(),
            name: "flour".to_string(),
        }
    }

    #[test]
    fn test_create_request_defaults_missing_lists() {
        let request: CreateRecipeRequest =
            serde_json::from_str(r#"{"name":"pie"}"#).expect("Failed to deserialize request");

        assert_eq!(request.name, "pie");
        assert!(request.directions.is_empty());
        assert!(request.ingredients.is_empty());
    }

    #[test]
    fn test_create_request_keeps_order() {
        let json = r#"{
            "name": "cookies",
            "directions": ["preheat oven to 375", "mix ingredients", "bake for 10 minutes"],
            "ingredients": [
                {"amount": 2, "measurement": "cups", "name": "flour"},
                {"amount": 1, "measurement": "bag", "name": "chocolate chips"}
            ]
        }"#;
        let request: CreateRecipeRequest = serde_json::from_str(json).expect("Failed to deserialize request");

        assert_eq!(request.directions[0], "preheat oven to 375");
        assert_eq!(request.directions[2], "bake for 10 minutes");
        assert_eq!(request.ingredients[0], flour());
        assert_eq!(request.ingredients[1].name, "chocolate chips");
    }

    #[test]
    fn test_create_request_requires_name() {
        let result = serde_json::from_str::<CreateRecipeRequest>(r#"{"directions":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_recipe_serialization_shape() {
        let recipe = Recipe {
            id: "1".to_string(),
            name: "cookies".to_string(),
            directions: vec!["mix".to_string()],
            ingredients: vec![flour()],
        };

        let value = serde_json::to_value(&recipe).expect("Failed to serialize recipe");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "1",
                "name": "cookies",
                "directions": ["mix"],
                "ingredients": [{"amount": 2.0, "measurement": "cups", "name": "flour"}]
            })
        );
    }

    #[test]
    fn test_apply_changes_only_supplied_fields() {
        let mut recipe = Recipe {
            id: "7".to_string(),
            name: "cookies".to_string(),
            directions: vec!["mix".to_string(), "bake".to_string()],
            ingredients: vec![flour()],
        };

        recipe.apply(UpdateRecipeRequest {
            name: Some("brownies".to_string()),
            ..Default::default()
        });

        assert_eq!(recipe.id, "7");
        assert_eq!(recipe.name, "brownies");
        assert_eq!(recipe.directions, vec!["mix", "bake"]);
        assert_eq!(recipe.ingredients, vec![flour()]);
    }

    #[test]
    fn test_apply_replaces_ingredients_wholesale() {
        let mut recipe = Recipe {
            id: "7".to_string(),
            name: "cookies".to_string(),
            directions: vec![],
            ingredients: vec![flour()],
        };

        recipe.apply(UpdateRecipeRequest {
            ingredients: Some(vec![]),
            ..Default::default()
        });

        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_ingredient_columns_are_parallel() {
        let ingredients = vec![
            flour(),
            Ingredient {
                amount: 1.0,
                measurement: "egg".to_string(),
                name: "egg".to_string(),
            },
        ];

        let (amounts, measurements, names) = ingredient_columns(&ingredients);
        assert_eq!(amounts, vec![2.0, 1.0]);
        assert_eq!(measurements, vec!["cups", "egg"]);
        assert_eq!(names, vec!["flour", "egg"]);
    }
}
