use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A dated record of having cooked a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: String,
    pub recipe_id: String,
    pub date_of_event: NaiveDate,
    pub notes: String,
    pub rating: i32,
}

/// Request structure for creating a new log
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    #[serde(deserialize_with = "recipe_ref")]
    pub recipe_id: String,
    pub date_of_event: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub rating: i32,
}

/// Request structure for updating a log; only supplied fields change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogRequest {
    #[serde(default, deserialize_with = "optional_recipe_ref")]
    pub recipe_id: Option<String>,
    pub date_of_event: Option<NaiveDate>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
}

/// Ids go out as strings, but clients may send a reference back as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeRef {
    Text(String),
    Number(i64),
}

impl From<RecipeRef> for String {
    fn from(reference: RecipeRef) -> Self {
        match reference {
            RecipeRef::Text(id) => id,
            RecipeRef::Number(id) => id.to_string(),
        }
    }
}

fn recipe_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RecipeRef::deserialize(deserializer).map(String::from)
}

fn optional_recipe_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<RecipeRef>::deserialize(deserializer).map(|reference| reference.map(String::from))
}

#[cfg(test)]
impl Log {
    pub(crate) fn from_request(id: String, request: CreateLogRequest) -> Self {
        Log {
            id,
            recipe_id: request.recipe_id,
            date_of_event: request.date_of_event,
            notes: request.notes,
            rating: request.rating,
        }
    }

    pub(crate) fn apply(&mut self, request: UpdateLogRequest) {
        if let Some(recipe_id) = request.recipe_id {
            self.recipe_id = recipe_id;
        }

        if let Some(date_of_event) = request.date_of_event {
            self.date_of_event = date_of_event;
        }

        if let Some(notes) = request.notes {
            self.notes = notes;
        }

        if let Some(rating) = request.rating {
            self.rating = rating;
        }
    }
}

impl UpdateLogRequest {
    pub fn is_empty(&self) -> bool {
        self.recipe_id.is_none()
            && self.date_of_event.is_none()
            && self.notes.is_none()
            && self.rating.is_none()
    }
}
