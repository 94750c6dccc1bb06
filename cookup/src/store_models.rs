//! Records exchanged with the external recipe store (`/api/v1/recipes/`).
//!
//! The store keeps a flatter shape than the generator produces: one
//! instructions string, times in whole minutes, lowercase difficulty.

use crate::basic_models::{Difficulty, Recipe};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreDifficulty {
    Easy,
    Medium,
    Hard,
}

impl From<Difficulty> for StoreDifficulty {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => StoreDifficulty::Easy,
            Difficulty::Medium => StoreDifficulty::Medium,
            Difficulty::Hard => StoreDifficulty::Hard,
        }
    }
}

/// A recipe as the store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecipe {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<StoreDifficulty>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// What `POST /recipes/` answers with. The typed store returns the record
/// itself; the in-memory store wraps it with a status message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CreatedRecipe {
    Wrapped { recipe: StoredRecipe },
    Bare(StoredRecipe),
}

impl CreatedRecipe {
    pub fn into_recipe(self) -> StoredRecipe {
        match self {
            CreatedRecipe::Wrapped { recipe } | CreatedRecipe::Bare(recipe) => recipe,
        }
    }
}

/// Body for creating a recipe in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStoredRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Option<StoreDifficulty>,
    pub cuisine: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Recipe> for NewStoredRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.name.clone(),
            description: Some(String::new()),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.join("\n"),
            prep_time: parse_time_minutes(&recipe.prep_time),
            cook_time: parse_time_minutes(&recipe.cook_time),
            servings: Some(recipe.servings),
            difficulty: Some(recipe.difficulty.into()),
            cuisine: Some(String::new()),
            tags: vec![],
        }
    }
}

/// Partial update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<StoreDifficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// One page of the store's recipe listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSearchResult {
    pub recipes: Vec<StoredRecipe>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

/// Query parameters for listing recipes. Unset fields are left off the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<StoreDifficulty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
}

// The store keeps tags in a nullable JSON column.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a free-form duration like "15 mins" as minutes, using the first run of digits.
///
/// "1 hour 30 mins" reads as 1; the generator is asked for minute strings.
pub fn parse_time_minutes(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
