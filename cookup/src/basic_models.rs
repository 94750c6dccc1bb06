use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// How hard a recipe is to make. Serialized with the capitalized names the
/// generation prompt asks the model for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A recipe suggested by the text model, optionally illustrated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of a generation request.
///
/// `ingredients` may be absent or `null` on the wire; both read as no ingredients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

impl GenerationRequest {
    pub fn new<S: Into<String>>(ingredients: impl IntoIterator<Item = S>) -> Self {
        Self {
            ingredients: Some(ingredients.into_iter().map(Into::into).collect()),
        }
    }

    /// The trimmed, non-blank ingredients, in the order they were given.
    pub fn cleaned_ingredients(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .flatten()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub recipes: Vec<Recipe>,
}

/// Uniform failure payload. Always paired with an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}
