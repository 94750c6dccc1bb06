//! Client for the external recipe store's REST API.

use cookup::{
    basic_models::Recipe,
    store_models::{
        CreatedRecipe, ListQuery, NewStoredRecipe, RecipeSearchResult, RecipeUpdate,
        SemanticSearchRequest, StoredRecipe,
    },
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Recipe not found")]
    NotFound,

    #[error("Recipe store returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Request to recipe store failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct RecipeStoreClient {
    client: Client,
    api_base: String,
}

impl RecipeStoreClient {
    /// `base_url` is the store's root, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            api_base: format!("{}/api/v1", base_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub async fn create(&self, recipe: &NewStoredRecipe) -> Result<StoredRecipe, StoreError> {
        let request = self.client.post(self.url("/recipes/")).json(recipe);
        let created: CreatedRecipe = decode(send(request).await?).await?;
        Ok(created.into_recipe())
    }

    /// Convert a generated recipe to the store's shape and save it.
    pub async fn save_generated(&self, recipe: &Recipe) -> Result<StoredRecipe, StoreError> {
        let stored = NewStoredRecipe::from(recipe);
        tracing::debug!("Converted recipe for the store: {:?}", stored);
        self.create(&stored).await
    }

    /// One page of recipes, filtered by whatever `query` sets.
    pub async fn list(&self, query: &ListQuery) -> Result<RecipeSearchResult, StoreError> {
        let request = self.client.get(self.url("/recipes/")).query(query);
        decode(send(request).await?).await
    }

    pub async fn get(&self, recipe_id: i64) -> Result<StoredRecipe, StoreError> {
        let request = self.client.get(self.url(&format!("/recipes/{}", recipe_id)));
        decode(send(request).await?).await
    }

    pub async fn update(
        &self,
        recipe_id: i64,
        update: &RecipeUpdate,
    ) -> Result<StoredRecipe, StoreError> {
        let request = self
            .client
            .put(self.url(&format!("/recipes/{}", recipe_id)))
            .json(update);
        decode(send(request).await?).await
    }

    pub async fn delete(&self, recipe_id: i64) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.url(&format!("/recipes/{}", recipe_id)));
        send(request).await?;
        Ok(())
    }

    /// Recipes ranked by similarity to a free-text query.
    pub async fn semantic_search(
        &self,
        search: &SemanticSearchRequest,
    ) -> Result<Vec<StoredRecipe>, StoreError> {
        let request = self
            .client
            .post(self.url("/recipes/search/semantic"))
            .json(search);
        decode(send(request).await?).await
    }
}

/// Send a request, turning non-success statuses into [`StoreError`].
async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        detail: error_detail(&body).unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    Ok(response.json().await?)
}

/// The store explains errors in a `detail` field, as a string or a list of problems.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
