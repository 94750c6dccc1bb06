//! Client for the recipe generation service.

use std::time::Duration;

use cookup::basic_models::{ErrorPayload, GenerationRequest, GenerationResponse, Recipe};
use reqwest::Client;
use thiserror::Error;

/// Covers one text call plus the image fan-out at the server's default timeouts.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// The service answered with an error payload.
    #[error("Generation failed ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    endpoint: String,
}

impl GenerationClient {
    /// `endpoint` is the full URL of the generation function.
    pub fn new(endpoint: &str) -> Result<Self, GenerationClientError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, GenerationClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub async fn generate(&self, ingredients: &[String]) -> Result<Vec<Recipe>, GenerationClientError> {
        let request = GenerationRequest {
            ingredients: Some(ingredients.to_vec()),
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .map(|p| p.error)
                .unwrap_or(body);
            return Err(GenerationClientError::Service {
                status: status.as_u16(),
                message,
            });
        }
        let generated: GenerationResponse = response.json().await?;
        Ok(generated.recipes)
    }
}
