use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{AiProvider, ChatRequest, ChatResponse, ProviderError};
use crate::config::AiConfig;

/// OpenAI-style chat-completion gateway reached over HTTPS with a bearer key.
pub struct GatewayProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GatewayProvider {
    pub fn new(config: &AiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            // An empty key is as good as none
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl AiProvider for GatewayProvider {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
