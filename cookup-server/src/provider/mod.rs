//! The chat-completion provider that writes and illustrates recipes.
//!
//! Text and images come from the same endpoint shape; only the model name and
//! the `modalities` field differ. [`GatewayProvider`] talks HTTP,
//! [`FakeProvider`] answers from a script for tests.

mod fake;
mod gateway;

pub use fake::{FakeProvider, FakeReply};
pub use gateway::GatewayProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider API key is not configured")]
    NotConfigured,

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected provider response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Whether credentials are available. Checked before any call is made.
    fn is_configured(&self) -> bool;

    /// Send one chat-completion request.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,
}

impl ChatRequest {
    /// Whether this request asks for an image rather than only text.
    pub fn wants_image(&self) -> bool {
        self.modalities
            .as_ref()
            .is_some_and(|m| m.iter().any(|x| x == "image"))
    }

    /// Content of the last message, which is the prompt for the turn.
    pub fn prompt(&self) -> &str {
        self.messages.last().map(|m| m.content.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub image_url: ImageUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatResponse {
    /// A response carrying just text, as the text model returns it.
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(content.into()),
                    images: vec![],
                },
            }],
        }
    }

    /// A response carrying one generated image.
    pub fn from_image_url(url: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(String::new()),
                    images: vec![GeneratedImage {
                        image_url: ImageUrl { url: url.into() },
                    }],
                },
            }],
        }
    }

    /// Text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }

    /// URL of the first image of the first choice.
    pub fn first_image_url(&self) -> Option<&str> {
        Some(self.choices.first()?.message.images.first()?.image_url.url.as_str())
    }
}
