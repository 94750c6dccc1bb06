use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cookup::basic_models::ErrorPayload;

use crate::{parse::ParseError, provider::ProviderError};

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

/// Every way a generation request can fail, each with a fixed status and client message.
#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error("Request body is not a valid generation request: {0}")]
    InvalidBody(String),
    #[error("No ingredients were provided")]
    NoIngredients,
    #[error("The AI provider API key is not configured")]
    NotConfigured,
    #[error("The AI provider is rate limiting us")]
    RateLimited,
    #[error("The AI provider account is out of credits")]
    CreditsDepleted,
    #[error("The AI provider failed: {0}")]
    Provider(ProviderError),
    #[error("Could not parse the AI reply: {0}")]
    Parse(#[from] ParseError),
}

impl From<ProviderError> for GenerateError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::NotConfigured => GenerateError::NotConfigured,
            ProviderError::Status { status: 429, .. } => GenerateError::RateLimited,
            ProviderError::Status { status: 402, .. } => GenerateError::CreditsDepleted,
            other => GenerateError::Provider(other),
        }
    }
}

impl GenerateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::InvalidBody(_) | GenerateError::NoIngredients => StatusCode::BAD_REQUEST,
            GenerateError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GenerateError::CreditsDepleted => StatusCode::PAYMENT_REQUIRED,
            GenerateError::NotConfigured
            | GenerateError::Provider(_)
            | GenerateError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message the caller sees. Never includes provider or parser detail.
    pub fn client_message(&self) -> &'static str {
        match self {
            GenerateError::InvalidBody(_) => "Invalid request body",
            GenerateError::NoIngredients => "Please provide at least one ingredient",
            GenerateError::NotConfigured => "AI service not configured",
            GenerateError::RateLimited => "Rate limit exceeded. Please try again later.",
            GenerateError::CreditsDepleted => "AI credits depleted. Please add credits to continue.",
            GenerateError::Provider(_) => "Failed to generate recipes",
            GenerateError::Parse(_) => "Failed to parse recipe data",
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GenerateError::NotConfigured | GenerateError::Provider(_) | GenerateError::Parse(_) => {
                tracing::error!("{}", self)
            }
            _ => tracing::warn!("{}", self),
        }
        let payload = ErrorPayload {
            error: self.client_message().to_string(),
        };
        (status, Json(payload)).into_response()
    }
}
