use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use cookup::basic_models::{GenerationRequest, GenerationResponse};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::{
    errors::{GenerateError, GenerateResult},
    generate::RecipeGenerator,
};

/// Path the generation endpoint is mounted under besides `/`.
pub const GENERATE_PATH: &str = "/functions/v1/generate-recipes";

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Clone)]
pub struct AppState {
    pub generator: RecipeGenerator,
}

/// Build the service. Every response carries permissive CORS headers.
pub fn router(generator: RecipeGenerator) -> Router {
    Router::new()
        // `POST /` and `POST /functions/v1/generate-recipes` go to `generate_recipes`
        .route("/", post(generate_recipes).options(preflight))
        .route(GENERATE_PATH, post(generate_recipes).options(preflight))
        // `GET /health` goes to `health`
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(
            tower_http::compression::CompressionLayer::new()
                .quality(tower_http::CompressionLevel::Fastest),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(AppState { generator })
}

// Browsers ask before cross-origin POSTs; the CORS headers are added by the layer
async fn preflight() -> StatusCode {
    StatusCode::OK
}

// Just reply that everything is okay
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Generate recipes from the posted ingredients.
async fn generate_recipes(
    State(state): State<AppState>,
    body: Bytes,
) -> GenerateResult<Json<GenerationResponse>> {
    let request: GenerationRequest =
        serde_json::from_slice(&body).map_err(|e| GenerateError::InvalidBody(e.to_string()))?;
    let response = state.generator.generate(&request).await?;
    tracing::info!("Returning {} recipes", response.recipes.len());
    Ok(Json(response))
}
