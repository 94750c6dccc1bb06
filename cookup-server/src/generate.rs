//! The generation pipeline: validate, write recipes with the text model,
//! parse them, then illustrate each one with the image model.

use std::sync::Arc;

use cookup::basic_models::{GenerationRequest, GenerationResponse, Recipe};
use futures::future::join_all;

use crate::{
    config::AiConfig,
    errors::{GenerateError, GenerateResult},
    parse::parse_recipes,
    prompts,
    provider::{AiProvider, ChatMessage, ChatRequest, ProviderError},
};

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub text_model: String,
    pub image_model: String,
    pub temperature: f32,
}

impl From<&AiConfig> for GenerationSettings {
    fn from(config: &AiConfig) -> Self {
        Self {
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            temperature: config.temperature,
        }
    }
}

#[derive(Clone)]
pub struct RecipeGenerator {
    provider: Arc<dyn AiProvider>,
    settings: GenerationSettings,
}

impl RecipeGenerator {
    pub fn new(provider: Arc<dyn AiProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Run one generation request end to end.
    ///
    /// Fails before any provider call on missing ingredients or credentials.
    /// Once the recipes parse, the result is always a success, with images
    /// only on the recipes whose illustration worked.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerateResult<GenerationResponse> {
        let ingredients = request.cleaned_ingredients();
        if ingredients.is_empty() {
            return Err(GenerateError::NoIngredients);
        }
        if !self.provider.is_configured() {
            return Err(GenerateError::NotConfigured);
        }

        tracing::info!(?ingredients, "Generating recipes");
        let reply = self.write_recipes(&ingredients).await?;
        tracing::debug!("AI response: {}", reply);
        let recipes = parse_recipes(&reply)?;

        tracing::info!("Generating images for {} recipes", recipes.len());
        let recipes = self.illustrate_all(recipes).await;
        Ok(GenerationResponse { recipes })
    }

    async fn write_recipes(&self, ingredients: &[String]) -> GenerateResult<String> {
        let request = ChatRequest {
            model: self.settings.text_model.clone(),
            messages: vec![
                ChatMessage::system(prompts::system_prompt()),
                ChatMessage::user(prompts::user_prompt(ingredients)),
            ],
            temperature: Some(self.settings.temperature),
            modalities: None,
        };
        let response = self.provider.chat(&request).await?;
        response.text().map(str::to_string).ok_or_else(|| {
            GenerateError::Provider(ProviderError::Decode("Reply has no message content".into()))
        })
    }

    /// Illustrate every recipe at once and wait for all of them.
    ///
    /// Each image is independent: a failure only leaves that recipe without
    /// an image. The output keeps the input order.
    pub async fn illustrate_all(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        let image_urls = join_all(recipes.iter().map(|r| self.illustrate(&r.name))).await;
        recipes
            .into_iter()
            .zip(image_urls)
            .map(|(recipe, image_url)| Recipe {
                image_url,
                ..recipe
            })
            .collect()
    }

    async fn illustrate(&self, recipe_name: &str) -> Option<String> {
        match self.request_image(recipe_name).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Failed to generate image for recipe {}: {}", recipe_name, e);
                None
            }
        }
    }

    async fn request_image(&self, recipe_name: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: self.settings.image_model.clone(),
            messages: vec![ChatMessage::user(prompts::image_prompt(recipe_name))],
            temperature: None,
            modalities: Some(vec!["image".into(), "text".into()]),
        };
        let response = self.provider.chat(&request).await?;
        response
            .first_image_url()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Decode("Reply has no image".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FakeProvider, FakeReply};
    use std::time::Duration;

    const TWO_RECIPES: &str = r#"```json
[
  {"name":"Garlic Rice","prepTime":"5 mins","cookTime":"20 mins","difficulty":"Easy","servings":2,"ingredients":["rice","garlic"],"instructions":["fry garlic","add rice"]},
  {"name":"Chicken Bowl","prepTime":"10 mins","cookTime":"25 mins","difficulty":"Medium","servings":3,"ingredients":["chicken","rice"],"instructions":["cook chicken","serve on rice"]}
]
```"#;

    fn generator(provider: Arc<FakeProvider>) -> RecipeGenerator {
        RecipeGenerator::new(provider, GenerationSettings::from(&AiConfig::default()))
    }

    #[tokio::test]
    async fn sends_the_text_request_as_configured() {
        let provider = Arc::new(FakeProvider::with_text(TWO_RECIPES));
        generator(provider.clone())
            .generate(&GenerationRequest::new(["rice", "garlic"]))
            .await
            .unwrap();

        let calls = provider.calls();
        let text_call = &calls[0];
        assert_eq!(text_call.model, "google/gemini-2.5-flash");
        assert_eq!(text_call.temperature, Some(0.8));
        assert_eq!(text_call.messages.len(), 2);
        assert_eq!(
            text_call.prompt(),
            "Create 2-3 recipes using these ingredients: rice, garlic"
        );
        assert!(!text_call.wants_image());

        let image_calls: Vec<_> = calls.iter().filter(|c| c.wants_image()).collect();
        assert_eq!(image_calls.len(), 2);
        assert!(image_calls
            .iter()
            .all(|c| c.model == "google/gemini-2.5-flash-image-preview" && c.temperature.is_none()));
    }

    #[tokio::test]
    async fn failed_images_leave_other_recipes_alone() {
        let provider = Arc::new(
            FakeProvider::with_text(TWO_RECIPES)
                .with_image("Garlic Rice", FakeReply::Image("https://img/rice.png".into()))
                .with_image("Chicken Bowl", FakeReply::Status(503)),
        );
        let response = generator(provider)
            .generate(&GenerationRequest::new(["rice"]))
            .await
            .unwrap();
        assert_eq!(response.recipes.len(), 2);
        assert_eq!(response.recipes[0].image_url.as_deref(), Some("https://img/rice.png"));
        assert_eq!(response.recipes[1].image_url, None);
    }

    #[tokio::test]
    async fn image_reply_without_an_image_is_a_soft_failure() {
        let provider = Arc::new(
            FakeProvider::with_text(TWO_RECIPES)
                .with_default_image(FakeReply::Text("sorry, no picture".into())),
        );
        let response = generator(provider)
            .generate(&GenerationRequest::new(["rice"]))
            .await
            .unwrap();
        assert!(response.recipes.iter().all(|r| r.image_url.is_none()));
    }

    #[tokio::test]
    async fn slow_images_do_not_reorder_recipes() {
        let provider = Arc::new(
            FakeProvider::with_text(TWO_RECIPES)
                .with_delayed_image(
                    "Garlic Rice",
                    Duration::from_millis(80),
                    FakeReply::Image("https://img/first.png".into()),
                )
                .with_image("Chicken Bowl", FakeReply::Image("https://img/second.png".into())),
        );
        let response = generator(provider)
            .generate(&GenerationRequest::new(["rice"]))
            .await
            .unwrap();
        let pairs: Vec<_> = response
            .recipes
            .iter()
            .map(|r| (r.name.as_str(), r.image_url.as_deref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Garlic Rice", Some("https://img/first.png")),
                ("Chicken Bowl", Some("https://img/second.png")),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn images_are_requested_concurrently() {
        let delay = Duration::from_millis(200);
        let provider = Arc::new(
            FakeProvider::with_text(TWO_RECIPES)
                .with_delayed_image("Garlic Rice", delay, FakeReply::Image("a".into()))
                .with_delayed_image("Chicken Bowl", delay, FakeReply::Image("b".into())),
        );
        let started = tokio::time::Instant::now();
        generator(provider)
            .generate(&GenerationRequest::new(["rice"]))
            .await
            .unwrap();
        // Sequential calls would take at least twice the delay
        let elapsed = started.elapsed();
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 2);
    }

    #[tokio::test]
    async fn missing_content_is_a_provider_failure() {
        let provider = Arc::new(FakeProvider::with_text_reply(FakeReply::Empty));
        let err = generator(provider.clone())
            .generate(&GenerationRequest::new(["rice"]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Provider(ProviderError::Decode(_))));
        assert_eq!(provider.image_calls(), 0);
    }

    #[tokio::test]
    async fn blank_ingredients_never_reach_the_provider() {
        let provider = Arc::new(FakeProvider::with_text(TWO_RECIPES));
        let err = generator(provider.clone())
            .generate(&GenerationRequest::new(["  ", ""]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::NoIngredients));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_before_calling_out() {
        let provider = Arc::new(FakeProvider::unconfigured());
        let err = generator(provider.clone())
            .generate(&GenerationRequest::new(["rice"]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::NotConfigured));
        assert!(provider.calls().is_empty());
    }
}
