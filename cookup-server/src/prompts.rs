//! Prompt text sent to the provider.
//!
//! The JSON shape described in `generate-recipes.md` is what [`crate::parse`] decodes,
//! so the two have to change together.

/// System instruction for the text model.
pub fn system_prompt() -> &'static str {
    include_str!("prompts/generate-recipes.md").trim()
}

/// User instruction naming the ingredients, comma-joined in the order given.
pub fn user_prompt(ingredients: &[String]) -> String {
    include_str!("prompts/request-recipes.md")
        .trim()
        .replace("{ingredients}", &ingredients.join(", "))
}

/// Prompt for the image model, built from the recipe name.
pub fn image_prompt(recipe_name: &str) -> String {
    include_str!("prompts/illustrate.md")
        .trim()
        .replace("{name}", recipe_name)
}
