//! Turning the text model's reply into recipes.
//!
//! The reply is asked to be a bare JSON array but often arrives wrapped in a
//! markdown fence or surrounded by chatter. Extraction picks the most likely
//! JSON substring; decoding then accepts only the exact recipe shape.

use cookup::basic_models::Recipe;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref FENCED_JSON: Regex =
        Regex::new(r"(?s)```json\n?(.*?)\n?```").expect("Valid regex pattern");
    static ref BRACKETED: Regex = Regex::new(r"(?s)\[.*\]").expect("Valid regex pattern");
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Reply is not a JSON array of recipes: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recipe {index} has an invalid {field}: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },
}

/// Pick the part of `text` that should hold the recipe array.
///
/// In order: the body of a fenced block tagged `json`, the span from the first
/// `[` to the last `]`, or the whole text.
pub fn extract_json_candidate(text: &str) -> &str {
    if let Some(inner) = FENCED_JSON.captures(text).and_then(|c| c.get(1)) {
        return inner.as_str();
    }
    if let Some(array) = BRACKETED.find(text) {
        return array.as_str();
    }
    text
}

/// Decode the recipes out of the text model's reply.
///
/// Shapes that don't match are rejected rather than coerced. Any `imageUrl`
/// the model made up is dropped; images come from the image model only.
pub fn parse_recipes(text: &str) -> Result<Vec<Recipe>, ParseError> {
    let candidate = extract_json_candidate(text).trim();
    let mut recipes: Vec<Recipe> = serde_json::from_str(candidate)?;
    for (index, recipe) in recipes.iter_mut().enumerate() {
        if recipe.name.trim().is_empty() {
            return Err(ParseError::InvalidField {
                index,
                field: "name",
                reason: "must not be empty",
            });
        }
        if recipe.servings == 0 {
            return Err(ParseError::InvalidField {
                index,
                field: "servings",
                reason: "must be positive",
            });
        }
        recipe.image_url = None;
    }
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookup::basic_models::Difficulty;

    const SOUP: &str = r#"[{"name":"Tomato Soup","prepTime":"10 mins","cookTime":"20 mins","difficulty":"Easy","servings":4,"ingredients":["tomato","salt"],"instructions":["boil","blend"]}]"#;

    fn tomato_soup() -> Recipe {
        Recipe {
            name: "Tomato Soup".into(),
            prep_time: "10 mins".into(),
            cook_time: "20 mins".into(),
            difficulty: Difficulty::Easy,
            servings: 4,
            ingredients: vec!["tomato".into(), "salt".into()],
            instructions: vec!["boil".into(), "blend".into()],
            image_url: None,
        }
    }

    #[test]
    fn reads_a_fenced_json_block() {
        let reply = format!("Here are your recipes:\n```json\n{}\n```\nEnjoy!", SOUP);
        assert_eq!(parse_recipes(&reply).unwrap(), vec![tomato_soup()]);
    }

    #[test]
    fn reads_a_bare_array_inside_prose() {
        let reply = format!("Sure! {} Let me know if you want more.", SOUP);
        assert_eq!(parse_recipes(&reply).unwrap(), vec![tomato_soup()]);
    }

    #[test]
    fn fenced_and_bare_replies_agree() {
        let fenced = format!("```json\n{}\n```", SOUP);
        let bare = format!("Recipes follow.\n{}\n", SOUP);
        assert_eq!(parse_recipes(&fenced).unwrap(), parse_recipes(&bare).unwrap());
    }

    #[test]
    fn fenced_block_wins_over_brackets_in_prose() {
        let reply = format!("Notes [see below]\n```json\n{}\n```", SOUP);
        assert_eq!(extract_json_candidate(&reply), SOUP);
        assert_eq!(parse_recipes(&reply).unwrap().len(), 1);
    }

    #[test]
    fn untagged_fence_falls_back_to_the_brackets() {
        let reply = format!("```\n{}\n```", SOUP);
        assert_eq!(extract_json_candidate(&reply), SOUP);
    }

    #[test]
    fn whole_text_is_the_last_resort() {
        let reply = "I could not think of any recipes today.";
        assert_eq!(extract_json_candidate(reply), reply);
        assert!(matches!(parse_recipes(reply), Err(ParseError::Json(_))));
    }

    #[test]
    fn rejects_unknown_difficulty() {
        let reply = SOUP.replace("\"Easy\"", "\"Expert\"");
        assert!(matches!(parse_recipes(&reply), Err(ParseError::Json(_))));
    }

    #[test]
    fn rejects_wrong_types() {
        let reply = SOUP.replace("\"servings\":4", "\"servings\":\"four\"");
        assert!(parse_recipes(&reply).is_err());
        let reply = SOUP.replace("[\"boil\",\"blend\"]", "\"boil and blend\"");
        assert!(parse_recipes(&reply).is_err());
    }

    #[test]
    fn rejects_zero_servings() {
        let reply = SOUP.replace("\"servings\":4", "\"servings\":0");
        assert!(matches!(
            parse_recipes(&reply),
            Err(ParseError::InvalidField {
                index: 0,
                field: "servings",
                ..
            })
        ));
    }

    #[test]
    fn drops_image_urls_from_the_text_model() {
        let reply = SOUP.replace("\"servings\":4", "\"servings\":4,\"imageUrl\":\"http://made.up\"");
        assert_eq!(parse_recipes(&reply).unwrap()[0].image_url, None);
    }

    #[test]
    fn keeps_the_order_of_the_array() {
        let two = format!(
            "[{},{}]",
            &SOUP[1..SOUP.len() - 1],
            SOUP[1..SOUP.len() - 1].replace("Tomato Soup", "Salted Tomatoes")
        );
        let names: Vec<_> = parse_recipes(&two)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Tomato Soup", "Salted Tomatoes"]);
    }

    #[test]
    fn an_empty_array_is_not_an_error() {
        assert!(parse_recipes("```json\n[]\n```").unwrap().is_empty());
    }
}
