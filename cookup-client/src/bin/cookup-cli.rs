use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cookup::{
    basic_models::Recipe,
    store_models::{ListQuery, SemanticSearchRequest, StoreDifficulty, StoredRecipe},
};
use cookup_client::{generation::GenerationClient, store::RecipeStoreClient};

/// Generate recipes from ingredients and manage the saved ones
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// URL of the generation service. Falls back to $COOKUP_SERVER.
    #[arg(long)]
    server: Option<String>,
    /// Root URL of the recipe store. Falls back to $COOKUP_STORE.
    #[arg(long)]
    store: Option<String>,
    /// Give up on generation after this many seconds
    #[arg(long, default_value_t = 180)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest recipes for a list of ingredients
    Generate {
        /// Ingredients to cook with
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Save every generated recipe to the store
        #[arg(long)]
        save: bool,
        /// Dry run mode: show what would be saved without saving
        #[arg(long)]
        dry: bool,
    },
    /// List saved recipes
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        /// Search term for title or description
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long)]
        difficulty: Option<StoreDifficulty>,
    },
    /// Show one saved recipe
    Show { id: i64 },
    /// Delete a saved recipe
    Delete { id: i64 },
    /// Find saved recipes by meaning rather than keywords
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        min_score: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let server = args
        .server
        .or_else(|| dotenvy::var("COOKUP_SERVER").ok())
        .unwrap_or_else(|| "http://localhost:3000/functions/v1/generate-recipes".to_string());
    let store_url = args
        .store
        .or_else(|| dotenvy::var("COOKUP_STORE").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let store = RecipeStoreClient::new(&store_url);

    match args.command {
        Command::Generate {
            ingredients,
            save,
            dry,
        } => {
            println!("Ingredients: {}", ingredients.join(", "));
            let timeout = Duration::from_secs(args.timeout_secs);
            let recipes = GenerationClient::with_timeout(&server, timeout)?
                .generate(&ingredients)
                .await
                .context("Generating recipes")?;
            for recipe in &recipes {
                print_generated(recipe);
            }
            if save {
                for recipe in &recipes {
                    if dry {
                        println!("Dry run mode enabled, not saving {}", recipe.name);
                        continue;
                    }
                    let saved = store
                        .save_generated(recipe)
                        .await
                        .with_context(|| format!("Saving {}", recipe.name))?;
                    tracing::info!("Saved {} as #{}", saved.title, saved.id);
                    println!("Saved {} as #{}", saved.title, saved.id);
                }
            }
        }
        Command::List {
            page,
            size,
            search,
            cuisine,
            difficulty,
        } => {
            let query = ListQuery {
                page,
                size,
                search,
                cuisine,
                difficulty,
            };
            let result = store.list(&query).await.context("Listing recipes")?;
            println!(
                "Page {} ({} per page, {} total)",
                result.page, result.size, result.total
            );
            for recipe in &result.recipes {
                print_summary(recipe);
            }
        }
        Command::Show { id } => {
            let recipe = store.get(id).await.context("Fetching recipe")?;
            println!("{:#?}", recipe);
        }
        Command::Delete { id } => {
            store.delete(id).await.context("Deleting recipe")?;
            println!("Deleted #{}", id);
        }
        Command::Search {
            query,
            limit,
            min_score,
        } => {
            let request = SemanticSearchRequest {
                query,
                limit,
                min_score,
            };
            for recipe in store.semantic_search(&request).await.context("Searching")? {
                print_summary(&recipe);
            }
        }
    }
    Ok(())
}

fn print_generated(recipe: &Recipe) {
    println!();
    println!("# {}", recipe.name);
    println!(
        "{} | prep {} | cook {} | serves {}",
        recipe.difficulty, recipe.prep_time, recipe.cook_time, recipe.servings
    );
    if let Some(url) = &recipe.image_url {
        // Images often come back as data URLs; don't flood the terminal
        println!("image: {}", url.chars().take(80).collect::<String>());
    }
    for ingredient in &recipe.ingredients {
        println!("- {}", ingredient);
    }
    for (n, step) in recipe.instructions.iter().enumerate() {
        println!("{}. {}", n + 1, step);
    }
}

fn print_summary(recipe: &StoredRecipe) {
    let difficulty = recipe
        .difficulty
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());
    println!("#{} {} [{}]", recipe.id, recipe.title, difficulty);
}
