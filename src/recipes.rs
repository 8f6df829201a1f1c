//! Recipe suggestions from an ingredient list.

use crate::ai::{CompletionService, UserContent};
use crate::models::{IngredientsResult, RecipeAnalysisRow, RecipeCollection};
use crate::{prompts, storage, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const RECIPE_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_RECIPE_COUNT: u32 = 5;

pub struct RecipeService {
    client: Arc<dyn CompletionService>,
}

impl RecipeService {
    pub fn new(client: Arc<dyn CompletionService>) -> Self {
        Self { client }
    }

    /// Read a persisted analysis and flatten it into one ingredient list.
    pub fn load_ingredients(&self, path: &Path) -> Result<Vec<String>> {
        let load = || -> Result<Vec<String>> {
            let value = storage::read_json(path)?;
            Ok(IngredientsResult::from_value(value)?.flatten())
        };

        let ingredients = load().map_err(|e| e.context("Error loading ingredients"))?;
        tracing::info!(
            "Loaded {} ingredients from {}",
            ingredients.len(),
            path.display()
        );
        Ok(ingredients)
    }

    pub async fn generate_recipes(
        &self,
        ingredients: &[String],
        count: u32,
    ) -> Result<RecipeCollection> {
        tracing::info!(
            "Requesting {} recipes for {} ingredients",
            count,
            ingredients.len()
        );

        self.request_recipes(ingredients, count)
            .await
            .map_err(|e| e.context("Error generating recipes"))
    }

    async fn request_recipes(&self, ingredients: &[String], count: u32) -> Result<RecipeCollection> {
        let user_prompt = prompts::render(
            prompts::RECIPE_USER,
            &[
                ("ingredients", &ingredients.join(", ")),
                ("count", &count.to_string()),
            ],
        );

        let reply = self
            .client
            .complete(
                prompts::RECIPE_SYSTEM,
                UserContent::Text(user_prompt),
                RECIPE_MAX_TOKENS,
                true,
            )
            .await?;

        let value: serde_json::Value = serde_json::from_str(&reply)?;
        let collection = RecipeCollection::from_value(value)?;

        // Scores and missing lists come from the model unverified.
        for recipe in collection
            .recipes
            .iter()
            .filter(|r| r.accounting_mismatch())
        {
            tracing::warn!(
                "Recipe '{}' lists available + missing ingredients that differ from its total",
                recipe.name
            );
        }

        tracing::info!("Received {} recipes", collection.recipes.len());
        Ok(collection)
    }

    pub fn save_recipes(&self, recipes: &RecipeCollection, output_path: &Path) -> Result<PathBuf> {
        storage::write_json_pretty(recipes, output_path)
    }

    pub fn analysis_table(&self, recipes: &RecipeCollection) -> Option<Vec<RecipeAnalysisRow>> {
        recipes.analysis_table()
    }
}
