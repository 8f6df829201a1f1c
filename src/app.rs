//! Application wiring shared by the CLI and HTTP front ends.

use crate::ai::{AzureOpenAiClient, CompletionService};
use crate::config::Config;
use crate::models::{IngredientsResult, RecipeCollection};
use crate::recipes::RecipeService;
use crate::vision::VisionService;
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Configuration plus both services, built once per process.
pub struct App {
    pub config: Config,
    pub vision: VisionService,
    pub recipes: RecipeService,
}

impl App {
    /// Build an app around an injected completion client.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_services(config: Config, client: Arc<dyn CompletionService>) -> Self {
        Self {
            config,
            vision: VisionService::new(client.clone()),
            recipes: RecipeService::new(client),
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        let client = AzureOpenAiClient::from_config(&config)?;
        info!(
            "Chat deployment: {} (api-version {})",
            config.model, config.api_version
        );
        Ok(Self::with_services(config, Arc::new(client)))
    }

    /// Analyze an image and overwrite the persisted ingredients file.
    pub async fn analyze_and_save(&self, image_path: &Path) -> Result<IngredientsResult> {
        let result = self.vision.analyze_image(image_path).await?;
        let output = self.config.file_paths(None).ingredients;
        self.vision.save_analysis(&result, &output)?;
        Ok(result)
    }

    /// Generate recipes and overwrite the persisted recipes file.
    pub async fn generate_and_save(
        &self,
        ingredients: &[String],
        count: u32,
    ) -> Result<RecipeCollection> {
        let recipes = self.recipes.generate_recipes(ingredients, count).await?;
        let output = self.config.file_paths(None).recipes;
        self.recipes.save_recipes(&recipes, &output)?;
        Ok(recipes)
    }
}
