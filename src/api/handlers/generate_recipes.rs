//! `POST /generate-recipes`

use crate::api::{ApiError, AppState, JsonBody};
use crate::models::{Recipe, RecipeAnalysisRow};
use crate::recipes::DEFAULT_RECIPE_COUNT;
use crate::storage;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateRecipesRequest {
    #[serde(default = "default_num_recipes")]
    pub num_recipes: i64,
    #[serde(default)]
    pub ingredients_file: Option<String>,
}

fn default_num_recipes() -> i64 {
    DEFAULT_RECIPE_COUNT.into()
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<Recipe>,
    pub analysis: Vec<RecipeAnalysisRow>,
    pub ingredient_count: usize,
}

pub async fn generate_recipes(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<GenerateRecipesRequest>,
) -> Result<Json<GenerateRecipesResponse>, ApiError> {
    let count = recipe_count(request.num_recipes)?;

    let app = &state.app;
    let path = match request.ingredients_file.as_deref() {
        Some(name) => storage::resolve_in(&app.config.results_dir, name)?,
        None => app.config.file_paths(None).ingredients,
    };

    if !path.is_file() {
        return Err(ApiError::NotFound(
            "Ingredients file not found. Analyze an image first.".to_string(),
        ));
    }

    let ingredients = app.recipes.load_ingredients(&path)?;
    let recipes = app
        .generate_and_save(&ingredients, count)
        .await?;
    let analysis = app.recipes.analysis_table(&recipes).unwrap_or_default();

    Ok(Json(GenerateRecipesResponse {
        recipes: recipes.recipes,
        analysis,
        ingredient_count: ingredients.len(),
    }))
}

fn recipe_count(requested: i64) -> Result<u32, ApiError> {
    u32::try_from(requested)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "num_recipes must be a positive integer, got {}",
                requested
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_count_bounds() {
        assert_eq!(recipe_count(1).unwrap(), 1);
        assert_eq!(recipe_count(12).unwrap(), 12);
        assert!(matches!(recipe_count(0), Err(ApiError::BadRequest(_))));
        assert!(matches!(recipe_count(-1), Err(ApiError::BadRequest(_))));
        assert!(recipe_count(i64::MAX).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: GenerateRecipesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.num_recipes, 5);
        assert!(request.ingredients_file.is_none());
    }
}
