//! Data models
//!
//! The ingredient analysis produced from a fridge photo, the recipes
//! suggested from it, and the read-only views derived from both. Parsing
//! from model output goes through `from_value`, which rejects JSON of the
//! wrong shape with [`Error::InvalidResponse`].

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Food category -> ingredient names, in the order the model listed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientsResult {
    pub ingredients: IndexMap<String, Vec<String>>,
}

impl IngredientsResult {
    pub fn new(ingredients: IndexMap<String, Vec<String>>) -> Self {
        Self { ingredients }
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.get("ingredients").is_none() {
            return Err(Error::InvalidResponse(
                "missing \"ingredients\" key in analysis".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidResponse(format!("malformed ingredients analysis: {}", e)))
    }

    /// Every ingredient, category by category, in listed order.
    pub fn flatten(&self) -> Vec<String> {
        self.ingredients.values().flatten().cloned().collect()
    }

    pub fn summary(&self) -> IngredientSummary {
        let by_category: IndexMap<String, usize> = self
            .ingredients
            .iter()
            .map(|(category, items)| (category.clone(), items.len()))
            .collect();

        IngredientSummary {
            total_count: by_category.values().sum(),
            categories: by_category.len(),
            by_category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngredientSummary {
    pub total_count: usize,
    pub categories: usize,
    pub by_category: IndexMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub total_ingredients: Vec<String>,
    pub available_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    /// Percentage (0-100) of required ingredients on hand, as reported by the model.
    /// Integer scores are widened, so `100` is persisted as `100.0`.
    pub completeness_score: f64,
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub difficulty: String,
}

impl Recipe {
    /// True when available and missing together do not cover exactly the
    /// total ingredient list. Comparison ignores case and surrounding space.
    pub fn accounting_mismatch(&self) -> bool {
        let normalize = |items: &[String]| -> HashSet<String> {
            items.iter().map(|i| i.trim().to_lowercase()).collect()
        };

        let total = normalize(&self.total_ingredients);
        let mut covered = normalize(&self.available_ingredients);
        covered.extend(normalize(&self.missing_ingredients));

        total != covered
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCollection {
    pub recipes: Vec<Recipe>,
}

impl RecipeCollection {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value.get("recipes") {
            Some(serde_json::Value::Array(_)) => {}
            Some(_) => {
                return Err(Error::InvalidResponse(
                    "\"recipes\" is not an array".to_string(),
                ))
            }
            None => {
                return Err(Error::InvalidResponse(
                    "missing \"recipes\" key in response".to_string(),
                ))
            }
        }
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidResponse(format!("malformed recipe list: {}", e)))
    }

    /// Per-recipe statistics for display, or `None` when there are no recipes.
    pub fn analysis_table(&self) -> Option<Vec<RecipeAnalysisRow>> {
        if self.recipes.is_empty() {
            return None;
        }

        Some(
            self.recipes
                .iter()
                .map(|recipe| RecipeAnalysisRow {
                    name: recipe.name.clone(),
                    completeness: recipe.completeness_score,
                    available_count: recipe.available_ingredients.len(),
                    missing_count: recipe.missing_ingredients.len(),
                    total_count: recipe.total_ingredients.len(),
                    cooking_time: recipe.cooking_time.clone(),
                    difficulty: recipe.difficulty.clone(),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeAnalysisRow {
    pub name: String,
    pub completeness: f64,
    pub available_count: usize,
    pub missing_count: usize,
    pub total_count: usize,
    pub cooking_time: String,
    pub difficulty: String,
}
