//! Command-line driver
//!
//! Runs the analyze and recipe steps in sequence and prints progress to
//! stdout. Missing inputs are reported to the user and abort only the step
//! that needed them.

use crate::app::App;
use crate::models::{IngredientsResult, RecipeAnalysisRow, RecipeCollection};
use crate::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliAction {
    Analyze,
    Recipes,
    Both,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub action: CliAction,
    pub image: Option<String>,
    pub recipe_count: u32,
}

/// What a CLI run produced; `None` means the step was skipped or aborted.
#[derive(Debug, Default)]
pub struct CliOutcome {
    pub ingredients: Option<IngredientsResult>,
    pub recipes: Option<RecipeCollection>,
}

pub async fn run(app: &App, options: &CliOptions) -> Result<CliOutcome> {
    let mut outcome = CliOutcome::default();

    match options.action {
        CliAction::Analyze => {
            outcome.ingredients = analyze(app, options.image.as_deref()).await?;
        }
        CliAction::Recipes => {
            outcome.recipes = recipes_from_file(app, options.recipe_count).await?;
        }
        CliAction::Both => {
            outcome.ingredients = analyze(app, options.image.as_deref()).await?;
            if let Some(result) = &outcome.ingredients {
                outcome.recipes =
                    Some(generate(app, &result.flatten(), options.recipe_count).await?);
            }
        }
    }

    Ok(outcome)
}

async fn analyze(app: &App, image: Option<&str>) -> Result<Option<IngredientsResult>> {
    let Some(image) = image else {
        println!("Error: --image is required to analyze a fridge photo");
        return Ok(None);
    };

    let paths = app.config.file_paths(Some(image));
    let image_path = paths
        .image
        .unwrap_or_else(|| app.config.input_dir.join(image));

    println!("Analyzing image: {}", image_path.display());

    let result = match app.analyze_and_save(&image_path).await {
        Ok(result) => result,
        Err(e) if e.is_not_found() => {
            println!("Error: {}", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let summary = result.summary();
    println!("Saved ingredients to {}", paths.ingredients.display());
    println!(
        "Found {} ingredients in {} categories:",
        summary.total_count, summary.categories
    );
    for (category, count) in &summary.by_category {
        println!("  {}: {}", category, count);
    }

    Ok(Some(result))
}

async fn recipes_from_file(app: &App, count: u32) -> Result<Option<RecipeCollection>> {
    let ingredients_path = app.config.file_paths(None).ingredients;
    if !ingredients_path.is_file() {
        println!(
            "No ingredients found at {}. Run the analyze action first.",
            ingredients_path.display()
        );
        return Ok(None);
    }

    let ingredients = app.recipes.load_ingredients(&ingredients_path)?;
    Ok(Some(generate(app, &ingredients, count).await?))
}

async fn generate(app: &App, ingredients: &[String], count: u32) -> Result<RecipeCollection> {
    println!(
        "Generating {} recipes from {} ingredients...",
        count,
        ingredients.len()
    );

    let recipes = app.generate_and_save(ingredients, count).await?;
    println!(
        "Saved recipes to {}",
        app.config.file_paths(None).recipes.display()
    );

    match app.recipes.analysis_table(&recipes) {
        Some(rows) => print!("{}", format_table(&rows)),
        None => println!("No recipes were generated."),
    }

    Ok(recipes)
}

pub fn format_table(rows: &[RecipeAnalysisRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once("Recipe".len()))
        .max()
        .unwrap_or(6);

    let header = format!(
        "{:<name_width$}  {:>12}  {:>9}  {:>7}  {:>5}  {:<12}  {}\n",
        "Recipe", "Completeness", "Available", "Missing", "Total", "Time", "Difficulty",
    );

    rows.iter().fold(header, |mut out, row| {
        out.push_str(&format!(
            "{:<name_width$}  {:>11.1}%  {:>9}  {:>7}  {:>5}  {:<12}  {}\n",
            row.name,
            row.completeness,
            row.available_count,
            row.missing_count,
            row.total_count,
            row.cooking_time,
            row.difficulty,
        ));
        out
    })
}
