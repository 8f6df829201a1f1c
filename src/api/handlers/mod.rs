//! One module per route.

pub mod analyze_image;
pub mod generate_recipes;
pub mod get_ingredients;
pub mod get_job;
