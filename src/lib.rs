//! Fridge photo to recipe suggestions.
//!
//! A photo of a refrigerator's contents goes to a vision-capable hosted
//! model that lists the ingredients by category; that list then goes to a
//! chat model that proposes recipes scored by how many of their ingredients
//! are already on hand. Both steps are available from the command line and
//! over HTTP.

pub mod ai;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod prompts;
pub mod recipes;
pub mod storage;
pub mod vision;

pub use error::{Error, Result};
