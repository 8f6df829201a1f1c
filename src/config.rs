//! Environment-driven configuration
//!
//! Connection settings for the hosted model plus the input and results
//! directories. Credentials are read as-is; a missing key only shows up once
//! the first remote call is rejected.

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const INGREDIENTS_FILE: &str = "ingredients.json";
pub const RECIPES_FILE: &str = "recipes.json";

const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_INPUT_DIR: &str = "./input";
const DEFAULT_RESULTS_DIR: &str = "./data/results";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub model: String,
    pub input_dir: PathBuf,
    pub results_dir: PathBuf,
    pub request_timeout: Duration,
}

/// Locations of the persisted outputs, and optionally of an input image.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePaths {
    pub ingredients: PathBuf,
    pub recipes: PathBuf,
    pub image: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let request_timeout = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("REQUEST_TIMEOUT_SECS is not a number: {}", raw))
            })?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let config = Self {
            endpoint: env_or("AZURE_OPENAI_ENDPOINT", ""),
            api_key: env_or("AZURE_OPENAI_API_KEY", ""),
            api_version: env_or("AZURE_OPENAI_API_VERSION", DEFAULT_API_VERSION),
            model: env_or("AZURE_OPENAI_DEPLOYMENT", DEFAULT_MODEL),
            input_dir: PathBuf::from(env_or("INPUT_DIR", DEFAULT_INPUT_DIR)),
            results_dir: PathBuf::from(env_or("RESULTS_DIR", DEFAULT_RESULTS_DIR)),
            request_timeout,
        };

        config.ensure_dirs()?;
        Ok(config)
    }

    /// Config with empty credentials rooted at the given directories.
    pub fn with_dirs(input_dir: impl AsRef<Path>, results_dir: impl AsRef<Path>) -> Result<Self> {
        let config = Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            input_dir: input_dir.as_ref().to_path_buf(),
            results_dir: results_dir.as_ref().to_path_buf(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        config.ensure_dirs()?;
        Ok(config)
    }

    /// Create the input and results directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.input_dir)?;
        fs::create_dir_all(&self.results_dir)?;
        tracing::debug!(
            "Using input dir {} and results dir {}",
            self.input_dir.display(),
            self.results_dir.display()
        );
        Ok(())
    }

    pub fn file_paths(&self, image_filename: Option<&str>) -> FilePaths {
        FilePaths {
            ingredients: self.results_dir.join(INGREDIENTS_FILE),
            recipes: self.results_dir.join(RECIPES_FILE),
            image: image_filename.map(|name| self.input_dir.join(name)),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
