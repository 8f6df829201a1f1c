//! `GET /ingredients`

use crate::api::{ApiError, AppState, QueryParams};
use crate::storage;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct IngredientsParams {
    pub filename: Option<String>,
}

/// Return a stored analysis verbatim, by default the latest one.
pub async fn get_ingredients(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<IngredientsParams>,
) -> Result<Json<Value>, ApiError> {
    let config = &state.app.config;
    let path = match params.filename.as_deref() {
        Some(name) => storage::resolve_in(&config.results_dir, name)?,
        None => config.file_paths(None).ingredients,
    };

    if !path.is_file() {
        return Err(ApiError::NotFound("Ingredients file not found".to_string()));
    }

    Ok(Json(storage::read_json(&path)?))
}
