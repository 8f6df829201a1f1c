//! `POST /analyze-image`

use crate::api::{ApiError, AppState, QueryParams};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeImageParams {
    pub async_processing: Option<String>,
}

pub async fn analyze_image(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<AnalyzeImageParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart?;
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    let mut async_processing = match params.async_processing.as_deref() {
        Some(value) => async_flag(value)?,
        None => false,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let original_name = field.file_name().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                upload = Some((original_name, data.to_vec()));
            }
            "async_processing" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read async_processing: {}", e))
                })?;
                async_processing = async_flag(&value)?;
            }
            _ => {}
        }
    }

    let (original_name, data) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("File cannot be empty".to_string()));
    }

    let image_filename = stored_filename(original_name.as_deref());
    let image_path = state.app.config.input_dir.join(&image_filename);
    tokio::fs::write(&image_path, &data)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;
    info!(
        "Stored upload as {} ({} bytes)",
        image_path.display(),
        data.len()
    );

    if async_processing {
        let job = state.jobs.create(&image_filename).await;
        let app = state.app.clone();
        let jobs = state.jobs.clone();
        let job_id = job.id;

        tokio::spawn(async move {
            match app.analyze_and_save(&image_path).await {
                Ok(result) => jobs.complete(job_id, result).await,
                Err(e) => {
                    error!("Background analysis {} failed: {}", job_id, e);
                    jobs.fail(job_id, e.to_string()).await;
                }
            }
        });

        return Ok(Json(json!({
            "status": "processing",
            "message": "Image analysis started in the background",
            "image_filename": image_filename,
            "job_id": job_id,
        })));
    }

    let result = state.app.analyze_and_save(&image_path).await?;
    let summary = result.summary();

    Ok(Json(json!({
        "status": "complete",
        "result": result,
        "summary": {
            "total_ingredients": summary.total_count,
            "ingredient_categories": summary.categories,
        },
        "image_filename": image_filename,
    })))
}

/// `fridge_<16 hex>.<ext>`, keeping the uploaded extension when present.
fn stored_filename(original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string());

    format!("fridge_{:016x}.{}", rand::random::<u64>(), ext)
}

fn async_flag(value: &str) -> Result<bool, ApiError> {
    parse_flag(value).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid async_processing value: {}", value))
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
