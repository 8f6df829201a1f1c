//! `GET /jobs/{job_id}`

use crate::api::{ApiError, AppState};
use crate::jobs::Job;
use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

/// Poll a background image analysis.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let id = Uuid::parse_str(&job_id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid job id: {}", job_id)))?;

    state
        .jobs
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", id)))
}
