//! Background analysis jobs
//!
//! Asynchronous image analyses are tracked here so their outcome can be
//! polled. Records live in memory only; finished jobs are dropped once
//! they are older than the store's retention window.

use crate::models::IngredientsResult;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Complete,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub image_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<IngredientsResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Seconds a finished job stays pollable.
pub const DEFAULT_JOB_RETENTION_SECS: i64 = 60 * 60;

#[derive(Clone)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
    retention: TimeDelta,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::with_retention(TimeDelta::seconds(DEFAULT_JOB_RETENTION_SECS))
    }
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: TimeDelta) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    pub async fn create(&self, image_filename: &str) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            image_filename: image_filename.to_string(),
            result: None,
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        };
        let mut jobs = self.jobs.write().await;
        prune_finished(&mut jobs, job.created_at, self.retention);
        jobs.insert(job.id, job.clone());
        tracing::debug!("Created job {} for {}", job.id, image_filename);
        job
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    pub async fn complete(&self, id: Uuid, result: IngredientsResult) {
        self.finish(id, JobStatus::Complete, Some(result), None).await;
    }

    pub async fn fail(&self, id: Uuid, error: String) {
        self.finish(id, JobStatus::Failed, None, Some(error)).await;
    }

    async fn finish(
        &self,
        id: Uuid,
        status: JobStatus,
        result: Option<IngredientsResult>,
        error: Option<String>,
    ) {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&id) {
            Some(job) => {
                job.status = status;
                job.result = result;
                job.error = error;
                job.finished_at = Some(Utc::now());
            }
            None => tracing::warn!("Tried to finish unknown job {}", id),
        }
    }
}

/// Pending jobs are always kept.
fn prune_finished(jobs: &mut HashMap<Uuid, Job>, now: DateTime<Utc>, retention: TimeDelta) {
    let before = jobs.len();
    jobs.retain(|_, job| match job.finished_at {
        Some(finished_at) => now - finished_at < retention,
        None => true,
    });

    let pruned = before - jobs.len();
    if pruned > 0 {
        tracing::debug!("Pruned {} finished jobs", pruned);
    }
}
