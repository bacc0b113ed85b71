//! In-memory repository for recurring jobs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::job::{
    domain::{Job, JobId},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};

/// Thread-safe in-memory job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    state: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> JobRepositoryError {
    JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.state.write().map_err(lock_error)?;
        if jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.state.write().map_err(lock_error)?;
        let slot = jobs
            .get_mut(&job.id())
            .ok_or(JobRepositoryError::NotFound(job.id()))?;
        *slot = job.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let jobs = self.state.read().map_err(lock_error)?;
        Ok(jobs.get(&id).cloned())
    }

    async fn list_active(&self) -> JobRepositoryResult<Vec<Job>> {
        let jobs = self.state.read().map_err(lock_error)?;
        let mut active: Vec<Job> = jobs.values().filter(|job| job.is_active()).cloned().collect();
        active.sort_by_key(|job| (job.created_at(), job.id()));
        Ok(active)
    }
}
