//! Materialises dated tasks from phase and job task templates.

use crate::job::{
    domain::{Job, JobId},
    ports::{JobRepository, JobRepositoryError},
};
use crate::project::{
    domain::{PhaseId, ProjectId},
    ports::{ProjectRepositoryError, ProjectStore},
};
use crate::task::{
    domain::{GenerationKey, GenerationOwner, Task, TaskDomainError, TemplateParent},
    ports::{TaskFilter, TaskRepositoryError, TaskStore},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for task generation.
#[derive(Debug, Error)]
pub enum TaskGenerationError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Project lookup failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    /// Job lookup failed.
    #[error(transparent)]
    Job(#[from] JobRepositoryError),
}

/// Result type for task generation operations.
pub type TaskGenerationResult<T> = Result<T, TaskGenerationError>;

/// Generates the tasks of projects and jobs for one due date.
///
/// Missing owners and policy skips yield an empty list rather than an
/// error. Every batch is inserted atomically together with its generation
/// claim, so a repeated pass for the same owner and date creates nothing.
pub struct TaskGenerationService<T, P, J, C>
where
    T: TaskStore,
    P: ProjectStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    jobs: Arc<J>,
    clock: Arc<C>,
}

impl<T, P, J, C> Clone for TaskGenerationService<T, P, J, C>
where
    T: TaskStore,
    P: ProjectStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            projects: Arc::clone(&self.projects),
            jobs: Arc::clone(&self.jobs),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, P, J, C> TaskGenerationService<T, P, J, C>
where
    T: TaskStore,
    P: ProjectStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new generation service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, jobs: Arc<J>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            jobs,
            clock,
        }
    }

    /// Returns `due_date`, defaulting to today's UTC date.
    #[must_use]
    pub fn target_date(&self, due_date: Option<NaiveDate>) -> NaiveDate {
        due_date.unwrap_or_else(|| self.clock.utc().date_naive())
    }

    /// Generates the tasks of `phase_id` for `project_id` on `due_date`.
    ///
    /// A missing phase or a phase without task templates yields no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when a lookup or the batch insert
    /// fails. No task of the batch is stored in that case.
    pub async fn generate_tasks_from_phase(
        &self,
        project_id: ProjectId,
        phase_id: PhaseId,
        due_date: NaiveDate,
    ) -> TaskGenerationResult<Vec<Task>> {
        let Some(phase) = self.projects.find_phase(phase_id).await? else {
            debug!(
                project_id = %project_id,
                phase_id = %phase_id,
                "phase not found, nothing to generate"
            );
            return Ok(Vec::new());
        };
        self.materialise(
            GenerationOwner::Project(project_id),
            TemplateParent::Phase(phase_id),
            due_date,
            phase.requires_sequential(),
        )
        .await
    }

    /// Generates the current phase's tasks for a project unless the project
    /// already has tasks on the target date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when a lookup or the batch insert
    /// fails.
    pub async fn generate_tasks_for_project(
        &self,
        project_id: ProjectId,
        due_date: Option<NaiveDate>,
    ) -> TaskGenerationResult<Vec<Task>> {
        let target = self.target_date(due_date);
        let Some(project) = self.projects.find_by_id(project_id).await? else {
            debug!(project_id = %project_id, "project not found, nothing to generate");
            return Ok(Vec::new());
        };
        let Some(phase_id) = project.current_phase_id() else {
            debug!(project_id = %project_id, "project has no current phase");
            return Ok(Vec::new());
        };
        let owner = GenerationOwner::Project(project_id);
        if self.has_tasks_on(owner, target).await? {
            debug!(project_id = %project_id, due_date = %target, "project tasks already exist");
            return Ok(Vec::new());
        }
        self.generate_tasks_from_phase(project_id, phase_id, target)
            .await
    }

    /// Generates the tasks of `job_id` on `due_date` without consulting the
    /// interval.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when a lookup or the batch insert
    /// fails.
    pub async fn generate_tasks_from_job(
        &self,
        job_id: JobId,
        due_date: NaiveDate,
    ) -> TaskGenerationResult<Vec<Task>> {
        let Some(job) = self.jobs.find_by_id(job_id).await? else {
            debug!(job_id = %job_id, "job not found, nothing to generate");
            return Ok(Vec::new());
        };
        self.materialise_job(&job, due_date).await
    }

    /// Generates a job's tasks when the job is active and its interval has
    /// elapsed since the latest generated due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when a lookup or the batch insert
    /// fails.
    pub async fn generate_tasks_for_job(
        &self,
        job_id: JobId,
        due_date: Option<NaiveDate>,
    ) -> TaskGenerationResult<Vec<Task>> {
        let target = self.target_date(due_date);
        let Some(job) = self.jobs.find_by_id(job_id).await? else {
            debug!(job_id = %job_id, "job not found, nothing to generate");
            return Ok(Vec::new());
        };
        if !job.is_active() {
            debug!(job_id = %job_id, "job inactive, nothing to generate");
            return Ok(Vec::new());
        }

        let owner = GenerationOwner::Job(job_id);
        let last_generated = self.tasks.latest_due_date(owner).await?;
        if !job.is_due_on(target, last_generated) {
            debug!(
                job_id = %job_id,
                due_date = %target,
                interval_days = job.interval_days(),
                "job interval has not elapsed"
            );
            return Ok(Vec::new());
        }
        self.generate_tasks_for_job_on(&job, target).await
    }

    /// Generates a job's tasks on `due_date` unless tasks already exist for
    /// that date. The job's interval is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when a lookup or the batch insert
    /// fails.
    pub async fn generate_tasks_for_job_on(
        &self,
        job: &Job,
        due_date: NaiveDate,
    ) -> TaskGenerationResult<Vec<Task>> {
        if self
            .has_tasks_on(GenerationOwner::Job(job.id()), due_date)
            .await?
        {
            debug!(job_id = %job.id(), due_date = %due_date, "job tasks already exist");
            return Ok(Vec::new());
        }
        self.materialise_job(job, due_date).await
    }

    async fn materialise_job(
        &self,
        job: &Job,
        due_date: NaiveDate,
    ) -> TaskGenerationResult<Vec<Task>> {
        self.materialise(
            GenerationOwner::Job(job.id()),
            TemplateParent::Job(job.id()),
            due_date,
            job.requires_sequential(),
        )
        .await
    }

    async fn has_tasks_on(
        &self,
        owner: GenerationOwner,
        due_date: NaiveDate,
    ) -> TaskGenerationResult<bool> {
        let filter = TaskFilter::new().for_owner(owner).due_on(due_date).limit(1);
        Ok(!self.tasks.find(&filter).await?.is_empty())
    }

    async fn materialise(
        &self,
        owner: GenerationOwner,
        parent: TemplateParent,
        due_date: NaiveDate,
        sequential: bool,
    ) -> TaskGenerationResult<Vec<Task>> {
        let templates = self.tasks.templates_for(parent).await?;
        if templates.is_empty() {
            debug!(owner = %owner, due_date = %due_date, "no task templates");
            return Ok(Vec::new());
        }

        let batch = templates
            .iter()
            .map(|template| Task::generate(owner, template, due_date, sequential, &*self.clock))
            .collect::<Result<Vec<_>, _>>()?;
        let key = GenerationKey::new(owner, due_date);

        match self.tasks.insert_generated(&key, &batch).await {
            Ok(()) => {
                info!(
                    owner = %owner,
                    due_date = %due_date,
                    task_count = batch.len(),
                    "tasks generated"
                );
                Ok(batch)
            }
            Err(TaskRepositoryError::AlreadyGenerated(claimed)) => {
                debug!(key = %claimed, "generation already claimed");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }
}
