//! Daily and category-driven generation passes over active projects and
//! jobs.

use super::generation::{TaskGenerationError, TaskGenerationResult, TaskGenerationService};
use crate::job::{
    domain::{CategoryKeywords, Job, JobCategory},
    ports::JobRepository,
};
use crate::project::ports::ProjectStore;
use crate::task::{
    domain::{GenerationOwner, Task},
    ports::TaskStore,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// A project or job whose generation failed during a pass.
#[derive(Debug)]
pub struct GenerationFailure {
    /// Owner being generated for.
    pub owner: GenerationOwner,
    /// Failure cause.
    pub error: TaskGenerationError,
}

/// Outcome of one generation pass.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Tasks created by the pass.
    pub tasks: Vec<Task>,
    /// Owners whose generation failed; the rest of the pass still ran.
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    fn absorb(&mut self, owner: GenerationOwner, outcome: TaskGenerationResult<Vec<Task>>) {
        match outcome {
            Ok(tasks) => self.tasks.extend(tasks),
            Err(error) => {
                warn!(owner = %owner, error = %error, "task generation failed");
                self.failures.push(GenerationFailure { owner, error });
            }
        }
    }
}

/// Which active jobs a pass generates for.
#[derive(Debug, Clone, Copy)]
enum JobSelection {
    Every,
    Uncategorized,
}

/// Runs generation across every active project and job.
pub struct DailyTaskOrchestrator<T, P, J, C>
where
    T: TaskStore,
    P: ProjectStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    generation: TaskGenerationService<T, P, J, C>,
    projects: Arc<P>,
    jobs: Arc<J>,
    keywords: CategoryKeywords,
}

impl<T, P, J, C> DailyTaskOrchestrator<T, P, J, C>
where
    T: TaskStore,
    P: ProjectStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new orchestrator over the given stores.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        projects: Arc<P>,
        jobs: Arc<J>,
        clock: Arc<C>,
        keywords: CategoryKeywords,
    ) -> Self {
        let generation = TaskGenerationService::new(
            tasks,
            Arc::clone(&projects),
            Arc::clone(&jobs),
            clock,
        );
        Self {
            generation,
            projects,
            jobs,
            keywords,
        }
    }

    /// Returns the generation service used for single owners.
    #[must_use]
    pub const fn generation(&self) -> &TaskGenerationService<T, P, J, C> {
        &self.generation
    }

    /// Generates tasks for every active project and every active job whose
    /// interval has elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when active projects or jobs cannot
    /// be listed. Per-owner failures are collected in the report.
    pub async fn generate_daily_tasks(
        &self,
        due_date: Option<NaiveDate>,
    ) -> TaskGenerationResult<GenerationReport> {
        let target = self.generation.target_date(due_date);
        let mut report = GenerationReport::default();
        self.generate_for_projects(target, &mut report).await?;
        self.generate_for_jobs(target, JobSelection::Every, &mut report)
            .await?;
        log_report("daily", target, &report);
        Ok(report)
    }

    /// Generates tasks for the active jobs of `category`, ignoring their
    /// intervals.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when active jobs cannot be listed.
    pub async fn generate_tasks_by_category(
        &self,
        category: JobCategory,
        due_date: Option<NaiveDate>,
    ) -> TaskGenerationResult<GenerationReport> {
        let target = self.generation.target_date(due_date);
        let mut report = GenerationReport::default();

        for job in self.jobs.list_active().await? {
            if !self.keywords.matches(&job, category) {
                continue;
            }
            self.warn_if_ambiguous(&job);
            let outcome = self.generation.generate_tasks_for_job_on(&job, target).await;
            report.absorb(GenerationOwner::Job(job.id()), outcome);
        }

        log_report(category.as_str(), target, &report);
        Ok(report)
    }

    /// Generates tasks for every active project and every active job outside
    /// the shop-duty categories, respecting job intervals.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGenerationError`] when active projects or jobs cannot
    /// be listed.
    pub async fn generate_regular_tasks(
        &self,
        due_date: Option<NaiveDate>,
    ) -> TaskGenerationResult<GenerationReport> {
        let target = self.generation.target_date(due_date);
        let mut report = GenerationReport::default();
        self.generate_for_projects(target, &mut report).await?;
        self.generate_for_jobs(target, JobSelection::Uncategorized, &mut report)
            .await?;
        log_report("regular", target, &report);
        Ok(report)
    }

    async fn generate_for_projects(
        &self,
        target: NaiveDate,
        report: &mut GenerationReport,
    ) -> TaskGenerationResult<()> {
        for project in self.projects.list_active().await? {
            if project.current_phase_id().is_none() {
                continue;
            }
            let outcome = self
                .generation
                .generate_tasks_for_project(project.id(), Some(target))
                .await;
            report.absorb(GenerationOwner::Project(project.id()), outcome);
        }
        Ok(())
    }

    async fn generate_for_jobs(
        &self,
        target: NaiveDate,
        selection: JobSelection,
        report: &mut GenerationReport,
    ) -> TaskGenerationResult<()> {
        for job in self.jobs.list_active().await? {
            if matches!(selection, JobSelection::Uncategorized)
                && self.keywords.is_categorized(&job)
            {
                continue;
            }
            let outcome = self
                .generation
                .generate_tasks_for_job(job.id(), Some(target))
                .await;
            report.absorb(GenerationOwner::Job(job.id()), outcome);
        }
        Ok(())
    }

    fn warn_if_ambiguous(&self, job: &Job) {
        if self.keywords.is_ambiguous(job) {
            warn!(
                job_id = %job.id(),
                job_name = job.name(),
                "job name matches every shop-duty category"
            );
        }
    }
}

fn log_report(pass: &str, target: NaiveDate, report: &GenerationReport) {
    info!(
        pass,
        due_date = %target,
        task_count = report.tasks.len(),
        failed = report.failures.len(),
        "task generation pass finished"
    );
}
