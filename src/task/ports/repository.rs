//! Repository ports for generated tasks and task templates.

use super::TaskFilter;
use crate::task::domain::{
    GenerationKey, GenerationOwner, Task, TaskId, TaskTemplate, TaskTemplateId, TemplateParent,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Claims `key` and inserts `tasks` as one atomic operation.
    ///
    /// Either the claim and every task are stored, or nothing is. The claim
    /// carries the batch's creation time; an empty batch claims nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::AlreadyGenerated`] when the key was
    /// claimed before, or [`TaskRepositoryError::DuplicateTask`] when a task
    /// ID already exists.
    async fn insert_generated(
        &self,
        key: &GenerationKey,
        tasks: &[Task],
    ) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks matching `filter`, ordered by due date, scheduled
    /// time (unscheduled last) and template order.
    async fn find(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the latest due date among the tasks of `owner`.
    async fn latest_due_date(
        &self,
        owner: GenerationOwner,
    ) -> TaskRepositoryResult<Option<NaiveDate>>;
}

/// Task template lookup contract.
#[async_trait]
pub trait TaskTemplateCatalog: Send + Sync {
    /// Stores a new task template.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTemplate`] when the template
    /// ID already exists.
    async fn store_template(&self, template: &TaskTemplate) -> TaskRepositoryResult<()>;

    /// Returns the templates of `parent`, ordered by order index.
    async fn templates_for(&self, parent: TemplateParent)
    -> TaskRepositoryResult<Vec<TaskTemplate>>;
}

/// Combined task persistence surface used by task services.
pub trait TaskStore: TaskRepository + TaskTemplateCatalog {}

impl<T> TaskStore for T where T: TaskRepository + TaskTemplateCatalog {}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The generation pass for this owner and date already ran.
    #[error("tasks already generated for {0}")]
    AlreadyGenerated(GenerationKey),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A task template with the same identifier already exists.
    #[error("duplicate task template identifier: {0}")]
    DuplicateTemplate(TaskTemplateId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
