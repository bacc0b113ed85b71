//! Service layer for working through generated tasks.

use crate::task::{
    domain::{OperatorId, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for changing a task status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    status: String,
    actor: Option<OperatorId>,
    notes: Option<String>,
}

impl UpdateTaskStatusRequest {
    /// Creates a request moving `task_id` to the named status.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
            actor: None,
            notes: None,
        }
    }

    /// Records who performed the change.
    #[must_use]
    pub const fn with_actor(mut self, actor: OperatorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches completion notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for task progress operations.
#[derive(Debug, Error)]
pub enum TaskProgressError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The requested status name is unknown.
    #[error("unknown task status: {0}")]
    InvalidStatus(String),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// An earlier task of a sequential batch is still open.
    #[error("task {task_id} is blocked by unfinished task {blocked_by}")]
    OutOfSequence {
        /// Task that was to be worked.
        task_id: TaskId,
        /// Earliest unfinished predecessor.
        blocked_by: TaskId,
    },
}

/// Result type for task progress operations.
pub type TaskProgressResult<T> = Result<T, TaskProgressError>;

/// Task progress service.
#[derive(Clone)]
pub struct TaskProgressService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskProgressService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task progress service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Moves a task to a new status.
    ///
    /// Tasks of a sequential batch may only be started or completed once
    /// every lower-sequence sibling on the same due date is finished.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProgressError`] when the status name is unknown, the
    /// task is missing, the transition is not permitted, a predecessor is
    /// unfinished, or persistence fails.
    pub async fn update_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> TaskProgressResult<Task> {
        let target = TaskStatus::try_from(request.status.as_str())
            .map_err(|err| TaskProgressError::InvalidStatus(err.0))?;
        let mut task = self
            .repository
            .find_by_id(request.task_id)
            .await?
            .ok_or(TaskProgressError::NotFound(request.task_id))?;

        if task.is_sequential() && matches!(target, TaskStatus::InProgress | TaskStatus::Completed)
        {
            self.ensure_predecessors_finished(&task).await?;
        }

        let previous = task.status();
        task.transition_to(target, request.actor, &*self.clock)?;
        if let Some(notes) = request.notes {
            task.record_notes(notes, &*self.clock);
        }
        self.repository.update(&task).await?;

        info!(
            task_id = %task.id(),
            from = previous.as_str(),
            to = target.as_str(),
            "task status changed"
        );
        Ok(task)
    }

    /// Lists tasks matching `filter` in schedule order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProgressError::Repository`] when lookup fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskProgressResult<Vec<Task>> {
        Ok(self.repository.find(filter).await?)
    }

    async fn ensure_predecessors_finished(&self, task: &Task) -> TaskProgressResult<()> {
        let siblings = TaskFilter::new()
            .for_owner(task.owner().generation_owner())
            .due_on(task.due_date());
        let blocker = self
            .repository
            .find(&siblings)
            .await?
            .into_iter()
            .filter(|sibling| sibling.sequence() < task.sequence() && !sibling.status().is_final())
            .min_by_key(Task::sequence);

        match blocker {
            Some(blocking) => Err(TaskProgressError::OutOfSequence {
                task_id: task.id(),
                blocked_by: blocking.id(),
            }),
            None => Ok(()),
        }
    }
}
