//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus, TaskTemplateId};
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A template was used to generate tasks for an owner of another kind.
    #[error("task template {0} does not belong to the generating owner")]
    TemplateOwnerMismatch(TaskTemplateId),

    /// The requested status change is not permitted.
    #[error("invalid status transition for task {task_id}: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing time windows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown time window: {0}")]
pub struct ParseTimeWindowError(pub String);
