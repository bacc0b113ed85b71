//! Error types for job domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing job domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The job name is empty after trimming.
    #[error("job name must not be empty")]
    EmptyJobName,

    /// A category keyword list contains no usable keyword.
    #[error("category '{0}' must define at least one keyword")]
    EmptyCategoryKeywords(String),
}

/// Error returned while parsing job statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

/// Error returned while parsing job categories.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job category: {0}")]
pub struct ParseJobCategoryError(pub String);
