//! Error types for project domain validation and parsing.

use super::{PhaseId, ProjectId, ProjectStatus, TemplateId};
use thiserror::Error;

/// Errors returned while constructing or mutating project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The template name is empty after trimming.
    #[error("template name must not be empty")]
    EmptyTemplateName,

    /// The phase name is empty after trimming.
    #[error("phase name must not be empty")]
    EmptyPhaseName,

    /// The requested status change is not permitted.
    #[error("invalid status transition for project {project_id}: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        /// Project being transitioned.
        project_id: ProjectId,
        /// Current status.
        from: ProjectStatus,
        /// Requested status.
        to: ProjectStatus,
    },

    /// The phase does not belong to the project's template.
    #[error("phase {phase_id} does not belong to template {template_id}")]
    PhaseNotInTemplate {
        /// Offending phase.
        phase_id: PhaseId,
        /// Template the project follows.
        template_id: TemplateId,
    },

    /// The project has no template, so it has no phases to enter.
    #[error("project {0} has no lifecycle template")]
    MissingTemplate(ProjectId),
}

/// Error returned while parsing project statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error returned while parsing history actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown history action: {0}")]
pub struct ParseHistoryActionError(pub String);

/// Error returned while parsing template kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown template kind: {0}")]
pub struct ParseTemplateKindError(pub String);
