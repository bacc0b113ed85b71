//! Domain model for lifecycle projects.
//!
//! Phase ordering is the sequencing contract: a project only ever moves to
//! the phase with the next larger order index of its template, or
//! completes when none is left.

mod error;
mod history;
mod ids;
mod project;
mod template;

pub use error::{
    ParseHistoryActionError, ParseProjectStatusError, ParseTemplateKindError, ProjectDomainError,
};
pub use history::{HistoryAction, HistoryEntry, PersistedHistoryEntry};
pub use ids::{HistoryEntryId, PhaseId, PhaseOrder, ProjectId, TemplateId};
pub use project::{PersistedProjectData, Project, ProjectStatus, whole_days_between};
pub use template::{Phase, PersistedPhaseData, Template, TemplateKind};
