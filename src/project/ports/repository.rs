//! Repository ports for projects, their templates, and their history.

use crate::project::domain::{
    HistoryAction, HistoryEntry, HistoryEntryId, Phase, PhaseId, PhaseOrder, Project, ProjectId,
    Template, TemplateId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the project
    /// ID already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns every active project, oldest start first.
    async fn list_active(&self) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Template and phase lookup contract.
#[async_trait]
pub trait PhaseCatalog: Send + Sync {
    /// Stores a new template.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateTemplate`] when the
    /// template ID already exists.
    async fn store_template(&self, template: &Template) -> ProjectRepositoryResult<()>;

    /// Stores a new phase.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::UnknownTemplate`] when the owning
    /// template is missing, [`ProjectRepositoryError::DuplicatePhase`] when
    /// the phase ID exists, or [`ProjectRepositoryError::DuplicatePhaseOrder`]
    /// when the template already has a phase at the same order.
    async fn store_phase(&self, phase: &Phase) -> ProjectRepositoryResult<()>;

    /// Finds a template by identifier.
    async fn find_template(&self, id: TemplateId) -> ProjectRepositoryResult<Option<Template>>;

    /// Finds a phase by identifier.
    async fn find_phase(&self, id: PhaseId) -> ProjectRepositoryResult<Option<Phase>>;

    /// Returns the phase with the smallest order in `template_id`.
    async fn first_phase(&self, template_id: TemplateId) -> ProjectRepositoryResult<Option<Phase>>;

    /// Returns the phase of `template_id` with the smallest order strictly
    /// greater than `after`.
    async fn next_phase(
        &self,
        template_id: TemplateId,
        after: PhaseOrder,
    ) -> ProjectRepositoryResult<Option<Phase>>;
}

/// Append-only project history contract.
#[async_trait]
pub trait ProjectHistoryLog: Send + Sync {
    /// Appends a history entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateHistoryEntry`] when the
    /// entry ID already exists.
    async fn append(&self, entry: &HistoryEntry) -> ProjectRepositoryResult<()>;

    /// Returns the newest entry recording `action` for `phase_id` within
    /// `project_id`.
    async fn latest(
        &self,
        project_id: ProjectId,
        phase_id: PhaseId,
        action: HistoryAction,
    ) -> ProjectRepositoryResult<Option<HistoryEntry>>;

    /// Returns every entry of `project_id`, newest first.
    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<Vec<HistoryEntry>>;
}

/// Combined project persistence surface used by project services.
pub trait ProjectStore: ProjectRepository + PhaseCatalog + ProjectHistoryLog {}

impl<T> ProjectStore for T where T: ProjectRepository + PhaseCatalog + ProjectHistoryLog {}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// A template with the same identifier already exists.
    #[error("duplicate template identifier: {0}")]
    DuplicateTemplate(TemplateId),

    /// A phase with the same identifier already exists.
    #[error("duplicate phase identifier: {0}")]
    DuplicatePhase(PhaseId),

    /// The template already has a phase at this order.
    #[error("template {template_id} already has a phase at order {order}")]
    DuplicatePhaseOrder {
        /// Owning template.
        template_id: TemplateId,
        /// Conflicting order.
        order: PhaseOrder,
    },

    /// A history entry with the same identifier already exists.
    #[error("duplicate history entry identifier: {0}")]
    DuplicateHistoryEntry(HistoryEntryId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The referenced template was not found.
    #[error("template not found: {0}")]
    UnknownTemplate(TemplateId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
