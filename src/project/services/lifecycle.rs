//! Service layer for manual project lifecycle operations.

use crate::project::{
    domain::{
        HistoryAction, HistoryEntry, Phase, PhaseId, Project, ProjectDomainError, ProjectId,
        ProjectStatus, TemplateId,
    },
    ports::{ProjectRepositoryError, ProjectStore},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    template_id: Option<TemplateId>,
    phase_id: Option<PhaseId>,
    started_at: Option<DateTime<Utc>>,
}

impl CreateProjectRequest {
    /// Creates a request for a project without a template.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_id: None,
            phase_id: None,
            started_at: None,
        }
    }

    /// Sets the lifecycle template the project follows.
    #[must_use]
    pub const fn with_template(mut self, template_id: TemplateId) -> Self {
        self.template_id = Some(template_id);
        self
    }

    /// Starts the project in `phase_id` instead of the template's first
    /// phase.
    #[must_use]
    pub const fn with_initial_phase(mut self, phase_id: PhaseId) -> Self {
        self.phase_id = Some(phase_id);
        self
    }

    /// Backdates the project start.
    #[must_use]
    pub const fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }
}

/// Request payload for changing a project status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeProjectStatusRequest {
    project_id: ProjectId,
    status: String,
}

impl ChangeProjectStatusRequest {
    /// Creates a request moving `project_id` to the named status.
    #[must_use]
    pub fn new(project_id: ProjectId, status: impl Into<String>) -> Self {
        Self {
            project_id,
            status: status.into(),
        }
    }
}

/// Service-level errors for project lifecycle operations.
#[derive(Debug, Error)]
pub enum ProjectLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// The requested status name is unknown.
    #[error("unknown project status: {0}")]
    InvalidStatus(String),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The phase does not exist.
    #[error("phase not found: {0}")]
    PhaseNotFound(PhaseId),
    /// The template does not exist.
    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),
}

/// Result type for project lifecycle service operations.
pub type ProjectLifecycleResult<T> = Result<T, ProjectLifecycleError>;

/// Project lifecycle orchestration service.
#[derive(Clone)]
pub struct ProjectLifecycleService<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> ProjectLifecycleService<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a new project lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a project, placing it in its initial phase.
    ///
    /// Without an explicit initial phase the template's first phase is
    /// used. History records the initial phase start followed by the
    /// creation itself.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the template or phase is
    /// unknown, the phase belongs to another template, or persistence
    /// fails.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> ProjectLifecycleResult<Project> {
        let initial_phase = match (request.template_id, request.phase_id) {
            (Some(template_id), requested) => {
                self.store
                    .find_template(template_id)
                    .await?
                    .ok_or(ProjectLifecycleError::TemplateNotFound(template_id))?;
                match requested {
                    Some(phase_id) => Some(self.phase_in_template(template_id, phase_id).await?),
                    None => self.store.first_phase(template_id).await?,
                }
            }
            (None, Some(phase_id)) => {
                return Err(ProjectLifecycleError::PhaseNotFound(phase_id));
            }
            (None, None) => None,
        };

        let mut project = Project::new(
            request.name,
            request.template_id,
            initial_phase.as_ref().map(Phase::id),
            &*self.clock,
        )?;
        if let Some(started_at) = request.started_at {
            project = project.with_started_at(started_at);
        }
        self.store.store(&project).await?;

        if let Some(phase) = &initial_phase {
            self.record(
                &project,
                Some(phase.id()),
                HistoryAction::PhaseStarted,
                json!({ "initial_phase": true }),
            )
            .await?;
        }
        self.record(
            &project,
            None,
            HistoryAction::ProjectCreated,
            json!({ "template_id": request.template_id }),
        )
        .await?;

        info!(project_id = %project.id(), "project created");
        Ok(project)
    }

    /// Moves a project to `phase_id` by hand.
    ///
    /// Returns the project unchanged when it already is in that phase.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the project or phase is
    /// unknown, the phase belongs to another template, or persistence
    /// fails.
    pub async fn change_phase(
        &self,
        project_id: ProjectId,
        phase_id: PhaseId,
    ) -> ProjectLifecycleResult<Project> {
        let mut project = self.load(project_id).await?;
        if project.current_phase_id() == Some(phase_id) {
            return Ok(project);
        }
        let template_id = project
            .template_id()
            .ok_or(ProjectDomainError::MissingTemplate(project_id))?;
        self.phase_in_template(template_id, phase_id).await?;

        let previous = project.current_phase_id();
        project.enter_phase(phase_id, &*self.clock);
        self.store.update(&project).await?;

        if let Some(previous_phase) = previous {
            self.record(
                &project,
                Some(previous_phase),
                HistoryAction::PhaseCompleted,
                json!({ "manual_change": true }),
            )
            .await?;
        }
        self.record(
            &project,
            Some(phase_id),
            HistoryAction::PhaseStarted,
            json!({ "manual_change": true }),
        )
        .await?;

        info!(project_id = %project_id, phase_id = %phase_id, "project phase changed");
        Ok(project)
    }

    /// Changes a project status by hand.
    ///
    /// Returns the project unchanged when it already has that status.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when the status name is unknown, the
    /// transition is not permitted, the project is missing, or persistence
    /// fails.
    pub async fn change_status(
        &self,
        request: ChangeProjectStatusRequest,
    ) -> ProjectLifecycleResult<Project> {
        let target = ProjectStatus::try_from(request.status.as_str())
            .map_err(|err| ProjectLifecycleError::InvalidStatus(err.0))?;
        let mut project = self.load(request.project_id).await?;
        let previous = project.status();
        if previous == target {
            return Ok(project);
        }

        project.transition_to(target, &*self.clock)?;
        self.store.update(&project).await?;
        self.record(
            &project,
            None,
            HistoryAction::StatusChanged,
            json!({
                "old_status": previous.as_str(),
                "new_status": target.as_str(),
                "manual_change": true,
            }),
        )
        .await?;

        info!(
            project_id = %project.id(),
            from = previous.as_str(),
            to = target.as_str(),
            "project status changed"
        );
        Ok(project)
    }

    /// Returns a project's history, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when lookup fails.
    pub async fn history(
        &self,
        project_id: ProjectId,
    ) -> ProjectLifecycleResult<Vec<HistoryEntry>> {
        Ok(self.store.list_for_project(project_id).await?)
    }

    async fn load(&self, project_id: ProjectId) -> ProjectLifecycleResult<Project> {
        self.store
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectLifecycleError::ProjectNotFound(project_id))
    }

    async fn phase_in_template(
        &self,
        template_id: TemplateId,
        phase_id: PhaseId,
    ) -> ProjectLifecycleResult<Phase> {
        let phase = self
            .store
            .find_phase(phase_id)
            .await?
            .ok_or(ProjectLifecycleError::PhaseNotFound(phase_id))?;
        if phase.template_id() != template_id {
            return Err(ProjectDomainError::PhaseNotInTemplate {
                phase_id,
                template_id,
            }
            .into());
        }
        Ok(phase)
    }

    async fn record(
        &self,
        project: &Project,
        phase_id: Option<PhaseId>,
        action: HistoryAction,
        metadata: serde_json::Value,
    ) -> ProjectLifecycleResult<()> {
        let entry = HistoryEntry::record(project.id(), phase_id, action, metadata, &*self.clock);
        self.store.append(&entry).await?;
        Ok(())
    }
}
