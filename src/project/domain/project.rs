//! Project aggregate root and lifecycle status.

use super::{ParseProjectStatusError, PhaseId, ProjectDomainError, ProjectId, TemplateId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// The project is running and takes part in generation and advancement.
    Active,
    /// The project is on hold.
    Paused,
    /// The project finished its last phase.
    Completed,
    /// The project was abandoned.
    Cancelled,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for statuses that permit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` when a project may move from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Paused | Self::Completed | Self::Cancelled)
                | (Self::Paused, Self::Active | Self::Completed | Self::Cancelled)
        )
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// Returns the whole days elapsed between `from` and `to`, rounding down.
///
/// The result is negative when `to` precedes `from`.
#[must_use]
pub fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    to.signed_duration_since(from)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Lifecycle project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    template_id: Option<TemplateId>,
    current_phase_id: Option<PhaseId>,
    status: ProjectStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted display name.
    pub name: String,
    /// Lifecycle template the project follows, if any.
    pub template_id: Option<TemplateId>,
    /// Phase the project is currently in, if any.
    pub current_phase_id: Option<PhaseId>,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// When the project started.
    pub started_at: DateTime<Utc>,
    /// When the project completed, if it has.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new active project starting now.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] when the name is
    /// blank.
    pub fn new(
        name: impl Into<String>,
        template_id: Option<TemplateId>,
        current_phase_id: Option<PhaseId>,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyProjectName);
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: ProjectId::new(),
            name: trimmed.to_owned(),
            template_id,
            current_phase_id,
            status: ProjectStatus::Active,
            started_at: timestamp,
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Backdates the project start, e.g. when registering a running batch.
    #[must_use]
    pub const fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            template_id: data.template_id,
            current_phase_id: data.current_phase_id,
            status: data.status,
            started_at: data.started_at,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle template, if any.
    #[must_use]
    pub const fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    /// Returns the current phase, if any.
    #[must_use]
    pub const fn current_phase_id(&self) -> Option<PhaseId> {
        self.current_phase_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns `true` while the project is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, ProjectStatus::Active)
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the completion timestamp, if the project completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the project into `phase_id`.
    ///
    /// Template membership is validated by the caller, which owns the phase
    /// catalogue.
    pub fn enter_phase(&mut self, phase_id: PhaseId, clock: &impl Clock) {
        self.current_phase_id = Some(phase_id);
        self.touch(clock);
    }

    /// Transitions the project to `target`.
    ///
    /// Completing stamps the completion timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidStatusTransition`] when the
    /// transition is not permitted from the current status.
    pub fn transition_to(
        &mut self,
        target: ProjectStatus,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(ProjectDomainError::InvalidStatusTransition {
                project_id: self.id,
                from: self.status,
                to: target,
            });
        }
        let timestamp = clock.utc();
        self.status = target;
        if matches!(target, ProjectStatus::Completed) {
            self.completed_at = Some(timestamp);
        }
        self.updated_at = timestamp;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
