//! Append-only project history.

use super::{HistoryEntryId, ParseHistoryActionError, PhaseId, ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of event recorded in a project's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// The project entered a phase.
    PhaseStarted,
    /// The project left a phase.
    PhaseCompleted,
    /// The project status changed.
    StatusChanged,
    /// The project was created.
    ProjectCreated,
    /// The project finished its last phase.
    ProjectCompleted,
}

impl HistoryAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PhaseStarted => "phase_started",
            Self::PhaseCompleted => "phase_completed",
            Self::StatusChanged => "status_changed",
            Self::ProjectCreated => "project_created",
            Self::ProjectCompleted => "project_completed",
        }
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = ParseHistoryActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phase_started" => Ok(Self::PhaseStarted),
            "phase_completed" => Ok(Self::PhaseCompleted),
            "status_changed" => Ok(Self::StatusChanged),
            "project_created" => Ok(Self::ProjectCreated),
            "project_completed" => Ok(Self::ProjectCompleted),
            _ => Err(ParseHistoryActionError(value.to_owned())),
        }
    }
}

/// A single immutable history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: HistoryEntryId,
    project_id: ProjectId,
    phase_id: Option<PhaseId>,
    action: HistoryAction,
    metadata: Value,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryEntry {
    /// Persisted entry identifier.
    pub id: HistoryEntryId,
    /// Project the entry belongs to.
    pub project_id: ProjectId,
    /// Phase the entry concerns, if any.
    pub phase_id: Option<PhaseId>,
    /// Recorded action.
    pub action: HistoryAction,
    /// Free-form action metadata.
    pub metadata: Value,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Records `action` for `project_id` at the current time.
    #[must_use]
    pub fn record(
        project_id: ProjectId,
        phase_id: Option<PhaseId>,
        action: HistoryAction,
        metadata: Value,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            project_id,
            phase_id,
            action,
            metadata,
            created_at: clock.utc(),
        }
    }

    /// Overrides the entry timestamp, e.g. when importing past events.
    #[must_use]
    pub const fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryEntry) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            phase_id: data.phase_id,
            action: data.action,
            metadata: data.metadata,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the project the entry belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the phase the entry concerns, if any.
    #[must_use]
    pub const fn phase_id(&self) -> Option<PhaseId> {
        self.phase_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the action metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Returns when the action happened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
