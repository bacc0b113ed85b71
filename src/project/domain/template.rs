//! Lifecycle templates and their ordered phases.

use super::{ParseTemplateKindError, PhaseId, PhaseOrder, ProjectDomainError, TemplateId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// How projects following a template are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Ordered phases with optional durations.
    Lifecycle,
    /// Repeats every day.
    RecurringDaily,
    /// Repeats every `interval_days`.
    RecurringInterval,
}

impl TemplateKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lifecycle => "lifecycle",
            Self::RecurringDaily => "recurring_daily",
            Self::RecurringInterval => "recurring_interval",
        }
    }
}

impl TryFrom<&str> for TemplateKind {
    type Error = ParseTemplateKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lifecycle" => Ok(Self::Lifecycle),
            "recurring_daily" => Ok(Self::RecurringDaily),
            "recurring_interval" => Ok(Self::RecurringInterval),
            _ => Err(ParseTemplateKindError(value.to_owned())),
        }
    }
}

/// Blueprint that projects instantiate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    id: TemplateId,
    name: String,
    kind: TemplateKind,
    interval_days: Option<u32>,
    created_at: DateTime<Utc>,
}

impl Template {
    /// Creates a new template.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyTemplateName`] when the name is
    /// blank.
    pub fn new(
        name: impl Into<String>,
        kind: TemplateKind,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyTemplateName);
        }
        Ok(Self {
            id: TemplateId::new(),
            name: trimmed.to_owned(),
            kind,
            interval_days: None,
            created_at: clock.utc(),
        })
    }

    /// Sets the recurrence interval for interval templates.
    #[must_use]
    pub const fn with_interval_days(mut self, interval_days: u32) -> Self {
        self.interval_days = Some(interval_days);
        self
    }

    /// Reconstructs a template from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TemplateId,
        name: String,
        kind: TemplateKind,
        interval_days: Option<u32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            interval_days,
            created_at,
        }
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template kind.
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Returns the recurrence interval, if any.
    #[must_use]
    pub const fn interval_days(&self) -> Option<u32> {
        self.interval_days
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered stage of a lifecycle template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    template_id: TemplateId,
    name: String,
    description: Option<String>,
    order: PhaseOrder,
    duration_days: Option<u32>,
    requires_sequential: bool,
}

/// Parameter object for reconstructing a persisted phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPhaseData {
    /// Persisted phase identifier.
    pub id: PhaseId,
    /// Owning template.
    pub template_id: TemplateId,
    /// Persisted display name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Position within the template.
    pub order: PhaseOrder,
    /// Days the phase lasts before auto-advancing, if configured.
    pub duration_days: Option<u32>,
    /// Whether generated tasks must be worked in template order.
    pub requires_sequential: bool,
}

impl Phase {
    /// Creates a phase at `order` within `template_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyPhaseName`] when the name is blank.
    pub fn new(
        template_id: TemplateId,
        name: impl Into<String>,
        order: PhaseOrder,
    ) -> Result<Self, ProjectDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyPhaseName);
        }
        Ok(Self {
            id: PhaseId::new(),
            template_id,
            name: trimmed.to_owned(),
            description: None,
            order,
            duration_days: None,
            requires_sequential: false,
        })
    }

    /// Sets the phase description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets how many days the phase lasts.
    #[must_use]
    pub const fn with_duration_days(mut self, duration_days: u32) -> Self {
        self.duration_days = Some(duration_days);
        self
    }

    /// Requires generated tasks to be worked in template order.
    #[must_use]
    pub const fn requiring_sequential(mut self) -> Self {
        self.requires_sequential = true;
        self
    }

    /// Reconstructs a phase from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPhaseData) -> Self {
        Self {
            id: data.id,
            template_id: data.template_id,
            name: data.name,
            description: data.description,
            order: data.order,
            duration_days: data.duration_days,
            requires_sequential: data.requires_sequential,
        }
    }

    /// Returns the phase identifier.
    #[must_use]
    pub const fn id(&self) -> PhaseId {
        self.id
    }

    /// Returns the owning template.
    #[must_use]
    pub const fn template_id(&self) -> TemplateId {
        self.template_id
    }

    /// Returns the phase name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the phase description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the position within the template.
    #[must_use]
    pub const fn order(&self) -> PhaseOrder {
        self.order
    }

    /// Returns the configured duration, if any.
    #[must_use]
    pub const fn duration_days(&self) -> Option<u32> {
        self.duration_days
    }

    /// Returns the duration after which the phase auto-advances.
    ///
    /// A zero duration counts as not configured.
    #[must_use]
    pub fn auto_advance_after_days(&self) -> Option<u32> {
        self.duration_days.filter(|days| *days > 0)
    }

    /// Returns whether generated tasks must be worked in template order.
    #[must_use]
    pub const fn requires_sequential(&self) -> bool {
        self.requires_sequential
    }
}
