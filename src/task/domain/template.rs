//! Task templates attached to phases and jobs.

use super::{TaskDomainError, TaskTemplateId, TimeWindow};
use crate::job::domain::JobId;
use crate::project::domain::PhaseId;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Phase or job a task template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum TemplateParent {
    /// Template of a lifecycle phase.
    Phase(PhaseId),
    /// Template of a recurring job.
    Job(JobId),
}

/// Definition of one task to generate for each generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    id: TaskTemplateId,
    parent: TemplateParent,
    title: String,
    description: Option<String>,
    time_window: Option<TimeWindow>,
    scheduled_time: Option<NaiveTime>,
    order_index: i32,
}

/// Parameter object for reconstructing a persisted task template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskTemplateData {
    /// Persisted template identifier.
    pub id: TaskTemplateId,
    /// Owning phase or job.
    pub parent: TemplateParent,
    /// Title copied onto generated tasks.
    pub title: String,
    /// Description copied onto generated tasks.
    pub description: Option<String>,
    /// Time window copied onto generated tasks.
    pub time_window: Option<TimeWindow>,
    /// Scheduled time copied onto generated tasks.
    pub scheduled_time: Option<NaiveTime>,
    /// Position among the parent's templates.
    pub order_index: i32,
}

impl TaskTemplate {
    /// Creates a task template at `order_index` within `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        parent: TemplateParent,
        title: impl Into<String>,
        order_index: i32,
    ) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            id: TaskTemplateId::new(),
            parent,
            title: trimmed.to_owned(),
            description: None,
            time_window: None,
            scheduled_time: None,
            order_index,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the time window.
    #[must_use]
    pub const fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = Some(time_window);
        self
    }

    /// Sets the scheduled time of day.
    #[must_use]
    pub const fn scheduled_at(mut self, time: NaiveTime) -> Self {
        self.scheduled_time = Some(time);
        self
    }

    /// Reconstructs a template from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskTemplateData) -> Self {
        Self {
            id: data.id,
            parent: data.parent,
            title: data.title,
            description: data.description,
            time_window: data.time_window,
            scheduled_time: data.scheduled_time,
            order_index: data.order_index,
        }
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TaskTemplateId {
        self.id
    }

    /// Returns the owning phase or job.
    #[must_use]
    pub const fn parent(&self) -> TemplateParent {
        self.parent
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the time window, if any.
    #[must_use]
    pub const fn time_window(&self) -> Option<TimeWindow> {
        self.time_window
    }

    /// Returns the scheduled time of day, if any.
    #[must_use]
    pub const fn scheduled_time(&self) -> Option<NaiveTime> {
        self.scheduled_time
    }

    /// Returns the position among the parent's templates.
    #[must_use]
    pub const fn order_index(&self) -> i32 {
        self.order_index
    }
}
