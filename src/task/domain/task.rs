//! Task aggregate root and its status lifecycle.

use super::{
    GenerationOwner, OperatorId, ParseTaskStatusError, TaskDomainError, TaskId, TaskOwner,
    TaskTemplate, TemplateParent, TimeWindow,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Task work status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Generated and waiting to be worked.
    Pending,
    /// Being worked.
    InProgress,
    /// Done.
    Completed,
    /// Deliberately not done.
    Skipped,
    /// Withdrawn.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for statuses that permit no further transitions.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped | Self::Cancelled)
    }

    /// Returns `true` when a task may move from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::InProgress | Self::Completed | Self::Skipped | Self::Cancelled
            ) | (
                Self::InProgress,
                Self::Pending | Self::Completed | Self::Skipped | Self::Cancelled
            )
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: TaskOwner,
    title: String,
    description: Option<String>,
    time_window: Option<TimeWindow>,
    scheduled_time: Option<NaiveTime>,
    sequence: i32,
    sequential: bool,
    due_date: NaiveDate,
    status: TaskStatus,
    completion_notes: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    completed_by: Option<OperatorId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owner and template provenance.
    pub owner: TaskOwner,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted time window, if any.
    pub time_window: Option<TimeWindow>,
    /// Persisted scheduled time, if any.
    pub scheduled_time: Option<NaiveTime>,
    /// Order index of the source template.
    pub sequence: i32,
    /// Whether lower-sequence siblings must be finished first.
    pub sequential: bool,
    /// Day the task is due.
    pub due_date: NaiveDate,
    /// Persisted work status.
    pub status: TaskStatus,
    /// Notes left when the task was worked.
    pub completion_notes: Option<String>,
    /// When the task was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Who completed the task.
    pub completed_by: Option<OperatorId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialises a pending task from `template` for `owner` on
    /// `due_date`.
    ///
    /// Title, description, time window and scheduled time are copied from
    /// the template; `sequential` snapshots the parent's ordering rule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TemplateOwnerMismatch`] when the template
    /// belongs to an owner of the other kind.
    pub fn generate(
        owner: GenerationOwner,
        template: &TaskTemplate,
        due_date: NaiveDate,
        sequential: bool,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let task_owner = match (owner, template.parent()) {
            (GenerationOwner::Project(project_id), TemplateParent::Phase(_)) => TaskOwner::Project {
                project_id,
                phase_task_id: template.id(),
            },
            (GenerationOwner::Job(job_id), TemplateParent::Job(parent_job))
                if parent_job == job_id =>
            {
                TaskOwner::Job {
                    job_id,
                    job_task_id: template.id(),
                }
            }
            _ => return Err(TaskDomainError::TemplateOwnerMismatch(template.id())),
        };
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            owner: task_owner,
            title: template.title().to_owned(),
            description: template.description().map(str::to_owned),
            time_window: template.time_window(),
            scheduled_time: template.scheduled_time(),
            sequence: template.order_index(),
            sequential,
            due_date,
            status: TaskStatus::Pending,
            completion_notes: None,
            completed_at: None,
            completed_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            time_window: data.time_window,
            scheduled_time: data.scheduled_time,
            sequence: data.sequence,
            sequential: data.sequential,
            due_date: data.due_date,
            status: data.status,
            completion_notes: data.completion_notes,
            completed_at: data.completed_at,
            completed_by: data.completed_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owner and template provenance.
    #[must_use]
    pub const fn owner(&self) -> &TaskOwner {
        &self.owner
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

    /// Returns the order index of the source template.
    #[must_use]
    pub const fn sequence(&self) -> i32 {
        self.sequence
    }

    /// Returns whether lower-sequence siblings must be finished first.
    #[must_use]
    pub const fn is_sequential(&self) -> bool {
        self.sequential
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the work status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the completion notes, if any.
    #[must_use]
    pub fn completion_notes(&self) -> Option<&str> {
        self.completion_notes.as_deref()
    }

    /// Returns when the task was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns who completed the task.
    #[must_use]
    pub const fn completed_by(&self) -> Option<OperatorId> {
        self.completed_by
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

    /// Transitions the task to `target`.
    ///
    /// Completing stamps the completion time and the acting operator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the
    /// transition is not permitted from the current status.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        actor: Option<OperatorId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        let timestamp = clock.utc();
        self.status = target;
        if matches!(target, TaskStatus::Completed) {
            self.completed_at = Some(timestamp);
            self.completed_by = actor;
        }
        self.updated_at = timestamp;
        Ok(())
    }

    /// Stores notes about how the task was worked.
    pub fn record_notes(&mut self, notes: impl Into<String>, clock: &impl Clock) {
        self.completion_notes = Some(notes.into());
        self.updated_at = clock.utc();
    }

    /// Orders tasks by due date, then scheduled time with unscheduled
    /// tasks last, then template order.
    #[must_use]
    pub fn cmp_schedule(&self, other: &Self) -> Ordering {
        self.due_date
            .cmp(&other.due_date)
            .then_with(|| match (self.scheduled_time, other.scheduled_time) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}
