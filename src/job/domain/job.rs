//! Job aggregate root and its recurrence rule.

use super::{JobCategory, JobDomainError, JobId, ParseJobStatusError};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Job activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The job takes part in task generation.
    Active,
    /// The job is switched off and never generates tasks.
    Inactive,
}

impl JobStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}

/// Recurring job aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    name: String,
    description: Option<String>,
    interval_days: u32,
    status: JobStatus,
    requires_sequential: bool,
    category: Option<JobCategory>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted display name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted generation interval in days.
    pub interval_days: u32,
    /// Persisted activation status.
    pub status: JobStatus,
    /// Whether generated tasks must be worked in template order.
    pub requires_sequential: bool,
    /// Explicit category, if one was declared.
    pub category: Option<JobCategory>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new active job.
    ///
    /// An `interval_days` of zero makes the job due on every run.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyJobName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        interval_days: u32,
        clock: &impl Clock,
    ) -> Result<Self, JobDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JobDomainError::EmptyJobName);
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: JobId::new(),
            name: trimmed.to_owned(),
            description: None,
            interval_days,
            status: JobStatus::Active,
            requires_sequential: false,
            category: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Sets the job description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares the job's shop-duty category explicitly.
    #[must_use]
    pub const fn with_category(mut self, category: JobCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Requires generated tasks to be worked in template order.
    #[must_use]
    pub const fn requiring_sequential(mut self) -> Self {
        self.requires_sequential = true;
        self
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            interval_days: data.interval_days,
            status: data.status,
            requires_sequential: data.requires_sequential,
            category: data.category,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the job name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the job description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the generation interval in days.
    #[must_use]
    pub const fn interval_days(&self) -> u32 {
        self.interval_days
    }

    /// Returns the activation status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns `true` when the job takes part in generation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, JobStatus::Active)
    }

    /// Returns whether generated tasks must be worked in template order.
    #[must_use]
    pub const fn requires_sequential(&self) -> bool {
        self.requires_sequential
    }

    /// Returns the explicitly declared category, if any.
    #[must_use]
    pub const fn category(&self) -> Option<JobCategory> {
        self.category
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

    /// Decides whether the job is due on `target` given the due date of the
    /// most recent generation.
    ///
    /// A job that has never generated is always due. Otherwise the whole
    /// days between the last generation and `target` must reach the
    /// interval.
    #[must_use]
    pub fn is_due_on(&self, target: NaiveDate, last_generated: Option<NaiveDate>) -> bool {
        last_generated.is_none_or(|last| {
            target.signed_duration_since(last).num_days() >= i64::from(self.interval_days)
        })
    }

    /// Switches the job on.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.status = JobStatus::Active;
        self.touch(clock);
    }

    /// Switches the job off.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.status = JobStatus::Inactive;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
