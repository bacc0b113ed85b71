//! Task ownership and generation keys.

use super::TaskTemplateId;
use crate::job::domain::JobId;
use crate::project::domain::ProjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Owner of a generated task together with the template it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOwner {
    /// Task generated from a phase task template of a project.
    Project {
        /// Owning project.
        project_id: ProjectId,
        /// Phase task template the task was generated from.
        phase_task_id: TaskTemplateId,
    },
    /// Task generated from a job task template.
    Job {
        /// Owning job.
        job_id: JobId,
        /// Job task template the task was generated from.
        job_task_id: TaskTemplateId,
    },
}

impl TaskOwner {
    /// Returns the owner without template provenance.
    #[must_use]
    pub const fn generation_owner(&self) -> GenerationOwner {
        match self {
            Self::Project { project_id, .. } => GenerationOwner::Project(*project_id),
            Self::Job { job_id, .. } => GenerationOwner::Job(*job_id),
        }
    }

    /// Returns the template the task was generated from.
    #[must_use]
    pub const fn template_id(&self) -> TaskTemplateId {
        match self {
            Self::Project { phase_task_id, .. } => *phase_task_id,
            Self::Job { job_task_id, .. } => *job_task_id,
        }
    }
}

/// Project or job that generation runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum GenerationOwner {
    /// A lifecycle project.
    Project(ProjectId),
    /// A recurring job.
    Job(JobId),
}

impl GenerationOwner {
    /// Returns the storage name of the owner kind.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Project(_) => "project",
            Self::Job(_) => "job",
        }
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn id(self) -> Uuid {
        match self {
            Self::Project(project_id) => project_id.into_inner(),
            Self::Job(job_id) => job_id.into_inner(),
        }
    }
}

impl fmt::Display for GenerationOwner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.kind(), self.id())
    }
}

/// Claim on the single generation pass of an owner for a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationKey {
    owner: GenerationOwner,
    due_date: NaiveDate,
}

impl GenerationKey {
    /// Creates a key for `owner` on `due_date`.
    #[must_use]
    pub const fn new(owner: GenerationOwner, due_date: NaiveDate) -> Self {
        Self { owner, due_date }
    }

    /// Returns the generating owner.
    #[must_use]
    pub const fn owner(&self) -> GenerationOwner {
        self.owner
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }
}

impl fmt::Display for GenerationKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}@{}", self.owner, self.due_date)
    }
}
