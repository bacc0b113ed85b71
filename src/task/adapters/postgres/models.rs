//! Diesel row models for task persistence.

use super::schema::{job_tasks, phase_tasks, task_generations, tasks};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

/// Row model for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: Option<uuid::Uuid>,
    /// Source phase task template.
    pub phase_task_id: Option<uuid::Uuid>,
    /// Owning job.
    pub job_id: Option<uuid::Uuid>,
    /// Source job task template.
    pub job_task_id: Option<uuid::Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Part of the working day.
    pub time_window: Option<String>,
    /// Scheduled time of day.
    pub scheduled_time: Option<NaiveTime>,
    /// Template order index.
    pub sequence: i32,
    /// Sequential flag.
    pub sequential: bool,
    /// Due date.
    pub due_date: NaiveDate,
    /// Work status.
    pub status: String,
    /// Completion notes.
    pub completion_notes: Option<String>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completing operator.
    pub completed_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for generation claims.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_generations)]
pub struct NewGenerationRow {
    /// `project` or `job`.
    pub owner_kind: String,
    /// Owner identifier.
    pub owner_id: uuid::Uuid,
    /// Generated due date.
    pub due_date: NaiveDate,
    /// Claim timestamp.
    pub claimed_at: DateTime<Utc>,
}

/// Row model for phase task templates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = phase_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PhaseTaskRow {
    /// Template identifier.
    pub id: uuid::Uuid,
    /// Owning phase.
    pub phase_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Part of the working day.
    pub time_window: Option<String>,
    /// Scheduled time of day.
    pub scheduled_time: Option<NaiveTime>,
    /// Position among the phase's templates.
    pub order_index: i32,
}

/// Row model for job task templates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = job_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobTaskRow {
    /// Template identifier.
    pub id: uuid::Uuid,
    /// Owning job.
    pub job_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Part of the working day.
    pub time_window: Option<String>,
    /// Scheduled time of day.
    pub scheduled_time: Option<NaiveTime>,
    /// Position among the job's templates.
    pub order_index: i32,
}
