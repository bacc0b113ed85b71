//! Diesel row models for project persistence.

use super::schema::{phases, project_history, projects, templates};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for template records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TemplateRow {
    /// Template identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Scheduling kind.
    pub kind: String,
    /// Recurrence interval.
    pub interval_days: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row model for phase records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = phases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PhaseRow {
    /// Phase identifier.
    pub id: uuid::Uuid,
    /// Owning template.
    pub template_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Position within the template.
    pub order_index: i32,
    /// Days before auto-advancing.
    pub duration_days: Option<i32>,
    /// Sequential execution flag.
    pub requires_sequential: bool,
}

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Template the project follows.
    pub template_id: Option<uuid::Uuid>,
    /// Current phase.
    pub current_phase_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for project records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Template the project follows.
    pub template_id: Option<uuid::Uuid>,
    /// Current phase.
    pub current_phase_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for history records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Phase the entry concerns.
    pub phase_id: Option<uuid::Uuid>,
    /// Recorded action.
    pub action: String,
    /// Action metadata.
    pub metadata: serde_json::Value,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}
