//! Diesel row models for job persistence.

use super::schema::jobs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for job records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    /// Job identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Generation interval in days.
    pub interval_days: i32,
    /// Activation status.
    pub status: String,
    /// Sequential execution flag.
    pub requires_sequential: bool,
    /// Declared category.
    pub category: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for job records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jobs)]
pub struct NewJobRow {
    /// Job identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Generation interval in days.
    pub interval_days: i32,
    /// Activation status.
    pub status: String,
    /// Sequential execution flag.
    pub requires_sequential: bool,
    /// Declared category.
    pub category: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
