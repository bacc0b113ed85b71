//! Diesel schema for project persistence.

diesel::table! {
    /// Lifecycle and recurring templates.
    templates (id) {
        /// Template identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Scheduling kind.
        #[max_length = 50]
        kind -> Varchar,
        /// Recurrence interval for interval templates.
        interval_days -> Nullable<Int4>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered template phases.
    phases (id) {
        /// Phase identifier.
        id -> Uuid,
        /// Owning template.
        template_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Position within the template, unique per template.
        order_index -> Int4,
        /// Days before auto-advancing.
        duration_days -> Nullable<Int4>,
        /// Whether generated tasks must be worked in order.
        requires_sequential -> Bool,
    }
}

diesel::table! {
    /// Lifecycle projects.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Template the project follows.
        template_id -> Nullable<Uuid>,
        /// Phase the project is in.
        current_phase_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Start timestamp.
        started_at -> Timestamptz,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only project history.
    project_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Phase the entry concerns.
        phase_id -> Nullable<Uuid>,
        /// Recorded action.
        #[max_length = 50]
        action -> Varchar,
        /// Action metadata.
        metadata -> Jsonb,
        /// Event timestamp.
        created_at -> Timestamptz,
        /// Append order, breaking timestamp ties.
        seq -> Int8,
    }
}
