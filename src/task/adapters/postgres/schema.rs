//! Diesel schema for task persistence.

diesel::table! {
    /// Generated task instances.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project, set for phase tasks.
        project_id -> Nullable<Uuid>,
        /// Source phase task template.
        phase_task_id -> Nullable<Uuid>,
        /// Owning job, set for job tasks.
        job_id -> Nullable<Uuid>,
        /// Source job task template.
        job_task_id -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Part of the working day.
        #[max_length = 50]
        time_window -> Nullable<Varchar>,
        /// Scheduled time of day.
        scheduled_time -> Nullable<Time>,
        /// Order index of the source template.
        sequence -> Int4,
        /// Whether lower-sequence siblings must be finished first.
        sequential -> Bool,
        /// Day the task is due.
        due_date -> Date,
        /// Work status.
        #[max_length = 50]
        status -> Varchar,
        /// Notes left when working the task.
        completion_notes -> Nullable<Text>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Completing operator.
        completed_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per generation pass, unique per owner and due date.
    task_generations (owner_kind, owner_id, due_date) {
        /// `project` or `job`.
        #[max_length = 20]
        owner_kind -> Varchar,
        /// Owner identifier.
        owner_id -> Uuid,
        /// Generated due date.
        due_date -> Date,
        /// Claim timestamp.
        claimed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task templates of lifecycle phases.
    phase_tasks (id) {
        /// Template identifier.
        id -> Uuid,
        /// Owning phase.
        phase_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Part of the working day.
        #[max_length = 50]
        time_window -> Nullable<Varchar>,
        /// Scheduled time of day.
        scheduled_time -> Nullable<Time>,
        /// Position among the phase's templates.
        order_index -> Int4,
    }
}

diesel::table! {
    /// Task templates of recurring jobs.
    job_tasks (id) {
        /// Template identifier.
        id -> Uuid,
        /// Owning job.
        job_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Part of the working day.
        #[max_length = 50]
        time_window -> Nullable<Varchar>,
        /// Scheduled time of day.
        scheduled_time -> Nullable<Time>,
        /// Position among the job's templates.
        order_index -> Int4,
    }
}
