//! Diesel schema for job persistence.

diesel::table! {
    /// Recurring job definitions.
    jobs (id) {
        /// Job identifier.
        id -> Uuid,
        /// Display name, also used for keyword category inference.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Generation interval in days.
        interval_days -> Int4,
        /// Activation status.
        #[max_length = 50]
        status -> Varchar,
        /// Whether generated tasks must be worked in order.
        requires_sequential -> Bool,
        /// Explicitly declared category.
        #[max_length = 50]
        category -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
