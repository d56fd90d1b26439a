//! Diesel schema for task persistence and key allocation.

diesel::table! {
    /// Task records keyed by project-scoped task keys.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Immutable `<projectKey>-<n>` key.
        #[max_length = 32]
        task_key -> Varchar,
        /// Numeric part of the key.
        sequence_number -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Task type.
        #[max_length = 50]
        task_type -> Varchar,
        /// Reporting user.
        reporter_id -> Uuid,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Last sequence number issued per project.
    project_task_counters (project_id) {
        /// Owning project.
        project_id -> Uuid,
        /// Last issued sequence number.
        last_value -> Int8,
    }
}
