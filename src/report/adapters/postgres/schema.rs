//! Diesel schema for report persistence.

diesel::table! {
    /// Generated reports.
    reports (id) {
        /// Report identifier.
        id -> Uuid,
        /// Reported project.
        project_id -> Uuid,
        /// Requesting user.
        author_id -> Uuid,
        /// Report title.
        #[max_length = 512]
        title -> Varchar,
        /// Report type name.
        #[max_length = 50]
        report_type -> Varchar,
        /// User prompt.
        prompt -> Text,
        /// Generated content.
        content -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
