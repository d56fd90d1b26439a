//! Diesel schema for projects, memberships and users.

diesel::table! {
    /// Registered users with their global role.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Unique, lower-case email address.
        #[max_length = 320]
        email -> Varchar,
        /// Global role name.
        #[max_length = 50]
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Unique upper-case project key.
        #[max_length = 5]
        project_key -> Varchar,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Current lead.
        lead_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project membership join table.
    project_members (project_id, user_id) {
        /// Owning project.
        project_id -> Uuid,
        /// Member user.
        user_id -> Uuid,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(project_members -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(projects, project_members, users);
