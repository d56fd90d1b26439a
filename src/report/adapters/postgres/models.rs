//! Diesel row models for report persistence.

use super::schema::reports;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row shape shared by report inserts and queries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReportRow {
    /// Report identifier.
    pub id: uuid::Uuid,
    /// Reported project.
    pub project_id: uuid::Uuid,
    /// Requesting user.
    pub author_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Report type name.
    pub report_type: String,
    /// Prompt.
    pub prompt: String,
    /// Content.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
