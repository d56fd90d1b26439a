//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task key.
    pub task_key: String,
    /// Numeric part of the key.
    pub sequence_number: i64,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Task type.
    pub task_type: String,
    /// Reporting user.
    pub reporter_id: uuid::Uuid,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task key.
    pub task_key: String,
    /// Numeric part of the key.
    pub sequence_number: i64,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Task type.
    pub task_type: String,
    /// Reporting user.
    pub reporter_id: uuid::Uuid,
    /// Optional assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Counter value returned by the allocation upsert.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct CounterValue {
    /// Sequence number issued by this allocation.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub last_value: i64,
}
