//! Persisted report aggregate.

use super::{ReportId, ReportType};
use crate::project::domain::{ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Generated report.
///
/// Reports are append-only: once created their content never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    id: ReportId,
    project_id: ProjectId,
    author_id: UserId,
    title: String,
    report_type: ReportType,
    prompt: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Content of a report about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    /// Reported project.
    pub project_id: ProjectId,
    /// Requesting user.
    pub author_id: UserId,
    /// Report title.
    pub title: String,
    /// Report type.
    pub report_type: ReportType,
    /// User prompt.
    pub prompt: String,
    /// Generated content.
    pub content: String,
}

/// Parameter object for reconstructing a persisted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReportData {
    /// Persisted identifier.
    pub id: ReportId,
    /// Persisted project reference.
    pub project_id: ProjectId,
    /// Persisted author reference.
    pub author_id: UserId,
    /// Persisted title.
    pub title: String,
    /// Persisted type.
    pub report_type: ReportType,
    /// Persisted prompt.
    pub prompt: String,
    /// Persisted content.
    pub content: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Creates a report with a fresh identifier.
    #[must_use]
    pub fn new(data: NewReport, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ReportId::new(),
            project_id: data.project_id,
            author_id: data.author_id,
            title: data.title,
            report_type: data.report_type,
            prompt: data.prompt,
            content: data.content,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a report from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReportData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            author_id: data.author_id,
            title: data.title,
            report_type: data.report_type,
            prompt: data.prompt,
            content: data.content,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the report identifier.
    #[must_use]
    pub const fn id(&self) -> ReportId {
        self.id
    }

    /// Returns the reported project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the report type.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        self.report_type
    }

    /// Returns the prompt the report was generated from.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns the generated content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
