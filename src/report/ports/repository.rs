//! Repository port for report persistence and queries.

use crate::project::domain::{ProjectId, UserId};
use crate::report::domain::{Report, ReportId, ReportType};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for report repository operations.
pub type ReportRepositoryResult<T> = Result<T, ReportRepositoryError>;

/// Report persistence contract. Listings are ordered newest first.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Stores a new report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::DuplicateReport`] when the ID
    /// exists.
    async fn store(&self, report: &Report) -> ReportRepositoryResult<()>;

    /// Deletes a report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::NotFound`] when the report does not
    /// exist.
    async fn delete(&self, id: ReportId) -> ReportRepositoryResult<()>;

    /// Finds a report by identifier.
    async fn find_by_id(&self, id: ReportId) -> ReportRepositoryResult<Option<Report>>;

    /// Returns the project's reports.
    async fn find_by_project(&self, project_id: ProjectId) -> ReportRepositoryResult<Vec<Report>>;

    /// Returns reports written by the user.
    async fn find_by_author(&self, author_id: UserId) -> ReportRepositoryResult<Vec<Report>>;

    /// Returns the project's reports of one type.
    async fn find_by_project_and_type(
        &self,
        project_id: ProjectId,
        report_type: ReportType,
    ) -> ReportRepositoryResult<Vec<Report>>;

    /// Removes every report of the project and returns how many were
    /// removed.
    async fn delete_for_project(&self, project_id: ProjectId) -> ReportRepositoryResult<u64>;
}

/// Errors returned by report repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReportRepositoryError {
    /// A report with the same identifier already exists.
    #[error("duplicate report identifier: {0}")]
    DuplicateReport(ReportId),

    /// The report was not found.
    #[error("report not found: {0}")]
    NotFound(ReportId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReportRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for ReportRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
