//! Project deletion together with the tasks and reports it owns.

use crate::error::ErrorCategory;
use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::report::ports::{ReportRepository, ReportRepositoryError};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Counts of records removed alongside a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Tasks deleted.
    pub tasks_removed: u64,
    /// Reports deleted.
    pub reports_removed: u64,
}

/// Errors raised while deleting a project.
#[derive(Debug, Error)]
pub enum ProjectRemovalError {
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),

    /// Report repository operation failed.
    #[error(transparent)]
    ReportRepository(#[from] ReportRepositoryError),
}

impl ProjectRemovalError {
    /// Classifies the error for request layers.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound(_)
            | Self::ProjectRepository(ProjectRepositoryError::NotFound(_)) => {
                ErrorCategory::NotFound
            }
            Self::ProjectRepository(_) | Self::TaskRepository(_) | Self::ReportRepository(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

/// Deletes projects and everything scoped to them.
///
/// Reports go first, then tasks and the key counter, then the project row,
/// so a failure part way leaves the project in place and the call can be
/// retried.
#[derive(Clone)]
pub struct ProjectRemovalService<P, T, R>
where
    P: ProjectRepository,
    T: TaskRepository,
    R: ReportRepository,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    reports: Arc<R>,
}

impl<P, T, R> ProjectRemovalService<P, T, R>
where
    P: ProjectRepository,
    T: TaskRepository,
    R: ReportRepository,
{
    /// Creates a new removal service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, reports: Arc<R>) -> Self {
        Self {
            projects,
            tasks,
            reports,
        }
    }

    /// Deletes the project with its tasks and reports.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRemovalError::ProjectNotFound`] for an unknown
    /// project, or a repository error when a deletion fails.
    pub async fn delete_project(
        &self,
        project_id: ProjectId,
    ) -> Result<RemovalSummary, ProjectRemovalError> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(ProjectRemovalError::ProjectNotFound(project_id));
        }

        let reports_removed = self.reports.delete_for_project(project_id).await?;
        let tasks_removed = self.tasks.delete_for_project(project_id).await?;
        self.projects.delete(project_id).await?;

        info!(
            project_id = %project_id,
            tasks_removed,
            reports_removed,
            "deleted project"
        );
        Ok(RemovalSummary {
            tasks_removed,
            reports_removed,
        })
    }
}
