//! Repository port for project persistence and lookup.

use crate::project::domain::{Project, ProjectDomainError, ProjectId, ProjectKey, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Outcome of [`ProjectRepository::modify`]: the persisted project with the
/// mutation's value, or the rule violation that rejected the mutation.
pub type ProjectMutation<T> = Result<(Project, T), ProjectDomainError>;

/// Project persistence contract.
///
/// A project write stores the member set and the lead pointer together, so
/// adapters must apply both or neither.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the ID
    /// exists or [`ProjectRepositoryError::DuplicateProjectKey`] when the
    /// key is taken.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project, including membership and
    /// lead.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist or [`ProjectRepositoryError::DuplicateProjectKey`] when a
    /// changed key is taken.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Loads the project, applies `mutate` and persists the result as one
    /// step. Calls for the same project are serialized, so no concurrent
    /// mutation is lost between the read and the write.
    ///
    /// When `mutate` returns an error nothing is written and the error is
    /// returned as the inner `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist or [`ProjectRepositoryError::DuplicateProjectKey`] when the
    /// mutation changed the key to one that is taken.
    async fn modify<T, F>(
        &self,
        id: ProjectId,
        mutate: F,
    ) -> ProjectRepositoryResult<ProjectMutation<T>>
    where
        F: FnOnce(&mut Project) -> Result<T, ProjectDomainError> + Send + 'static,
        T: Send + 'static;

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns `true` when any project uses the key.
    async fn exists_by_key(&self, key: &ProjectKey) -> ProjectRepositoryResult<bool>;

    /// Returns projects the user leads or belongs to.
    async fn find_for_user(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// Another project already uses the key.
    #[error("project key already exists: {0}")]
    DuplicateProjectKey(ProjectKey),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for ProjectRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
