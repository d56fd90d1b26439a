//! Repository port for task persistence, key allocation and lookup.

use crate::project::domain::{ProjectId, ProjectKey, UserId};
use crate::task::domain::{Task, TaskDomainError, TaskDraft, TaskId, TaskKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Allocates the next task key for the draft's project and stores the
    /// resulting task.
    ///
    /// Allocation and insertion are one critical section: concurrent calls
    /// for the same project never observe the same sequence number, and a
    /// failed insert leaves the project counter unchanged. A project whose
    /// counter has never been used starts from its current task count plus
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the draft's ID is
    /// already stored or [`TaskRepositoryError::DuplicateTaskKey`] when the
    /// allocated key collides with an existing task.
    async fn allocate_and_store(
        &self,
        project_key: &ProjectKey,
        draft: TaskDraft,
    ) -> TaskRepositoryResult<Task>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task. Its key is not released for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the project's tasks, newest first.
    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks assigned to the user, newest first.
    async fn find_by_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the number of tasks currently stored for the project.
    async fn count_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64>;

    /// Removes every task of the project together with its key counter.
    ///
    /// Returns the number of tasks removed.
    async fn delete_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A task with the same key already exists in the project.
    #[error("duplicate task key: {0}")]
    DuplicateTaskKey(TaskKey),

    /// The project's sequence is exhausted.
    #[error(transparent)]
    Allocation(#[from] TaskDomainError),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
