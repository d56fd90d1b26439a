//! Service layer for task creation, assignment and retrieval.

use crate::error::ErrorCategory;
use crate::project::{
    domain::{EmailAddress, Project, ProjectId, User, UserId},
    ports::{ProjectRepository, ProjectRepositoryError, UserRepository, UserRepositoryError},
};
use crate::task::{
    domain::{Task, TaskDomainError, TaskDraft, TaskId, TaskPriority, TaskStatus, TaskType},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    task_type: TaskType,
}

impl CreateTaskRequest {
    /// Creates a request with default priority and type.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the task type.
    #[must_use]
    pub const fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Task validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No user is registered with the email address.
    #[error("no user registered with email {0}")]
    UnknownEmail(String),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The intended assignee does not belong to the task's project.
    #[error("user {user} is not a member of project {project}")]
    AssigneeNotMember {
        /// Task's project.
        project: ProjectId,
        /// Rejected assignee.
        user: UserId,
    },

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),
}

impl TaskServiceError {
    /// Classifies the error for request layers.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound(_)
            | Self::UserNotFound(_)
            | Self::UnknownEmail(_)
            | Self::TaskNotFound(_)
            | Self::Repository(TaskRepositoryError::NotFound(_))
            | Self::ProjectRepository(ProjectRepositoryError::NotFound(_))
            | Self::UserRepository(UserRepositoryError::NotFound(_)) => ErrorCategory::NotFound,
            Self::Repository(TaskRepositoryError::Persistence(_))
            | Self::ProjectRepository(ProjectRepositoryError::Persistence(_))
            | Self::UserRepository(UserRepositoryError::Persistence(_)) => ErrorCategory::Internal,
            Self::Domain(_)
            | Self::AssigneeNotMember { .. }
            | Self::Repository(_)
            | Self::ProjectRepository(_)
            | Self::UserRepository(_) => ErrorCategory::Conflict,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<T, P, U, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, P, U, C> TaskService<T, P, U, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            users,
            clock,
        }
    }

    /// Creates a task in the project, reported by the user registered under
    /// `reporter_email`, and allocates its key.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown project or reporter,
    /// [`TaskServiceError::Domain`] for a blank title and
    /// [`TaskServiceError::Repository`] when the task cannot be stored.
    pub async fn create_task(
        &self,
        project_id: ProjectId,
        reporter_email: &str,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let project = self.load_project(project_id).await?;
        let reporter = self.user_by_email(reporter_email).await?;

        let CreateTaskRequest {
            title,
            description,
            priority,
            task_type,
        } = request;
        let mut draft = TaskDraft::new(project.id(), reporter.id(), title, &*self.clock)?
            .with_priority(priority)
            .with_type(task_type);
        if let Some(text) = description {
            draft = draft.with_description(text);
        }

        let task = self.tasks.allocate_and_store(project.key(), draft).await?;
        info!(
            project_id = %project_id,
            task_id = %task.id(),
            task_key = %task.key(),
            "allocated task key"
        );
        Ok(task)
    }

    /// Assigns the task to a member of its project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::AssigneeNotMember`] unless the user
    /// belongs to the task's project, or a not-found error for an unknown
    /// task or user.
    pub async fn assign_task(&self, task_id: TaskId, user_id: UserId) -> TaskServiceResult<Task> {
        let mut task = self.load_task(task_id).await?;
        let assignee = self.load_user(user_id).await?;
        let project = self.load_project(task.project_id()).await?;

        if !project.is_member(assignee.id()) {
            return Err(TaskServiceError::AssigneeNotMember {
                project: project.id(),
                user: assignee.id(),
            });
        }

        task.assign(assignee.id(), &*self.clock);
        self.tasks.update(&task).await?;
        info!(task_id = %task_id, assignee = %user_id, "assigned task");
        Ok(task)
    }

    /// Sets the task's workflow status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for an unknown task.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_task(task_id).await?;
        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        info!(task_id = %task_id, status = %status, "updated task status");
        Ok(task)
    }

    /// Sets the task's priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for an unknown task.
    pub async fn update_priority(
        &self,
        task_id: TaskId,
        priority: TaskPriority,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_task(task_id).await?;
        task.set_priority(priority, &*self.clock);
        self.tasks.update(&task).await?;
        info!(task_id = %task_id, priority = %priority, "updated task priority");
        Ok(task)
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when absent.
    pub async fn task(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.load_task(task_id).await
    }

    /// Returns the project's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::ProjectNotFound`] for an unknown project.
    pub async fn tasks_for_project(&self, project_id: ProjectId) -> TaskServiceResult<Vec<Task>> {
        let project = self.load_project(project_id).await?;
        let tasks = self.tasks.find_by_project(project.id()).await?;
        debug!(project_id = %project_id, count = tasks.len(), "listed project tasks");
        Ok(tasks)
    }

    /// Returns tasks assigned to the user registered under `email`, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UnknownEmail`] when nobody is registered
    /// with the address.
    pub async fn tasks_for_assignee(&self, email: &str) -> TaskServiceResult<Vec<Task>> {
        let assignee = self.user_by_email(email).await?;
        let tasks = self.tasks.find_by_assignee(assignee.id()).await?;
        debug!(user_id = %assignee.id(), count = tasks.len(), "listed assigned tasks");
        Ok(tasks)
    }

    /// Deletes a task. Its key is never issued again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for an unknown task.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskServiceResult<()> {
        self.tasks.delete(task_id).await.map_err(|err| match err {
            TaskRepositoryError::NotFound(id) => TaskServiceError::TaskNotFound(id),
            other => TaskServiceError::Repository(other),
        })?;
        info!(task_id = %task_id, "deleted task");
        Ok(())
    }

    async fn load_task(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }

    async fn load_project(&self, project_id: ProjectId) -> TaskServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(TaskServiceError::ProjectNotFound(project_id))
    }

    async fn load_user(&self, user_id: UserId) -> TaskServiceResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(TaskServiceError::UserNotFound(user_id))
    }

    async fn user_by_email(&self, email: &str) -> TaskServiceResult<User> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(TaskServiceError::UnknownEmail(email.trim().to_owned()));
        };
        self.users
            .find_by_email(&address)
            .await?
            .ok_or_else(|| TaskServiceError::UnknownEmail(address.to_string()))
    }
}
