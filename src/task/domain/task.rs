//! Task aggregate root and its attribute enums.

use super::{ParseTaskAttributeError, TaskDomainError, TaskId, TaskKey};
use crate::project::domain::{ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! task_attribute {
    (
        $(#[$meta:meta])*
        $name:ident, $attribute:literal, default = $default:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Returns the canonical storage representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ParseTaskAttributeError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseTaskAttributeError::new($attribute, value)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

task_attribute! {
    /// Workflow status of a task.
    TaskStatus, "status", default = Todo {
        /// Not started.
        Todo => "TODO",
        /// Being worked on.
        InProgress => "IN_PROGRESS",
        /// Awaiting review.
        InReview => "IN_REVIEW",
        /// Completed.
        Done => "DONE",
    }
}

task_attribute! {
    /// Task priority, highest first.
    TaskPriority, "priority", default = Medium {
        /// Most urgent.
        Highest => "HIGHEST",
        /// Urgent.
        High => "HIGH",
        /// Normal.
        Medium => "MEDIUM",
        /// Can wait.
        Low => "LOW",
        /// Least urgent.
        Lowest => "LOWEST",
    }
}

task_attribute! {
    /// Kind of work item.
    TaskType, "type", default = Task {
        /// Generic task.
        Task => "TASK",
        /// Defect.
        Bug => "BUG",
        /// User story.
        Story => "STORY",
        /// Epic.
        Epic => "EPIC",
    }
}

/// Validated task content awaiting key allocation.
///
/// The draft carries the task identifier so a retried submission of the
/// same draft is recognised as a duplicate instead of creating a second
/// task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    id: TaskId,
    project_id: ProjectId,
    reporter: UserId,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    task_type: TaskType,
    created_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Creates a draft with default priority and type.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title.
    pub fn new(
        project_id: ProjectId,
        reporter: UserId,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            id: TaskId::new(),
            project_id,
            reporter,
            title: trimmed.to_owned(),
            description: None,
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
            created_at: clock.utc(),
        })
    }

    /// Sets the description; blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let text = description.into();
        let trimmed = text.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
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

    /// Returns the identifier the task will be stored under.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Turns the draft into a task under an allocated key, timestamped at
    /// draft creation.
    #[must_use]
    pub fn into_task(self, key: TaskKey) -> Task {
        Task {
            id: self.id,
            key,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: TaskStatus::default(),
            priority: self.priority,
            task_type: self.task_type,
            reporter: self.reporter,
            assignee: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    key: TaskKey,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    task_type: TaskType,
    reporter: UserId,
    assignee: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task key.
    pub key: TaskKey,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted type.
    pub task_type: TaskType,
    /// Persisted reporter.
    pub reporter: UserId,
    /// Persisted assignee.
    pub assignee: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            key: data.key,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            task_type: data.task_type,
            reporter: data.reporter,
            assignee: data.assignee,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the immutable task key.
    #[must_use]
    pub const fn key(&self) -> &TaskKey {
        &self.key
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn reporter(&self) -> UserId {
        self.reporter
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
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

    /// Assigns the task. Project membership is checked by the caller.
    pub fn assign(&mut self, user: UserId, clock: &impl Clock) {
        self.assignee = Some(user);
        self.touch(clock);
    }

    /// Sets the workflow status.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Sets the priority.
    pub fn set_priority(&mut self, priority: TaskPriority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
