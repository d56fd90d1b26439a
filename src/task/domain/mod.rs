//! Domain model for tasks and project-scoped task keys.
//!
//! Tasks are created from a validated [`TaskDraft`] once a sequence number
//! has been allocated for the owning project. The resulting [`TaskKey`]
//! never changes.

mod error;
mod ids;
mod key;
mod task;

pub use error::{ParseTaskAttributeError, TaskDomainError};
pub use ids::{TaskId, TaskSequence};
pub use key::TaskKey;
pub use task::{PersistedTaskData, Task, TaskDraft, TaskPriority, TaskStatus, TaskType};
