//! Identifier and validated scalar types for the task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an internal task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive, project-scoped task sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSequence(u64);

impl TaskSequence {
    /// Largest sequence number representable in the current `PostgreSQL`
    /// schema.
    const MAX_PERSISTED_VALUE: u64 = i64::MAX.unsigned_abs();

    /// Sequence number of the first task in a project.
    pub const FIRST: Self = Self(1);

    /// Creates a validated sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSequence`] when the value is zero
    /// or exceeds `i64::MAX`.
    pub const fn new(value: u64) -> Result<Self, TaskDomainError> {
        if value == 0 || value > Self::MAX_PERSISTED_VALUE {
            return Err(TaskDomainError::InvalidSequence(value));
        }
        Ok(Self(value))
    }

    /// Returns the sequence number following a project's current task
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSequence`] when the next value
    /// would overflow the persisted range.
    pub fn after_count(count: u64) -> Result<Self, TaskDomainError> {
        let next = count
            .checked_add(1)
            .ok_or(TaskDomainError::InvalidSequence(count))?;
        Self::new(next)
    }

    /// Returns the next sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSequence`] on overflow.
    pub fn next(self) -> Result<Self, TaskDomainError> {
        Self::after_count(self.0)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
