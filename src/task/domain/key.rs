//! Human-readable, project-scoped task keys.

use super::{TaskDomainError, TaskSequence};
use crate::project::domain::ProjectKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task key of the form `<projectKey>-<n>`, for example `TP-12`.
///
/// A key is fixed when the task is created. Renaming the project key later
/// does not rewrite existing task keys, so the prefix records the project
/// key in force at allocation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskKey {
    prefix: String,
    sequence: TaskSequence,
}

impl TaskKey {
    /// Builds the key for a freshly allocated sequence number.
    #[must_use]
    pub fn allocate(project_key: &ProjectKey, sequence: TaskSequence) -> Self {
        Self {
            prefix: project_key.as_str().to_owned(),
            sequence,
        }
    }

    /// Parses a persisted key.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskKey`] unless the value is a
    /// non-empty prefix, a dash, and a positive decimal number.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidTaskKey(value.to_owned());
        let (prefix, number) = value.rsplit_once('-').ok_or_else(invalid)?;
        if prefix.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let raw = number.parse::<u64>().map_err(|_| invalid())?;
        let sequence = TaskSequence::new(raw).map_err(|_| invalid())?;
        Ok(Self {
            prefix: prefix.to_owned(),
            sequence,
        })
    }

    /// Returns the project-key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn sequence(&self) -> TaskSequence {
        self.sequence
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.sequence)
    }
}

impl TryFrom<String> for TaskKey {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaskKey> for String {
    fn from(key: TaskKey) -> Self {
        key.to_string()
    }
}
