//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The sequence number is zero or out of the persisted range.
    #[error("invalid task sequence number {0}")]
    InvalidSequence(u64),

    /// The task key is not of the form `<PROJECT>-<n>`.
    #[error("invalid task key '{0}', expected <PROJECT>-<n>")]
    InvalidTaskKey(String),
}

/// Error returned while parsing a task status, priority or type name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {attribute}: {value}")]
pub struct ParseTaskAttributeError {
    /// Attribute being parsed, such as `status`.
    pub attribute: &'static str,
    /// Rejected input.
    pub value: String,
}

impl ParseTaskAttributeError {
    pub(crate) fn new(attribute: &'static str, value: &str) -> Self {
        Self {
            attribute,
            value: value.to_owned(),
        }
    }
}
