//! Error types for project domain validation and membership rules.

use super::{ProjectId, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project key is not 2-5 ASCII alphanumeric characters.
    #[error("invalid project key '{0}', expected 2-5 alphanumeric characters")]
    InvalidProjectKey(String),

    /// The user name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The user already belongs to the project.
    #[error("user {user} is already a member of project {project}")]
    DuplicateMember {
        /// Project being mutated.
        project: ProjectId,
        /// User that is already a member.
        user: UserId,
    },

    /// The user does not belong to the project.
    #[error("user {user} is not a member of project {project}")]
    NotAMember {
        /// Project being mutated.
        project: ProjectId,
        /// User that is not a member.
        user: UserId,
    },

    /// The user is the project lead and cannot be removed.
    #[error("cannot remove user {user}, the lead of project {project}")]
    CannotRemoveLead {
        /// Project being mutated.
        project: ProjectId,
        /// Current lead.
        user: UserId,
    },

    /// The user is neither a member nor the lead of the project.
    #[error("user {user} is not associated with project {project}")]
    NotAssociated {
        /// Project being mutated.
        project: ProjectId,
        /// Unassociated user.
        user: UserId,
    },
}

/// Error returned while parsing a user role name.
///
/// Role names must match the canonical upper-case spelling exactly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);
