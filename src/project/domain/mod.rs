//! Domain model for projects, users and membership.
//!
//! The project aggregate owns the member set and the lead pointer and keeps
//! `lead ∈ members` true after every mutation. Users carry a single global
//! role.

mod error;
mod ids;
mod key;
mod project;
mod promotion;
mod user;

pub use error::{ParseRoleError, ProjectDomainError};
pub use ids::{ProjectId, UserId};
pub use key::ProjectKey;
pub use project::{LeadChange, PersistedProjectData, Project, ProjectDetails};
pub use promotion::{RoleChange, apply_role_change};
pub use user::{EmailAddress, PersistedUserData, Role, User};
