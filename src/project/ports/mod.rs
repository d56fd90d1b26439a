//! Port contracts for project and user persistence.

pub mod repository;
pub mod users;

pub use repository::{
    ProjectMutation, ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult,
};
pub use users::{UserRepository, UserRepositoryError, UserRepositoryResult};
