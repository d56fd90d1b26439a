//! `PostgreSQL` adapters for project and user persistence.

mod models;
mod project;
mod schema;
mod user;

pub use project::{PostgresProjectRepository, ProjectPgPool};
pub use user::PostgresUserRepository;
