//! In-memory adapters for projects and users.

mod project;
mod user;

pub use project::InMemoryProjectRepository;
pub use user::InMemoryUserRepository;
