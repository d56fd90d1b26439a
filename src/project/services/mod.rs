//! Application services for project lifecycle and membership.

mod membership;
mod removal;

pub use membership::{
    CreateProjectRequest, ProjectMembershipService, ProjectServiceError, ProjectServiceResult,
    UpdateProjectRequest,
};
pub use removal::{ProjectRemovalError, ProjectRemovalService, RemovalSummary};
