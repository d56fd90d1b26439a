//! Role changes and the promote-and-lead rule.
//!
//! Roles are global to a user while leadership belongs to one project.
//! Granting [`Role::ProductOwner`] inside a project therefore has two
//! effects with different scopes: the role changes everywhere the user is a
//! member, and the user becomes lead of the project in which the change was
//! requested. Both effects are reported in [`RoleChange`] so callers can
//! audit them.

use super::{LeadChange, Project, ProjectDomainError, Role, User};
use mockable::Clock;

/// Outcome of [`apply_role_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChange {
    /// Role held before the change.
    pub previous_role: Role,
    /// Role held after the change.
    pub new_role: Role,
    /// Leadership change in the requesting project, when one occurred.
    pub lead_change: Option<LeadChange>,
}

impl RoleChange {
    /// Returns `true` when the change promoted the user to project lead.
    #[must_use]
    pub const fn promoted_to_lead(&self) -> bool {
        self.lead_change.is_some()
    }
}

/// Sets the user's global role in the context of `project`.
///
/// When the new role is [`Role::ProductOwner`] and the user does not already
/// lead the project, the user is promoted to lead through
/// [`Project::change_lead`].
///
/// # Errors
///
/// Returns [`ProjectDomainError::NotAssociated`] when the user is neither a
/// member nor the lead. Neither value is modified on error.
pub fn apply_role_change(
    project: &mut Project,
    user: &mut User,
    role: Role,
    clock: &impl Clock,
) -> Result<RoleChange, ProjectDomainError> {
    if !project.is_associated(user.id()) {
        return Err(ProjectDomainError::NotAssociated {
            project: project.id(),
            user: user.id(),
        });
    }

    let already_lead = project.is_lead(user.id());
    let previous_role = user.set_role(role, clock);
    let lead_change = (role == Role::ProductOwner && !already_lead)
        .then(|| project.change_lead(user.id(), clock));

    Ok(RoleChange {
        previous_role,
        new_role: role,
        lead_change,
    })
}
