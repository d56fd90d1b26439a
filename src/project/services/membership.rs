//! Service layer for project lifecycle and membership rules.

use crate::error::ErrorCategory;
use crate::project::{
    domain::{
        EmailAddress, LeadChange, ParseRoleError, Project, ProjectDetails, ProjectDomainError,
        ProjectId, ProjectKey, Role, RoleChange, User, UserId, apply_role_change,
    },
    ports::{ProjectRepository, ProjectRepositoryError, UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    key: String,
    description: Option<String>,
    creator_email: String,
}

impl CreateProjectRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        creator_email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            description: None,
            creator_email: creator_email.into(),
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for replacing a project's editable details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: String,
    key: String,
    description: Option<String>,
}

impl UpdateProjectRequest {
    /// Creates a request with name and key; the description is cleared
    /// unless set with [`Self::with_description`].
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for project and membership operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// A membership rule or value validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// The requested role name is not a known role.
    #[error(transparent)]
    InvalidRole(#[from] ParseRoleError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No user is registered with the email address.
    #[error("no user registered with email {0}")]
    UnknownEmail(String),

    /// Another project already uses the key.
    #[error("project key already exists: {0}")]
    DuplicateProjectKey(ProjectKey),

    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),
}

impl ProjectServiceError {
    /// Classifies the error for request layers.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) | Self::InvalidRole(_) | Self::DuplicateProjectKey(_) => {
                ErrorCategory::Conflict
            }
            Self::ProjectNotFound(_) | Self::UserNotFound(_) | Self::UnknownEmail(_) => {
                ErrorCategory::NotFound
            }
            Self::ProjectRepository(err) => match err {
                ProjectRepositoryError::NotFound(_) => ErrorCategory::NotFound,
                ProjectRepositoryError::DuplicateProject(_)
                | ProjectRepositoryError::DuplicateProjectKey(_) => ErrorCategory::Conflict,
                ProjectRepositoryError::Persistence(_) => ErrorCategory::Internal,
            },
            Self::UserRepository(err) => match err {
                UserRepositoryError::NotFound(_) => ErrorCategory::NotFound,
                UserRepositoryError::DuplicateUser(_) | UserRepositoryError::DuplicateEmail(_) => {
                    ErrorCategory::Conflict
                }
                UserRepositoryError::Persistence(_) => ErrorCategory::Internal,
            },
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project lifecycle and membership orchestration service.
///
/// Every mutation runs through [`ProjectRepository::modify`]: the rule is
/// applied to the freshly loaded aggregate and the whole project is written
/// back in the same serialized step, so the member set and the lead pointer
/// change together and concurrent edits of one project never overwrite each
/// other. A rule violation returns before anything is written.
#[derive(Clone)]
pub struct ProjectMembershipService<P, U, C>
where
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync + 'static,
{
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<P, U, C> ProjectMembershipService<P, U, C>
where
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(projects: Arc<P>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            projects,
            users,
            clock,
        }
    }

    /// Registers a user with the [`Role::Member`] role.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] for an invalid name or email
    /// and [`ProjectServiceError::UserRepository`] when the email is taken.
    pub async fn register_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> ProjectServiceResult<User> {
        let user = User::new(name, email, &*self.clock)?;
        self.users.store(&user).await?;
        info!(user_id = %user.id(), email = %user.email(), "registered user");
        Ok(user)
    }

    /// Creates a project led by the user registered under the request's
    /// email.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::UnknownEmail`] when the creator is not
    /// registered, [`ProjectServiceError::DuplicateProjectKey`] when the key
    /// is taken and [`ProjectServiceError::Domain`] for invalid details.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let CreateProjectRequest {
            name,
            key,
            description,
            creator_email,
        } = request;
        let details = ProjectDetails::new(name, key, description)?;
        let creator = self.user_by_email(&creator_email).await?;

        if self.projects.exists_by_key(details.key()).await? {
            return Err(ProjectServiceError::DuplicateProjectKey(details.key().clone()));
        }

        let project = Project::create(details, &creator, &*self.clock);
        self.projects
            .store(&project)
            .await
            .map_err(project_write_error)?;
        info!(
            project_id = %project.id(),
            project_key = %project.key(),
            lead_id = %creator.id(),
            "created project"
        );
        Ok(project)
    }

    /// Replaces a project's name, key and description.
    ///
    /// Task keys already issued keep their original prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::ProjectNotFound`] for an unknown
    /// project and [`ProjectServiceError::DuplicateProjectKey`] when the new
    /// key belongs to another project.
    pub async fn update_project_details(
        &self,
        project_id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let UpdateProjectRequest {
            name,
            key,
            description,
        } = request;
        let details = ProjectDetails::new(name, key, description)?;

        let (project, ()) = self
            .mutate_project(project_id, move |project, clock| {
                project.update_details(details, clock);
                Ok(())
            })
            .await?;
        info!(
            project_id = %project.id(),
            project_key = %project.key(),
            "updated project details"
        );
        Ok(project)
    }

    /// Adds a user to the project's member set.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] wrapping
    /// [`ProjectDomainError::DuplicateMember`] when the user already belongs
    /// to the project, or a not-found error for an unknown project or user.
    pub async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<Project> {
        let member = self.load_user(user_id).await?.id();

        let (project, ()) = self
            .mutate_project(project_id, move |project, clock| {
                project.add_member(member, clock)
            })
            .await?;
        info!(project_id = %project_id, user_id = %user_id, "added project member");
        Ok(project)
    }

    /// Removes a user from the project's member set.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] wrapping
    /// [`ProjectDomainError::NotAMember`] or
    /// [`ProjectDomainError::CannotRemoveLead`]; the stored project is left
    /// untouched in both cases. An unknown project or user is a not-found
    /// error.
    pub async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<Project> {
        let member = self.load_user(user_id).await?.id();

        let (project, ()) = self
            .mutate_project(project_id, move |project, clock| {
                project.remove_member(member, clock)
            })
            .await?;
        info!(project_id = %project_id, user_id = %user_id, "removed project member");
        Ok(project)
    }

    /// Makes the user the project lead, adding them as a member first when
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown project or user. Membership
    /// state never causes this operation to fail.
    pub async fn change_lead(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<LeadChange> {
        let new_lead = self.load_user(user_id).await?.id();

        let (_, change) = self
            .mutate_project(project_id, move |project, clock| {
                Ok(project.change_lead(new_lead, clock))
            })
            .await?;
        info!(
            project_id = %project_id,
            new_lead = %change.new_lead,
            membership_added = change.membership_added,
            "changed project lead"
        );
        Ok(change)
    }

    /// Sets a member's global role from its canonical name.
    ///
    /// Granting `PRODUCT_OWNER` to a user who does not lead the project also
    /// makes them its lead; [`RoleChange::promoted_to_lead`] reports whether
    /// that happened.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::InvalidRole`] unless `role_name`
    /// exactly matches a role, and [`ProjectServiceError::Domain`] wrapping
    /// [`ProjectDomainError::NotAssociated`] when the user is neither member
    /// nor lead.
    pub async fn update_member_role(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        role_name: &str,
    ) -> ProjectServiceResult<RoleChange> {
        let role = Role::try_from(role_name)?;
        self.apply_role(project_id, user_id, role).await
    }

    /// Grants `PRODUCT_OWNER` to a project member and makes them lead.
    ///
    /// # Errors
    ///
    /// See [`Self::update_member_role`].
    pub async fn promote_and_lead(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<RoleChange> {
        self.apply_role(project_id, user_id, Role::ProductOwner).await
    }

    /// Returns a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::ProjectNotFound`] when absent.
    pub async fn project(&self, project_id: ProjectId) -> ProjectServiceResult<Project> {
        self.load_project(project_id).await
    }

    /// Returns the project's members with the lead first and the rest
    /// ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown project or a member whose
    /// user record is missing.
    pub async fn project_members(&self, project_id: ProjectId) -> ProjectServiceResult<Vec<User>> {
        let project = self.load_project(project_id).await?;

        let mut lead = None;
        let mut others = Vec::with_capacity(project.team_size());
        for member_id in project.members() {
            let user = self.load_user(*member_id).await?;
            if project.is_lead(user.id()) {
                lead = Some(user);
            } else {
                others.push(user);
            }
        }
        others.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(project_id = %project_id, team_size = project.team_size(), "listed project members");
        Ok(lead.into_iter().chain(others).collect())
    }

    /// Returns projects the user leads or belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::UnknownEmail`] when no user has the
    /// address.
    pub async fn projects_for_user(&self, email: &str) -> ProjectServiceResult<Vec<Project>> {
        let user = self.user_by_email(email).await?;
        let projects = self.projects.find_for_user(user.id()).await?;
        debug!(user_id = %user.id(), count = projects.len(), "listed projects for user");
        Ok(projects)
    }

    /// Resolves a registered user by email address.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::UnknownEmail`] when nobody is
    /// registered with the address, including addresses too malformed to
    /// have been registered.
    pub async fn user_by_email(&self, email: &str) -> ProjectServiceResult<User> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(ProjectServiceError::UnknownEmail(email.trim().to_owned()));
        };
        self.users
            .find_by_email(&address)
            .await?
            .ok_or_else(|| ProjectServiceError::UnknownEmail(address.to_string()))
    }

    async fn apply_role(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        role: Role,
    ) -> ProjectServiceResult<RoleChange> {
        let subject = self.load_user(user_id).await?;

        let (_, (change, user)) = self
            .mutate_project(project_id, move |project, clock| {
                let mut user = subject;
                let change = apply_role_change(project, &mut user, role, clock)?;
                Ok((change, user))
            })
            .await?;
        self.users.update(&user).await?;

        info!(
            project_id = %project_id,
            user_id = %user_id,
            previous_role = %change.previous_role,
            new_role = %change.new_role,
            promoted_to_lead = change.promoted_to_lead(),
            "updated member role"
        );
        Ok(change)
    }

    async fn mutate_project<T, F>(
        &self,
        project_id: ProjectId,
        mutate: F,
    ) -> ProjectServiceResult<(Project, T)>
    where
        F: FnOnce(&mut Project, &C) -> Result<T, ProjectDomainError> + Send + 'static,
        T: Send + 'static,
    {
        let clock = Arc::clone(&self.clock);
        let mutation = self
            .projects
            .modify(project_id, move |project| mutate(project, &*clock))
            .await
            .map_err(project_write_error)?;
        mutation.map_err(ProjectServiceError::from)
    }

    async fn load_project(&self, project_id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))
    }

    async fn load_user(&self, user_id: UserId) -> ProjectServiceResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ProjectServiceError::UserNotFound(user_id))
    }
}

fn project_write_error(err: ProjectRepositoryError) -> ProjectServiceError {
    match err {
        ProjectRepositoryError::NotFound(id) => ProjectServiceError::ProjectNotFound(id),
        ProjectRepositoryError::DuplicateProjectKey(key) => {
            ProjectServiceError::DuplicateProjectKey(key)
        }
        other => ProjectServiceError::ProjectRepository(other),
    }
}
