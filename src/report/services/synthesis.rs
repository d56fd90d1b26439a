//! Report synthesis and report queries.

use super::content::{ReportContentError, ReportContentGenerator};
use crate::error::ErrorCategory;
use crate::project::{
    domain::{EmailAddress, Project, ProjectId, ProjectKey, User, UserId},
    ports::{ProjectRepository, ProjectRepositoryError, UserRepository, UserRepositoryError},
};
use crate::report::{
    domain::{NewReport, Report, ReportContext, ReportId, ReportType, report_title},
    ports::{ReportRepository, ReportRepositoryError},
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Project fields carried by a report view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project key.
    pub key: ProjectKey,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            name: project.name().to_owned(),
            key: project.key().clone(),
        }
    }
}

/// Author fields carried by a report view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: EmailAddress,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_owned(),
            email: user.email().clone(),
        }
    }
}

/// Client-facing projection of a persisted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    /// Report identifier.
    pub id: ReportId,
    /// Report title.
    pub title: String,
    /// Generated content.
    pub content: String,
    /// Report type.
    pub report_type: ReportType,
    /// Reported project.
    pub project: ProjectSummary,
    /// Requesting user.
    pub author: AuthorSummary,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ReportView {
    fn assemble(report: &Report, project: ProjectSummary, author: AuthorSummary) -> Self {
        Self {
            id: report.id(),
            title: report.title().to_owned(),
            content: report.content().to_owned(),
            report_type: report.report_type(),
            project,
            author,
            created_at: report.created_at(),
            updated_at: report.updated_at(),
        }
    }
}

/// Service-level errors for report operations.
#[derive(Debug, Error)]
pub enum ReportServiceError {
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No user is registered with the email address.
    #[error("no user registered with email {0}")]
    UnknownEmail(String),

    /// The report does not exist.
    #[error("report not found: {0}")]
    ReportNotFound(ReportId),

    /// Report content could not be produced.
    #[error(transparent)]
    Content(#[from] ReportContentError),

    /// Report repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReportRepositoryError),

    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

impl ReportServiceError {
    /// Classifies the error for request layers.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound(_)
            | Self::UserNotFound(_)
            | Self::UnknownEmail(_)
            | Self::ReportNotFound(_)
            | Self::Repository(ReportRepositoryError::NotFound(_))
            | Self::ProjectRepository(ProjectRepositoryError::NotFound(_))
            | Self::UserRepository(UserRepositoryError::NotFound(_))
            | Self::TaskRepository(TaskRepositoryError::NotFound(_)) => ErrorCategory::NotFound,
            Self::Content(_)
            | Self::Repository(_)
            | Self::ProjectRepository(_)
            | Self::UserRepository(_)
            | Self::TaskRepository(_) => ErrorCategory::Internal,
        }
    }
}

/// Result type for report service operations.
pub type ReportServiceResult<T> = Result<T, ReportServiceError>;

/// Report synthesis pipeline and query service.
#[derive(Clone)]
pub struct ReportSynthesisService<R, P, U, T, C>
where
    R: ReportRepository,
    P: ProjectRepository,
    U: UserRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    reports: Arc<R>,
    projects: Arc<P>,
    users: Arc<U>,
    tasks: Arc<T>,
    content: ReportContentGenerator,
    clock: Arc<C>,
}

/// Repositories read and written by [`ReportSynthesisService`].
#[derive(Debug)]
pub struct ReportStores<R, P, U, T> {
    /// Report persistence.
    pub reports: Arc<R>,
    /// Project lookup.
    pub projects: Arc<P>,
    /// User lookup.
    pub users: Arc<U>,
    /// Task listing.
    pub tasks: Arc<T>,
}

impl<R, P, U, T, C> ReportSynthesisService<R, P, U, T, C>
where
    R: ReportRepository,
    P: ProjectRepository,
    U: UserRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new report service.
    #[must_use]
    pub fn new(
        stores: ReportStores<R, P, U, T>,
        content: ReportContentGenerator,
        clock: Arc<C>,
    ) -> Self {
        let ReportStores {
            reports,
            projects,
            users,
            tasks,
        } = stores;
        Self {
            reports,
            projects,
            users,
            tasks,
            content,
            clock,
        }
    }

    /// Generates and persists a report about the project for the user
    /// registered under `author_email`.
    ///
    /// `requested_type` is matched case-sensitively; unknown names produce
    /// a [`ReportType::Custom`] report. Nothing is persisted when an error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown project or author, or a
    /// repository error when loading or storing fails.
    pub async fn generate_report(
        &self,
        project_id: ProjectId,
        author_email: &str,
        prompt: &str,
        requested_type: &str,
    ) -> ReportServiceResult<ReportView> {
        let project = self.load_project(project_id).await?;
        let author = self.user_by_email(author_email).await?;
        let report_type = ReportType::parse_or_custom(requested_type);
        if report_type.as_str() != requested_type {
            debug!(requested = requested_type, "unrecognised report type; using CUSTOM");
        }

        let tasks = self.tasks.find_by_project(project.id()).await?;
        let lead = match project.lead() {
            Some(lead_id) => self.users.find_by_id(lead_id).await?,
            None => None,
        };
        let context = ReportContext::build(&project, lead.as_ref(), &tasks);
        let content = self.content.generate(&context, prompt, report_type).await?;

        let report = Report::new(
            NewReport {
                project_id: project.id(),
                author_id: author.id(),
                title: report_title(project.name(), report_type),
                report_type,
                prompt: prompt.to_owned(),
                content,
            },
            &*self.clock,
        );
        self.reports.store(&report).await?;

        info!(
            report_id = %report.id(),
            project_id = %project.id(),
            report_type = %report_type,
            "persisted generated report"
        );
        Ok(ReportView::assemble(
            &report,
            ProjectSummary::from(&project),
            AuthorSummary::from(&author),
        ))
    }

    /// Returns one report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::ReportNotFound`] when absent.
    pub async fn report(&self, report_id: ReportId) -> ReportServiceResult<ReportView> {
        let report = self
            .reports
            .find_by_id(report_id)
            .await?
            .ok_or(ReportServiceError::ReportNotFound(report_id))?;
        let mut views = self.project_views(vec![report]).await?;
        views.pop().ok_or(ReportServiceError::ReportNotFound(report_id))
    }

    /// Returns the project's reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::ProjectNotFound`] for an unknown
    /// project.
    pub async fn reports_for_project(
        &self,
        project_id: ProjectId,
    ) -> ReportServiceResult<Vec<ReportView>> {
        let project = self.load_project(project_id).await?;
        let reports = self.reports.find_by_project(project.id()).await?;
        debug!(project_id = %project_id, count = reports.len(), "listed project reports");
        self.project_views(reports).await
    }

    /// Returns the reports written by the user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::UserNotFound`] for an unknown user.
    pub async fn reports_by_author(
        &self,
        author_id: UserId,
    ) -> ReportServiceResult<Vec<ReportView>> {
        let author = self.load_user(author_id).await?;
        let reports = self.reports.find_by_author(author.id()).await?;
        debug!(user_id = %author_id, count = reports.len(), "listed authored reports");
        self.project_views(reports).await
    }

    /// Returns the project's reports of one type, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::ProjectNotFound`] for an unknown
    /// project.
    pub async fn reports_by_type(
        &self,
        project_id: ProjectId,
        report_type: ReportType,
    ) -> ReportServiceResult<Vec<ReportView>> {
        let project = self.load_project(project_id).await?;
        let reports = self
            .reports
            .find_by_project_and_type(project.id(), report_type)
            .await?;
        self.project_views(reports).await
    }

    /// Deletes a report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::ReportNotFound`] when absent.
    pub async fn delete_report(&self, report_id: ReportId) -> ReportServiceResult<()> {
        self.reports.delete(report_id).await.map_err(|err| match err {
            ReportRepositoryError::NotFound(id) => ReportServiceError::ReportNotFound(id),
            other => ReportServiceError::Repository(other),
        })?;
        info!(report_id = %report_id, "deleted report");
        Ok(())
    }

    async fn project_views(&self, reports: Vec<Report>) -> ReportServiceResult<Vec<ReportView>> {
        let mut projects: HashMap<ProjectId, ProjectSummary> = HashMap::new();
        let mut authors: HashMap<UserId, AuthorSummary> = HashMap::new();
        let mut views = Vec::with_capacity(reports.len());

        for report in reports {
            let project = match projects.get(&report.project_id()) {
                Some(summary) => summary.clone(),
                None => {
                    let loaded = self.load_project(report.project_id()).await?;
                    let summary = ProjectSummary::from(&loaded);
                    projects.insert(report.project_id(), summary.clone());
                    summary
                }
            };
            let author = match authors.get(&report.author_id()) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = AuthorSummary::from(&self.load_user(report.author_id()).await?);
                    authors.insert(report.author_id(), summary.clone());
                    summary
                }
            };
            views.push(ReportView::assemble(&report, project, author));
        }
        Ok(views)
    }

    async fn load_project(&self, project_id: ProjectId) -> ReportServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(ReportServiceError::ProjectNotFound(project_id))
    }

    async fn load_user(&self, user_id: UserId) -> ReportServiceResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ReportServiceError::UserNotFound(user_id))
    }

    async fn user_by_email(&self, email: &str) -> ReportServiceResult<User> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(ReportServiceError::UnknownEmail(email.trim().to_owned()));
        };
        self.users
            .find_by_email(&address)
            .await?
            .ok_or_else(|| ReportServiceError::UnknownEmail(address.to_string()))
    }
}
