//! Shared world state for project workflow BDD scenarios.

use std::sync::Arc;

use keystone::project::{
    adapters::memory::{InMemoryProjectRepository, InMemoryUserRepository},
    domain::{Project, User},
    services::{ProjectMembershipService, ProjectServiceError},
};
use keystone::report::{
    adapters::memory::InMemoryReportRepository,
    services::{ReportContentGenerator, ReportStores, ReportSynthesisService, ReportView},
};
use keystone::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::TaskService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Membership service used by the BDD world.
pub type TestMembershipService =
    ProjectMembershipService<InMemoryProjectRepository, InMemoryUserRepository, DefaultClock>;

/// Task service used by the BDD world.
pub type TestTaskService = TaskService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryUserRepository,
    DefaultClock,
>;

/// Report service used by the BDD world.
pub type TestReportService = ReportSynthesisService<
    InMemoryReportRepository,
    InMemoryProjectRepository,
    InMemoryUserRepository,
    InMemoryTaskRepository,
    DefaultClock,
>;

/// Scenario world for project workflow behaviour tests.
pub struct ProjectWorld {
    pub membership: TestMembershipService,
    pub tasks: TestTaskService,
    pub reports: TestReportService,
    pub project: Option<Project>,
    pub created_tasks: Vec<Task>,
    pub last_membership_result: Option<Result<(), ProjectServiceError>>,
    pub last_report: Option<ReportView>,
}

impl ProjectWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let projects = Arc::new(InMemoryProjectRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let task_store = Arc::new(InMemoryTaskRepository::new());
        let clock = Arc::new(DefaultClock);

        Self {
            membership: ProjectMembershipService::new(
                Arc::clone(&projects),
                Arc::clone(&users),
                Arc::clone(&clock),
            ),
            tasks: TaskService::new(
                Arc::clone(&task_store),
                Arc::clone(&projects),
                Arc::clone(&users),
                Arc::clone(&clock),
            ),
            reports: ReportSynthesisService::new(
                ReportStores {
                    reports: Arc::new(InMemoryReportRepository::new()),
                    projects,
                    users,
                    tasks: task_store,
                },
                ReportContentGenerator::fallback(),
                clock,
            ),
            project: None,
            created_tasks: Vec::new(),
            last_membership_result: None,
            last_report: None,
        }
    }

    /// Returns the scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was created by a previous step.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Resolves a registered user by email.
    ///
    /// # Errors
    ///
    /// Returns an error when no user is registered with the address.
    pub fn user(&self, email: &str) -> Result<User, eyre::Report> {
        run_async(self.membership.user_by_email(email))
            .map_err(|err| eyre::eyre!("resolve user {email}: {err}"))
    }

    /// Reloads the scenario project from its store.
    ///
    /// # Errors
    ///
    /// Returns an error when the project cannot be loaded.
    pub fn reload_project(&mut self) -> Result<Project, eyre::Report> {
        let project_id = self.project()?.id();
        let project = run_async(self.membership.project(project_id))
            .map_err(|err| eyre::eyre!("reload project: {err}"))?;
        self.project = Some(project.clone());
        Ok(project)
    }
}

impl Default for ProjectWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProjectWorld {
    ProjectWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
