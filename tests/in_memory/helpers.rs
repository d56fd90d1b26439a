//! Shared fixtures wiring every service over one set of in-memory stores.

use std::sync::Arc;

use keystone::project::{
    adapters::memory::{InMemoryProjectRepository, InMemoryUserRepository},
    domain::{Project, User},
    services::{CreateProjectRequest, ProjectMembershipService, ProjectRemovalService},
};
use keystone::report::{
    adapters::memory::InMemoryReportRepository,
    services::{ReportContentGenerator, ReportStores, ReportSynthesisService},
};
use keystone::task::{adapters::memory::InMemoryTaskRepository, services::TaskService};
use mockable::DefaultClock;
use rstest::fixture;

/// Membership service over in-memory stores.
pub type Membership =
    ProjectMembershipService<InMemoryProjectRepository, InMemoryUserRepository, DefaultClock>;

/// Task service over in-memory stores.
pub type Tasks = TaskService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    InMemoryUserRepository,
    DefaultClock,
>;

/// Report service over in-memory stores.
pub type Reports = ReportSynthesisService<
    InMemoryReportRepository,
    InMemoryProjectRepository,
    InMemoryUserRepository,
    InMemoryTaskRepository,
    DefaultClock,
>;

/// Removal service over in-memory stores.
pub type Removal = ProjectRemovalService<
    InMemoryProjectRepository,
    InMemoryTaskRepository,
    InMemoryReportRepository,
>;

/// Every engine service sharing the same stores.
pub struct Engine {
    /// Project lifecycle and membership.
    pub membership: Membership,
    /// Task creation and key allocation.
    pub tasks: Tasks,
    /// Report synthesis and queries.
    pub reports: Reports,
    /// Project deletion.
    pub removal: Removal,
}

/// Builds an engine whose reports use the fallback templates.
#[fixture]
pub fn engine() -> Engine {
    crate::test_helpers::init_tracing();

    let projects = Arc::new(InMemoryProjectRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let task_store = Arc::new(InMemoryTaskRepository::new());
    let report_store = Arc::new(InMemoryReportRepository::new());
    let clock = Arc::new(DefaultClock);

    Engine {
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
                reports: Arc::clone(&report_store),
                projects: Arc::clone(&projects),
                users,
                tasks: Arc::clone(&task_store),
            },
            ReportContentGenerator::fallback(),
            clock,
        ),
        removal: ProjectRemovalService::new(projects, task_store, report_store),
    }
}

/// Registers Alice and Bob and creates project `TP` led by Alice.
///
/// # Panics
///
/// Panics if the seed data is rejected.
pub async fn seed(engine: &Engine) -> (Project, User, User) {
    let alice = engine
        .membership
        .register_user("Alice", "alice@example.com")
        .await
        .expect("alice registers");
    let bob = engine
        .membership
        .register_user("Bob", "bob@example.com")
        .await
        .expect("bob registers");
    let project = engine
        .membership
        .create_project(
            CreateProjectRequest::new("Test Project", "TP", "alice@example.com")
                .with_description("Rules engine rollout"),
        )
        .await
        .expect("project is created");
    (project, alice, bob)
}
