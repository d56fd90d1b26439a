//! Membership, leadership and removal flows across services.

use super::helpers::{Engine, engine, seed};
use keystone::error::ErrorCategory;
use keystone::project::{
    domain::{ProjectDomainError, Role},
    services::{ProjectRemovalError, ProjectServiceError},
};
use keystone::task::services::CreateTaskRequest;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn promoted_owner_leads_and_old_lead_stays_member(engine: Engine) {
    let (project, alice, bob) = seed(&engine).await;
    engine
        .membership
        .add_member(project.id(), bob.id())
        .await
        .expect("bob joins");

    let change = engine
        .membership
        .update_member_role(project.id(), bob.id(), "PRODUCT_OWNER")
        .await
        .expect("bob is promoted");
    let reloaded = engine.membership.project(project.id()).await.expect("found");

    assert_eq!(change.new_role, Role::ProductOwner);
    assert_eq!(reloaded.lead(), Some(bob.id()));
    assert!(reloaded.is_member(alice.id()));
    assert!(reloaded.members().contains(&bob.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn former_lead_can_leave_after_handover(engine: Engine) {
    let (project, alice, bob) = seed(&engine).await;

    let blocked = engine
        .membership
        .remove_member(project.id(), alice.id())
        .await
        .expect_err("lead cannot leave");
    engine
        .membership
        .change_lead(project.id(), bob.id())
        .await
        .expect("lead changes");
    let after = engine
        .membership
        .remove_member(project.id(), alice.id())
        .await
        .expect("alice leaves");

    assert!(matches!(
        blocked,
        ProjectServiceError::Domain(ProjectDomainError::CannotRemoveLead { .. })
    ));
    assert_eq!(after.lead(), Some(bob.id()));
    assert_eq!(after.team_size(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removal_deletes_tasks_and_reports(engine: Engine) {
    let (project, _, _) = seed(&engine).await;
    for title in ["one", "two"] {
        engine
            .tasks
            .create_task(project.id(), "alice@example.com", CreateTaskRequest::new(title))
            .await
            .expect("task created");
    }
    engine
        .reports
        .generate_report(project.id(), "alice@example.com", "p", "STATUS_REPORT")
        .await
        .expect("report generated");

    let summary = engine
        .removal
        .delete_project(project.id())
        .await
        .expect("project removed");
    let missing = engine
        .membership
        .project(project.id())
        .await
        .expect_err("project is gone");
    let again = engine
        .removal
        .delete_project(project.id())
        .await
        .expect_err("already removed");

    assert_eq!(summary.tasks_removed, 2);
    assert_eq!(summary.reports_removed, 1);
    assert_eq!(missing.category(), ErrorCategory::NotFound);
    assert!(matches!(again, ProjectRemovalError::ProjectNotFound(_)));
    assert_eq!(again.category(), ErrorCategory::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renaming_key_keeps_issued_task_keys(engine: Engine) {
    use keystone::project::services::UpdateProjectRequest;

    let (project, _, _) = seed(&engine).await;
    let before = engine
        .tasks
        .create_task(project.id(), "alice@example.com", CreateTaskRequest::new("old"))
        .await
        .expect("task created");
    engine
        .membership
        .update_project_details(project.id(), UpdateProjectRequest::new("Renamed", "RN"))
        .await
        .expect("renamed");

    let after = engine
        .tasks
        .create_task(project.id(), "alice@example.com", CreateTaskRequest::new("new"))
        .await
        .expect("task created");
    let refetched = engine.tasks.task(before.id()).await.expect("found");

    assert_eq!(refetched.key().to_string(), "TP-1");
    assert_eq!(after.key().to_string(), "RN-2");
}
