//! Report synthesis over tasks created through the task service.

use super::helpers::{Engine, engine, seed};
use keystone::report::domain::ReportType;
use keystone::task::{domain::TaskStatus, services::CreateTaskRequest};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sprint_analysis_reflects_task_progress(engine: Engine) {
    let (project, _, bob) = seed(&engine).await;
    engine
        .membership
        .add_member(project.id(), bob.id())
        .await
        .expect("bob joins");
    for (title, status) in [
        ("a", TaskStatus::Done),
        ("b", TaskStatus::Done),
        ("c", TaskStatus::Done),
        ("d", TaskStatus::InReview),
    ] {
        let task = engine
            .tasks
            .create_task(project.id(), "alice@example.com", CreateTaskRequest::new(title))
            .await
            .expect("task created");
        engine
            .tasks
            .update_status(task.id(), status)
            .await
            .expect("status updated");
    }

    let view = engine
        .reports
        .generate_report(project.id(), "bob@example.com", "Sprint 12", "SPRINT_ANALYSIS")
        .await
        .expect("report generated");

    assert_eq!(view.title, "Test Project - Sprint analysis");
    assert_eq!(view.author.name, "Bob");
    assert!(view.content.contains("with 3 completed (75% completion rate)"));
    assert!(view.content.contains("trending positively"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reports_list_newest_first_per_project(engine: Engine) {
    let (project, alice, _) = seed(&engine).await;
    let mut generated = Vec::new();
    for requested in ["STATUS_REPORT", "RISK_ASSESSMENT", "nonsense"] {
        let view = engine
            .reports
            .generate_report(project.id(), "alice@example.com", "p", requested)
            .await
            .expect("report generated");
        generated.push(view);
    }

    let listed = engine
        .reports
        .reports_for_project(project.id())
        .await
        .expect("listed");
    let custom = engine
        .reports
        .reports_by_type(project.id(), ReportType::Custom)
        .await
        .expect("listed");
    let by_alice = engine
        .reports
        .reports_by_author(alice.id())
        .await
        .expect("listed");

    assert_eq!(listed.len(), 3);
    assert!(
        listed
            .windows(2)
            .all(|pair| pair.first().map(|view| view.created_at)
                >= pair.get(1).map(|view| view.created_at))
    );
    assert_eq!(custom.len(), 1);
    assert_eq!(by_alice.len(), generated.len());
}
