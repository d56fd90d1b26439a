//! Task key allocation through the task service.

use std::collections::HashSet;
use std::sync::Arc;

use super::helpers::{Engine, engine, seed};
use keystone::task::services::CreateTaskRequest;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_keys_follow_project_key(engine: Engine) {
    let (project, _, _) = seed(&engine).await;

    let mut keys = Vec::new();
    for title in ["a", "b", "c"] {
        let task = engine
            .tasks
            .create_task(project.id(), "alice@example.com", CreateTaskRequest::new(title))
            .await
            .expect("task created");
        keys.push(task.key().to_string());
    }

    assert_eq!(keys, ["TP-1", "TP-2", "TP-3"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_creations_never_share_a_key(engine: Engine) {
    const CREATIONS: usize = 40;
    let (project, _, _) = seed(&engine).await;
    let tasks = Arc::new(engine.tasks);

    let handles: Vec<_> = (0..CREATIONS)
        .map(|index| {
            let service = Arc::clone(&tasks);
            let project_id = project.id();
            tokio::spawn(async move {
                service
                    .create_task(
                        project_id,
                        "alice@example.com",
                        CreateTaskRequest::new(format!("task {index}")),
                    )
                    .await
            })
        })
        .collect();

    let mut keys = HashSet::new();
    for handle in handles {
        let task = handle.await.expect("join").expect("task created");
        assert!(keys.insert(task.key().to_string()), "duplicate key issued");
    }

    assert_eq!(keys.len(), CREATIONS);
    assert!(keys.contains("TP-1"));
    assert!(keys.contains(&format!("TP-{CREATIONS}")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_keys_are_not_reused(engine: Engine) {
    let (project, _, _) = seed(&engine).await;
    let first = engine
        .tasks
        .create_task(project.id(), "alice@example.com", CreateTaskRequest::new("a"))
        .await
        .expect("task created");
    engine.tasks.delete_task(first.id()).await.expect("deleted");

    let second = engine
        .tasks
        .create_task(project.id(), "alice@example.com", CreateTaskRequest::new("b"))
        .await
        .expect("task created");

    assert_eq!(second.key().to_string(), "TP-2");
}
