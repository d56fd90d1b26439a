//! Identifier allocation tests against the in-memory repository.

use std::collections::HashSet;
use std::sync::Arc;

use crate::project::domain::{ProjectId, ProjectKey, UserId};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskDraft, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn repository() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

#[fixture]
fn project_key() -> ProjectKey {
    ProjectKey::new("TP").expect("valid key")
}

fn draft(project_id: ProjectId, title: &str) -> TaskDraft {
    TaskDraft::new(project_id, UserId::new(), title, &DefaultClock).expect("valid draft")
}

#[rstest]
#[tokio::test]
async fn keys_are_issued_sequentially(repository: InMemoryTaskRepository, project_key: ProjectKey) {
    let project_id = ProjectId::new();

    let first = repository
        .allocate_and_store(&project_key, draft(project_id, "first"))
        .await
        .expect("first task stored");
    let second = repository
        .allocate_and_store(&project_key, draft(project_id, "second"))
        .await
        .expect("second task stored");

    assert_eq!(first.key().to_string(), "TP-1");
    assert_eq!(second.key().to_string(), "TP-2");
}

#[rstest]
#[tokio::test]
async fn counters_are_independent_per_project(repository: InMemoryTaskRepository) {
    let alpha = ProjectKey::new("AL").expect("valid key");
    let beta = ProjectKey::new("BE").expect("valid key");

    let alpha_task = repository
        .allocate_and_store(&alpha, draft(ProjectId::new(), "alpha"))
        .await
        .expect("alpha task stored");
    let beta_task = repository
        .allocate_and_store(&beta, draft(ProjectId::new(), "beta"))
        .await
        .expect("beta task stored");

    assert_eq!(alpha_task.key().to_string(), "AL-1");
    assert_eq!(beta_task.key().to_string(), "BE-1");
}

#[rstest]
#[tokio::test]
async fn rejected_insert_does_not_consume_a_number(
    repository: InMemoryTaskRepository,
    project_key: ProjectKey,
) {
    let project_id = ProjectId::new();
    let submitted = draft(project_id, "retried");

    repository
        .allocate_and_store(&project_key, submitted.clone())
        .await
        .expect("first submission stored");
    let retry = repository
        .allocate_and_store(&project_key, submitted.clone())
        .await;
    let next = repository
        .allocate_and_store(&project_key, draft(project_id, "next"))
        .await
        .expect("next task stored");

    assert!(matches!(retry, Err(TaskRepositoryError::DuplicateTask(id)) if id == submitted.id()));
    assert_eq!(next.key().to_string(), "TP-2");
}

#[rstest]
#[tokio::test]
async fn deleted_keys_are_never_reissued(
    repository: InMemoryTaskRepository,
    project_key: ProjectKey,
) {
    let project_id = ProjectId::new();
    repository
        .allocate_and_store(&project_key, draft(project_id, "one"))
        .await
        .expect("stored");
    let two = repository
        .allocate_and_store(&project_key, draft(project_id, "two"))
        .await
        .expect("stored");

    repository.delete(two.id()).await.expect("deleted");
    let three = repository
        .allocate_and_store(&project_key, draft(project_id, "three"))
        .await
        .expect("stored");

    assert_eq!(three.key().to_string(), "TP-3");
    assert_eq!(
        repository.count_by_project(project_id).await.expect("counted"),
        2
    );
}

#[rstest]
#[tokio::test]
async fn delete_for_project_restarts_numbering(
    repository: InMemoryTaskRepository,
    project_key: ProjectKey,
) {
    let project_id = ProjectId::new();
    for title in ["one", "two"] {
        repository
            .allocate_and_store(&project_key, draft(project_id, title))
            .await
            .expect("stored");
    }

    let removed = repository
        .delete_for_project(project_id)
        .await
        .expect("removed");
    let fresh = repository
        .allocate_and_store(&project_key, draft(project_id, "fresh"))
        .await
        .expect("stored");

    assert_eq!(removed, 2);
    assert_eq!(fresh.key().to_string(), "TP-1");
}

#[rstest]
#[tokio::test]
async fn deleting_unknown_task_is_not_found(repository: InMemoryTaskRepository) {
    let missing = TaskId::new();

    let result = repository.delete(missing).await;

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_issue_distinct_keys(project_key: ProjectKey) {
    const CREATIONS: usize = 64;
    let repository = Arc::new(InMemoryTaskRepository::new());
    let project_id = ProjectId::new();

    let handles: Vec<_> = (0..CREATIONS)
        .map(|index| {
            let shared = Arc::clone(&repository);
            let prefix = project_key.clone();
            tokio::spawn(async move {
                shared
                    .allocate_and_store(&prefix, draft(project_id, &format!("task {index}")))
                    .await
            })
        })
        .collect();

    let mut keys = HashSet::new();
    for handle in handles {
        let task = handle.await.expect("join").expect("task stored");
        keys.insert(task.key().to_string());
    }

    assert_eq!(keys.len(), CREATIONS);
    let expected: HashSet<String> = (1..=CREATIONS).map(|n| format!("TP-{n}")).collect();
    assert_eq!(keys, expected);
}
