//! Domain tests for task keys, sequences and attributes.

use crate::project::domain::{ProjectId, ProjectKey, UserId};
use crate::task::domain::{
    TaskDomainError, TaskDraft, TaskKey, TaskPriority, TaskSequence, TaskStatus, TaskType,
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
fn first_key_of_a_project_is_one() {
    let project_key = ProjectKey::new("TP").expect("valid key");
    let sequence = TaskSequence::after_count(0).expect("first sequence");

    let key = TaskKey::allocate(&project_key, sequence);

    assert_eq!(key.to_string(), "TP-1");
    assert_eq!(sequence, TaskSequence::FIRST);
}

#[rstest]
fn sequence_advances_by_one() {
    let next = TaskSequence::FIRST.next().expect("second sequence");

    assert_eq!(next.value(), 2);
}

#[rstest]
#[case(0)]
#[case(u64::MAX)]
fn sequence_rejects_out_of_range_values(#[case] raw: u64) {
    assert_eq!(
        TaskSequence::new(raw),
        Err(TaskDomainError::InvalidSequence(raw))
    );
}

#[rstest]
#[case("TP-12", "TP", 12)]
#[case("CORE-1", "CORE", 1)]
#[case("A-B-3", "A-B", 3)]
fn task_key_parses_prefix_and_number(
    #[case] raw: &str,
    #[case] prefix: &str,
    #[case] number: u64,
) {
    let key = TaskKey::parse(raw).expect("valid key");

    assert_eq!(key.prefix(), prefix);
    assert_eq!(key.sequence().value(), number);
    assert_eq!(key.to_string(), raw);
}

#[rstest]
#[case("TP")]
#[case("-3")]
#[case("TP-")]
#[case("TP-0")]
#[case("TP-+3")]
#[case("TP-x1")]
fn task_key_rejects_malformed_values(#[case] raw: &str) {
    assert_eq!(
        TaskKey::parse(raw),
        Err(TaskDomainError::InvalidTaskKey(raw.to_owned()))
    );
}

#[rstest]
fn task_key_serialises_as_string() {
    let key = TaskKey::parse("TP-7").expect("valid key");

    let json = serde_json::to_string(&key).expect("serialises");

    assert_eq!(json, "\"TP-7\"");
    let decoded: TaskKey = serde_json::from_str(&json).expect("deserialises");
    assert_eq!(decoded, key);
}

#[rstest]
fn draft_rejects_blank_title() {
    let result = TaskDraft::new(ProjectId::new(), UserId::new(), "   ", &DefaultClock);

    assert_eq!(result, Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn draft_becomes_task_with_defaults() {
    let draft = TaskDraft::new(ProjectId::new(), UserId::new(), " Write docs ", &DefaultClock)
        .expect("valid draft");
    let key = TaskKey::parse("TP-1").expect("valid key");

    let task = draft.clone().into_task(key.clone());

    assert_eq!(task.id(), draft.id());
    assert_eq!(task.key(), &key);
    assert_eq!(task.title(), "Write docs");
    assert_eq!(task.status(), TaskStatus::Todo);
    assert_eq!(task.priority(), TaskPriority::Medium);
    assert_eq!(task.task_type(), TaskType::Task);
    assert_eq!(task.assignee(), None);
}

#[rstest]
#[case("TODO", TaskStatus::Todo)]
#[case("IN_PROGRESS", TaskStatus::InProgress)]
#[case("IN_REVIEW", TaskStatus::InReview)]
#[case("DONE", TaskStatus::Done)]
fn status_names_round_trip(#[case] raw: &str, #[case] status: TaskStatus) {
    assert_eq!(TaskStatus::try_from(raw), Ok(status));
    assert_eq!(status.as_str(), raw);
}

#[rstest]
fn attribute_parsing_is_case_sensitive() {
    let err = TaskPriority::try_from("high").expect_err("lower case is rejected");

    assert_eq!(err.attribute, "priority");
    assert_eq!(err.value, "high");
}
