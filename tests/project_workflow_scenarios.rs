//! Behaviour tests for project membership, task keys and report fallback.

mod project_workflow_steps;

use project_workflow_steps::world::{ProjectWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/project_membership.feature",
    name = "The lead cannot be removed from the project"
)]
#[tokio::test(flavor = "multi_thread")]
async fn lead_cannot_be_removed(world: ProjectWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_membership.feature",
    name = "Changing the lead to an outsider adds them as a member"
)]
#[tokio::test(flavor = "multi_thread")]
async fn lead_change_adds_membership(world: ProjectWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_membership.feature",
    name = "Granting product owner promotes a member to lead"
)]
#[tokio::test(flavor = "multi_thread")]
async fn product_owner_promotes_to_lead(world: ProjectWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_membership.feature",
    name = "Role names are matched exactly"
)]
#[tokio::test(flavor = "multi_thread")]
async fn role_names_match_exactly(world: ProjectWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_membership.feature",
    name = "Task keys are issued from the project key"
)]
#[tokio::test(flavor = "multi_thread")]
async fn task_keys_follow_project_key(world: ProjectWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/report_generation.feature",
    name = "Status report shows the completion percentage"
)]
#[tokio::test(flavor = "multi_thread")]
async fn status_report_completion(world: ProjectWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/report_generation.feature",
    name = "Unknown report types produce a custom report"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_type_is_custom(world: ProjectWorld) {
    let _ = world;
}
