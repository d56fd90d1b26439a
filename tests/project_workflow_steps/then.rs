//! Then steps for project workflow BDD scenarios.

use super::world::ProjectWorld;
use keystone::error::ErrorCategory;
use keystone::project::{domain::ProjectDomainError, services::ProjectServiceError};
use keystone::report::services::ReportView;
use rstest_bdd_macros::then;

fn last_report(world: &ProjectWorld) -> Result<&ReportView, eyre::Report> {
    world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing generated report"))
}

#[then(r#""{email}" leads the project"#)]
fn user_leads(world: &mut ProjectWorld, email: String) -> Result<(), eyre::Report> {
    let user = world.user(&email)?;
    let project = world.reload_project()?;
    if project.lead() != Some(user.id()) {
        return Err(eyre::eyre!(
            "expected {email} to lead, found {:?}",
            project.lead()
        ));
    }
    Ok(())
}

#[then(r#""{email}" is a member of the project"#)]
fn user_is_member(world: &mut ProjectWorld, email: String) -> Result<(), eyre::Report> {
    let user = world.user(&email)?;
    let project = world.reload_project()?;
    if !project.is_member(user.id()) {
        return Err(eyre::eyre!("expected {email} to be a member"));
    }
    Ok(())
}

#[then("the operation fails because the lead cannot be removed")]
fn fails_cannot_remove_lead(world: &ProjectWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_membership_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing membership result"))?;

    if !matches!(
        result,
        Err(ProjectServiceError::Domain(
            ProjectDomainError::CannotRemoveLead { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected CannotRemoveLead error, got {result:?}"));
    }
    Ok(())
}

#[then("the operation fails with a conflict")]
fn fails_with_conflict(world: &ProjectWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_membership_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing membership result"))?;

    match result {
        Err(err) if err.category() == ErrorCategory::Conflict => Ok(()),
        other => Err(eyre::eyre!("expected a conflict, got {other:?}")),
    }
}

#[then(r#"the issued task keys are "{keys}""#)]
fn issued_keys(world: &ProjectWorld, keys: String) -> Result<(), eyre::Report> {
    let issued: Vec<String> = world
        .created_tasks
        .iter()
        .map(|task| task.key().to_string())
        .collect();
    let expected: Vec<String> = keys.split(", ").map(str::to_owned).collect();
    if issued != expected {
        return Err(eyre::eyre!("expected keys {expected:?}, found {issued:?}"));
    }
    Ok(())
}

#[then(r#"the report title is "{title}""#)]
fn report_title_is(world: &ProjectWorld, title: String) -> Result<(), eyre::Report> {
    let report = last_report(world)?;
    if report.title != title {
        return Err(eyre::eyre!("expected title {title}, found {}", report.title));
    }
    Ok(())
}

#[then(r#"the report type is "{report_type}""#)]
fn report_type_is(world: &ProjectWorld, report_type: String) -> Result<(), eyre::Report> {
    let report = last_report(world)?;
    if report.report_type.as_str() != report_type {
        return Err(eyre::eyre!(
            "expected type {report_type}, found {}",
            report.report_type
        ));
    }
    Ok(())
}

#[then(r#"the report content contains "{fragment}""#)]
fn report_contains(world: &ProjectWorld, fragment: String) -> Result<(), eyre::Report> {
    let report = last_report(world)?;
    if !report.content.contains(&fragment) {
        return Err(eyre::eyre!(
            "expected content to contain {fragment:?}:\n{}",
            report.content
        ));
    }
    Ok(())
}
