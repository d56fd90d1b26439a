//! When steps for project workflow BDD scenarios.

use super::world::{ProjectWorld, run_async};
use eyre::WrapErr;
use keystone::task::services::CreateTaskRequest;
use rstest_bdd_macros::when;

#[when(r#""{email}" is removed from the project"#)]
fn remove_member(world: &mut ProjectWorld, email: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let user = world.user(&email)?;
    let result = run_async(world.membership.remove_member(project_id, user.id()));
    world.last_membership_result = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"the lead is changed to "{email}""#)]
fn change_lead(world: &mut ProjectWorld, email: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let user = world.user(&email)?;
    let result = run_async(world.membership.change_lead(project_id, user.id()));
    world.last_membership_result = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"the role of "{email}" is set to "{role}""#)]
fn set_role(world: &mut ProjectWorld, email: String, role: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let user = world.user(&email)?;
    let result = run_async(
        world
            .membership
            .update_member_role(project_id, user.id(), &role),
    );
    world.last_membership_result = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"{count:u64} tasks are created by "{email}""#)]
fn create_tasks(
    world: &mut ProjectWorld,
    count: u64,
    email: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    for index in 0..count {
        let task = run_async(world.tasks.create_task(
            project_id,
            &email,
            CreateTaskRequest::new(format!("task {index}")),
        ))
        .wrap_err("create scenario task")?;
        world.created_tasks.push(task);
    }
    Ok(())
}

#[when(r#""{email}" requests a "{report_type}" report"#)]
fn request_report(
    world: &mut ProjectWorld,
    email: String,
    report_type: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let view = run_async(world.reports.generate_report(
        project_id,
        &email,
        "Scenario prompt",
        &report_type,
    ))
    .wrap_err("generate scenario report")?;
    world.last_report = Some(view);
    Ok(())
}
