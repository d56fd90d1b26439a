//! Given steps for project workflow BDD scenarios.

use super::world::{ProjectWorld, run_async};
use eyre::WrapErr;
use keystone::project::services::CreateProjectRequest;
use keystone::task::{domain::TaskStatus, services::CreateTaskRequest};
use rstest_bdd_macros::given;

#[given(r#"a registered user "{name}" with email "{email}""#)]
fn registered_user(
    world: &mut ProjectWorld,
    name: String,
    email: String,
) -> Result<(), eyre::Report> {
    run_async(world.membership.register_user(name, email)).wrap_err("register scenario user")?;
    Ok(())
}

#[given(r#"a project "{name}" with key "{key}" created by "{email}""#)]
fn project_created(
    world: &mut ProjectWorld,
    name: String,
    key: String,
    email: String,
) -> Result<(), eyre::Report> {
    let project = run_async(
        world
            .membership
            .create_project(CreateProjectRequest::new(name, key, email)),
    )
    .wrap_err("create scenario project")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#""{email}" has joined the project"#)]
fn user_joined(world: &mut ProjectWorld, email: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let user = world.user(&email)?;
    let project = run_async(world.membership.add_member(project_id, user.id()))
        .wrap_err("add scenario member")?;
    world.project = Some(project);
    Ok(())
}

#[given("the project has {total:u64} tasks of which {done:u64} are done")]
fn project_has_tasks(
    world: &mut ProjectWorld,
    total: u64,
    done: u64,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let reporter = world
        .project()?
        .lead()
        .ok_or_else(|| eyre::eyre!("scenario project has no lead"))?;
    let reporter_email = run_async(world.membership.project_members(project_id))
        .wrap_err("list scenario members")?
        .into_iter()
        .find(|member| member.id() == reporter)
        .map(|member| member.email().as_str().to_owned())
        .ok_or_else(|| eyre::eyre!("scenario lead is not listed"))?;

    for index in 0..total {
        let task = run_async(world.tasks.create_task(
            project_id,
            &reporter_email,
            CreateTaskRequest::new(format!("task {index}")),
        ))
        .wrap_err("create scenario task")?;
        if index < done {
            run_async(world.tasks.update_status(task.id(), TaskStatus::Done))
                .wrap_err("complete scenario task")?;
        }
        world.created_tasks.push(task);
    }
    Ok(())
}
