//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async, user_named};
use chrono::Days;
use eyre::WrapErr;
use mockable::{Clock, DefaultClock};
use rstest_bdd_macros::given;
use workforce::identity::domain::CompanyId;
use workforce::task::{domain::TaskType, services::CreateTaskRequest};

fn request(name: &str) -> CreateTaskRequest {
    let deadline = DefaultClock.utc().date_naive() + Days::new(10);
    CreateTaskRequest::new(CompanyId::new(1), name, "Scenario task", deadline).with_payment(250)
}

#[given(r#"a solo task offered to "{member}""#)]
fn solo_task_offered(world: &mut LifecycleWorld, member: String) -> Result<(), eyre::Report> {
    let request = request("Solo scenario").with_access([user_named(&member)?]);
    let grant = world.grant()?;
    let created = run_async(world.service.create(&grant, request))
        .wrap_err("create solo task for scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"a group task led by "{head}" and offered to "{member}""#)]
fn group_task_offered(
    world: &mut LifecycleWorld,
    head: String,
    member: String,
) -> Result<(), eyre::Report> {
    let request = request("Group scenario")
        .with_task_type(TaskType::Group)
        .with_access([user_named(&member)?])
        .with_executors([user_named(&head)?]);
    let grant = world.grant()?;
    let created = run_async(world.service.create(&grant, request))
        .wrap_err("create group task for scenario")?;
    world.task = Some(created);
    Ok(())
}
