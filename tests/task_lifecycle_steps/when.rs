//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async, user_named};
use rstest_bdd_macros::when;

#[when(r#""{actor}" takes the task"#)]
fn take_task(world: &mut LifecycleWorld, actor: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.take(task_id, user_named(&actor)?, &[]));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" takes the task with "{helper}""#)]
fn take_task_with_helper(
    world: &mut LifecycleWorld,
    actor: String,
    helper: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let extra = [user_named(&helper)?];
    let result = run_async(world.service.take(task_id, user_named(&actor)?, &extra));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" completes the task"#)]
fn complete_task(world: &mut LifecycleWorld, actor: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.complete(task_id, user_named(&actor)?));
    world.record(result);
    Ok(())
}

#[when("the supervisor verifies the task")]
fn verify_task(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let grant = world.grant()?;
    let result = run_async(world.service.verify(&grant, task_id));
    world.record(result);
    Ok(())
}

#[when("the supervisor rejects the task")]
fn reject_task(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let grant = world.grant()?;
    let result = run_async(world.service.reject(&grant, task_id));
    world.record(result);
    Ok(())
}
