//! Then steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, user_named};
use rstest_bdd_macros::then;
use workforce::task::{domain::TaskStep, services::ErrorKind};

#[then(r#"the task step is "{step}""#)]
fn task_step_is(world: &LifecycleWorld, step: String) -> Result<(), eyre::Report> {
    let expected = TaskStep::try_from(step.as_str())
        .map_err(|err| eyre::eyre!("invalid expected step in scenario: {err}"))?;
    let record = world.reload()?;
    let actual = record.task().step();
    if actual != expected {
        return Err(eyre::eyre!("expected step {expected}, found {actual}"));
    }
    Ok(())
}

#[then("the task has a completion date")]
fn task_has_completion_date(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let record = world.reload()?;
    eyre::ensure!(
        record.task().completed_at().is_some(),
        "expected completed_at to be set"
    );
    Ok(())
}

#[then("the task has no completion date")]
fn task_has_no_completion_date(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let record = world.reload()?;
    eyre::ensure!(
        record.task().completed_at().is_none(),
        "expected completed_at to be cleared"
    );
    Ok(())
}

#[then(r#""{member}" is an executor of the task"#)]
fn member_is_executor(world: &LifecycleWorld, member: String) -> Result<(), eyre::Report> {
    let user_id = user_named(&member)?;
    let record = world.reload()?;
    eyre::ensure!(
        record.operation().is_executor(user_id),
        "expected {member} among the executors"
    );
    Ok(())
}

#[then(r#"the last operation fails with "{kind}""#)]
fn last_operation_fails(world: &LifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = match kind.as_str() {
        "not_found" => ErrorKind::NotFound,
        "invalid_transition" => ErrorKind::InvalidTransition,
        "unauthorized" => ErrorKind::Unauthorized,
        "validation" => ErrorKind::Validation,
        other => return Err(eyre::eyre!("unknown error kind in scenario: {other}")),
    };
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing lifecycle result"))?;
    match result {
        Err(err) if err.kind() == expected => Ok(()),
        other => Err(eyre::eyre!("expected {kind} failure, got {other:?}")),
    }
}
