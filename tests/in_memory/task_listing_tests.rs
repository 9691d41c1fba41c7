//! In-memory integration tests for task queries and administrative edits.

use super::helpers::{ACME, ALICE, BOB, GREG, HANNAH, Harness, harness, in_days, today};
use chrono::Days;
use eyre::{bail, ensure};
use rstest::rstest;
use workforce::identity::domain::UserId;
use workforce::task::{
    domain::{City, Task, TaskId, TaskStep, TaskType},
    ports::TaskFilter,
    services::{CreateTaskRequest, ErrorKind, UpdateTaskRequest},
};

async fn seed(harness: &Harness) -> eyre::Result<[TaskId; 3]> {
    let service = &harness.service;
    let late = service
        .create(
            &harness.grant,
            CreateTaskRequest::new(ACME, "Paint fence", "Two coats", in_days(30))
                .with_payment(900)
                .with_city(City::Almaty)
                .with_access([ALICE]),
        )
        .await?;
    let early = service
        .create(
            &harness.grant,
            CreateTaskRequest::new(ACME, "Fence repair", "Fix the gate", in_days(2))
                .with_payment(100)
                .with_city(City::Astana)
                .with_access([ALICE, BOB]),
        )
        .await?;
    let group = service
        .create(
            &harness.grant,
            CreateTaskRequest::new(ACME, "Office move", "Move desks", in_days(14))
                .with_task_type(TaskType::Group)
                .with_payment(3_000)
                .with_active(false)
                .with_executors([HANNAH]),
        )
        .await?;
    Ok([late.id(), early.id(), group.id()])
}

fn ids(tasks: &[Task]) -> Vec<TaskId> {
    tasks.iter().map(|task| task.id()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_by_deadline(harness: Harness) -> eyre::Result<()> {
    let [late, early, group] = seed(&harness).await?;

    let tasks = harness.service.list(&TaskFilter::new()).await?;

    ensure!(ids(&tasks) == vec![early, group, late]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_combines_criteria(harness: Harness) -> eyre::Result<()> {
    let [late, early, _] = seed(&harness).await?;

    let fence = harness
        .service
        .list(&TaskFilter::new().with_search("FENCE"))
        .await?;
    ensure!(ids(&fence) == vec![early, late]);

    let well_paid = TaskFilter {
        min_payment: Some(500),
        is_active: Some(true),
        ..TaskFilter::default()
    };
    ensure!(ids(&harness.service.list(&well_paid).await?) == vec![late]);

    let in_astana = TaskFilter {
        city: Some(City::Astana),
        ..TaskFilter::default()
    };
    ensure!(ids(&harness.service.list(&in_astana).await?) == vec![early]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_by_access_and_executor_membership(harness: Harness) -> eyre::Result<()> {
    let [late, early, group] = seed(&harness).await?;
    harness.service.take(early, BOB, &[]).await?;

    let offered_to_alice = harness
        .service
        .list(&TaskFilter::new().with_access([ALICE]))
        .await?;
    ensure!(ids(&offered_to_alice) == vec![early, late]);

    let offered_to_hannah = harness
        .service
        .list(&TaskFilter::new().with_access([HANNAH]))
        .await?;
    ensure!(ids(&offered_to_hannah) == vec![group]);

    let worked_by_bob = harness
        .service
        .list(&TaskFilter::new().with_executors([BOB]))
        .await?;
    ensure!(ids(&worked_by_bob) == vec![early]);

    let in_progress = harness
        .service
        .list(&TaskFilter::new().with_step(TaskStep::InProgress))
        .await?;
    ensure!(ids(&in_progress) == vec![early]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_details_replaces_access_set(harness: Harness) -> eyre::Result<()> {
    let [late, _, _] = seed(&harness).await?;

    let update = UpdateTaskRequest::new()
        .with_description("Three coats")
        .with_deadline(in_days(35))
        .with_duration_weeks(2)
        .with_access([BOB]);
    let updated = harness
        .service
        .update_details(&harness.grant, late, update)
        .await?;
    ensure!(updated.details().description() == "Three coats");
    ensure!(updated.details().deadline() == in_days(35));
    ensure!(updated.details().duration_weeks() == 2);
    ensure!(updated.step() == TaskStep::Available);

    let refused = harness.service.take(late, ALICE, &[]).await;
    ensure!(refused.map_err(|err| err.kind()).err() == Some(ErrorKind::Unauthorized));
    harness.service.take(late, BOB, &[]).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_details_validates_input(harness: Harness) -> eyre::Result<()> {
    let [late, _, _] = seed(&harness).await?;

    let past = harness
        .service
        .update_details(
            &harness.grant,
            late,
            UpdateTaskRequest::new().with_deadline(today() - Days::new(1)),
        )
        .await;
    ensure!(past.map_err(|err| err.kind()).err() == Some(ErrorKind::Validation));

    let unknown_user = harness
        .service
        .update_details(
            &harness.grant,
            late,
            UpdateTaskRequest::new().with_access([GREG, UserId::new(404)]),
        )
        .await;
    ensure!(unknown_user.map_err(|err| err.kind()).err() == Some(ErrorKind::NotFound));

    let Some(record) = harness.service.find(late).await? else {
        bail!("task should be unchanged");
    };
    ensure!(record.task().version() == 0);
    ensure!(record.operation().has_access(ALICE));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_from_listing(harness: Harness) -> eyre::Result<()> {
    let [late, early, group] = seed(&harness).await?;

    harness.service.delete(&harness.grant, early).await?;

    let tasks = harness.service.list(&TaskFilter::new()).await?;
    ensure!(ids(&tasks) == vec![group, late]);
    let missing = harness.service.take(early, ALICE, &[]).await;
    ensure!(missing.map_err(|err| err.kind()).err() == Some(ErrorKind::NotFound));
    Ok(())
}
