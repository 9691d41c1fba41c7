//! In-memory integration tests for the task lifecycle state machine.

use super::helpers::{
    ACME, ALICE, BOB, GLOBEX, GREG, HANNAH, SUPERVISOR, Harness, harness, in_days, today,
};
use eyre::{bail, ensure};
use rstest::rstest;
use workforce::authorization::{AuthorizationError, AuthorizationGate, RoleGate};
use workforce::identity::domain::{Role, UserId, UserIdentity};
use workforce::task::{
    domain::{TaskDomainError, TaskStep, TaskType},
    ports::TaskFilter,
    services::{CreateTaskRequest, ErrorKind, TaskLifecycleError, UpdateTaskRequest},
};

fn solo_task() -> CreateTaskRequest {
    CreateTaskRequest::new(ACME, "Deliver parcels", "Deliver the morning parcels", in_days(3))
        .with_payment(200)
        .with_access([ALICE, BOB])
}

fn group_task() -> CreateTaskRequest {
    CreateTaskRequest::new(ACME, "Warehouse move", "Relocate the warehouse", in_days(21))
        .with_task_type(TaskType::Group)
        .with_payment(5_000)
        .with_access([BOB])
        .with_executors([HANNAH])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn solo_task_end_to_end(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, solo_task()).await?;
    ensure!(created.step() == TaskStep::Available);
    ensure!(created.details().duration_weeks() == 1);

    service.take(created.id(), ALICE, &[]).await?;
    let completed = service.complete(created.id(), ALICE).await?;
    ensure!(completed.completed_at() == Some(today()));

    let verified = service.verify(&harness.grant, created.id()).await?;
    ensure!(verified.step() == TaskStep::Verified);
    ensure!(verified.verified_at() == Some(today()));
    ensure!(verified.completed_at() == Some(today()));

    let Some(record) = service.find(created.id()).await? else {
        bail!("verified task should remain stored");
    };
    ensure!(record.operation().executors().len() == 1);
    ensure!(record.operation().is_executor(ALICE));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn group_task_with_head_and_extra_executor(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, group_task()).await?;

    let refused = service.take(created.id(), BOB, &[]).await;
    ensure!(matches!(
        refused,
        Err(TaskLifecycleError::Domain(TaskDomainError::HeadRequired { .. }))
    ));

    service.take(created.id(), HANNAH, &[BOB]).await?;

    let helper_attempt = service.complete(created.id(), BOB).await;
    ensure!(helper_attempt.map_err(|err| err.kind()).err() == Some(ErrorKind::Unauthorized));

    let completed = service.complete(created.id(), HANNAH).await?;
    ensure!(completed.step() == TaskStep::Completed);

    let Some(record) = service.find(created.id()).await? else {
        bail!("group task should be stored");
    };
    ensure!(record.operation().is_executor(HANNAH));
    ensure!(record.operation().is_executor(BOB));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn group_take_refuses_executor_from_other_company(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, group_task()).await?;

    let result = service.take(created.id(), HANNAH, &[GREG]).await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::ExecutorOutsideCompany { user_id, .. }))
            if user_id == GREG
    ));
    let Some(record) = service.find(created.id()).await? else {
        bail!("task should be stored");
    };
    ensure!(record.task().step() == TaskStep::Available);
    ensure!(record.operation().executors().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_refuses_access_for_other_company_staff(harness: Harness) -> eyre::Result<()> {
    let result = harness
        .service
        .create(&harness.grant, solo_task().with_access([GREG]))
        .await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::UserOutsideCompany { user_id, company_id })
            if user_id == GREG && company_id == ACME
    ));
    ensure!(harness.service.list(&TaskFilter::new()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_details_refuses_other_company_staff(harness: Harness) -> eyre::Result<()> {
    let created = harness.service.create(&harness.grant, solo_task()).await?;

    let result = harness
        .service
        .update_details(
            &harness.grant,
            created.id(),
            UpdateTaskRequest::new().with_access([ALICE, GREG]),
        )
        .await;

    ensure!(result.map_err(|err| err.kind()).err() == Some(ErrorKind::Unauthorized));
    let Some(record) = harness.service.find(created.id()).await? else {
        bail!("task should be unchanged");
    };
    ensure!(!record.operation().has_access(GREG));
    ensure!(record.task().version() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn take_refuses_user_who_moved_to_other_company(harness: Harness) -> eyre::Result<()> {
    let transferee = UserId::new(15);
    harness.directory.add_user(transferee, Role::User, ACME)?;
    let created = harness
        .service
        .create(&harness.grant, solo_task().with_access([transferee]))
        .await?;
    harness.directory.add_user(transferee, Role::User, GLOBEX)?;

    let result = harness.service.take(created.id(), transferee, &[]).await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::ExecutorOutsideCompany { user_id, .. }))
            if user_id == transferee
    ));
    let Some(record) = harness.service.find(created.id()).await? else {
        bail!("task should be stored");
    };
    ensure!(record.task().step() == TaskStep::Available);
    ensure!(record.operation().executors().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loosely_issued_grant_cannot_verify(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, solo_task()).await?;
    service.take(created.id(), ALICE, &[]).await?;
    service.complete(created.id(), ALICE).await?;
    let clerk = UserIdentity::new(BOB, Role::User, ACME);
    let clerk_grant = RoleGate::new().authorize(&clerk, &[Role::User])?;

    let verify = service.verify(&clerk_grant, created.id()).await;
    let reject = service.reject(&clerk_grant, created.id()).await;

    for result in [verify, reject] {
        ensure!(matches!(
            result,
            Err(TaskLifecycleError::Authorization(AuthorizationError::RoleNotPermitted {
                user_id,
                role: Role::User,
            })) if user_id == BOB
        ));
    }
    let Some(record) = service.find(created.id()).await? else {
        bail!("task should be stored");
    };
    ensure!(record.task().step() == TaskStep::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn supervisor_cannot_manage_other_company_tasks(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, solo_task()).await?;
    service.take(created.id(), ALICE, &[]).await?;
    service.complete(created.id(), ALICE).await?;
    let rival = harness
        .directory
        .add_user(UserId::new(22), Role::Supervisor, GLOBEX)?;
    let rival_grant = RoleGate::new().authorize(&rival, &Role::PRIVILEGED)?;

    let results = [
        service.verify(&rival_grant, created.id()).await.map(|_| ()),
        service.reject(&rival_grant, created.id()).await.map(|_| ()),
        service
            .update_details(
                &rival_grant,
                created.id(),
                UpdateTaskRequest::new().with_name("Hijacked"),
            )
            .await
            .map(|_| ()),
        service.delete(&rival_grant, created.id()).await,
        service.create(&rival_grant, solo_task()).await.map(|_| ()),
    ];

    for result in results {
        ensure!(matches!(
            result,
            Err(TaskLifecycleError::Authorization(AuthorizationError::ForeignCompany {
                company_id,
                ..
            })) if company_id == ACME
        ));
    }
    let Some(record) = service.find(created.id()).await? else {
        bail!("task should survive a foreign delete");
    };
    ensure!(record.task().step() == TaskStep::Completed);
    ensure!(record.task().details().name() == "Deliver parcels");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reject_then_complete_again(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, solo_task()).await?;
    service.take(created.id(), BOB, &[]).await?;
    service.complete(created.id(), BOB).await?;

    let rejected = service.reject(&harness.grant, created.id()).await?;
    ensure!(rejected.step() == TaskStep::InProgress);
    ensure!(rejected.completed_at().is_none());
    ensure!(rejected.verified_at().is_none());

    let completed = service.complete(created.id(), BOB).await?;
    ensure!(completed.step() == TaskStep::Completed);
    ensure!(completed.completed_at() == Some(today()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verified_task_accepts_no_further_transitions(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, solo_task()).await?;
    service.take(created.id(), ALICE, &[]).await?;
    service.complete(created.id(), ALICE).await?;
    service.verify(&harness.grant, created.id()).await?;

    let results = [
        service.take(created.id(), ALICE, &[]).await,
        service.complete(created.id(), ALICE).await,
        service.verify(&harness.grant, created.id()).await,
        service.reject(&harness.grant, created.id()).await,
    ];

    for result in results {
        let Err(err) = result else {
            bail!("verified task should not transition");
        };
        ensure!(err.kind() == ErrorKind::InvalidTransition, "unexpected error: {err}");
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_take_is_an_invalid_transition(harness: Harness) -> eyre::Result<()> {
    let service = &harness.service;
    let created = service.create(&harness.grant, solo_task()).await?;
    service.take(created.id(), ALICE, &[]).await?;

    let result = service.take(created.id(), BOB, &[]).await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::InvalidStateTransition {
            from: TaskStep::InProgress,
            to: TaskStep::InProgress,
            ..
        }))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_actor_is_not_found(harness: Harness) -> eyre::Result<()> {
    let created = harness.service.create(&harness.grant, solo_task()).await?;
    let stranger = UserId::new(5_000);

    let result = harness.service.take(created.id(), stranger, &[]).await;

    ensure!(matches!(result, Err(TaskLifecycleError::UserNotFound(id)) if id == stranger));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn newly_registered_user_can_be_offered_work(harness: Harness) -> eyre::Result<()> {
    let newcomer = UserId::new(14);
    harness.directory.add_user(newcomer, Role::User, ACME)?;
    let request = solo_task().with_access([newcomer]);
    let created = harness.service.create(&harness.grant, request).await?;

    let taken = harness.service.take(created.id(), newcomer, &[]).await?;

    ensure!(taken.step() == TaskStep::InProgress);
    Ok(())
}

#[rstest]
fn regular_users_cannot_obtain_grants() -> eyre::Result<()> {
    let worker = UserIdentity::new(ALICE, Role::User, ACME);

    let result = RoleGate::new().authorize(&worker, &Role::PRIVILEGED);

    ensure!(
        result
            == Err(AuthorizationError::RoleNotPermitted {
                user_id: ALICE,
                role: Role::User,
            })
    );
    let as_service_error = TaskLifecycleError::from(AuthorizationError::RoleNotPermitted {
        user_id: SUPERVISOR,
        role: Role::Head,
    });
    ensure!(as_service_error.kind().http_status() == 403);
    Ok(())
}
