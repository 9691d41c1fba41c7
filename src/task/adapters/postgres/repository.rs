//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{
        NewTaskOperationRow, NewTaskRow, TaskAccessRow, TaskChangeset, TaskExecutorRow,
        TaskOperationRow, TaskRow,
    },
    schema::{task_access, task_executors, task_operations, tasks},
};
use crate::config::PgPool;
use crate::identity::domain::{CompanyId, UserId};
use crate::task::{
    domain::{
        City, NewTask, PersistedTaskData, Task, TaskDetails, TaskId, TaskOperation,
        TaskOperationId, TaskRecord, TaskStep, TaskType,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use std::collections::BTreeSet;

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
///
/// Saves run `UPDATE tasks … WHERE id = $1 AND version = $2` and rewrite the
/// operation's membership rows inside the same transaction.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(
        &self,
        task: &NewTask,
        access: &BTreeSet<UserId>,
    ) -> TaskRepositoryResult<TaskRecord> {
        let new_row = to_new_row(task)?;
        let new_task = task.clone();
        let access_ids = user_values(access);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let task_id: i64 = diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .returning(tasks::id)
                    .get_result(tx)?;
                let operation_id: i64 = diesel::insert_into(task_operations::table)
                    .values(&NewTaskOperationRow { task_id })
                    .returning(task_operations::id)
                    .get_result(tx)?;
                replace_access(tx, operation_id, &access_ids)?;

                let stored_task = new_task.into_task(TaskId::new(task_id));
                let operation = TaskOperation::new(
                    TaskOperationId::new(operation_id),
                    TaskId::new(task_id),
                    access_ids.iter().copied().map(UserId::new),
                );
                Ok(TaskRecord::new(stored_task, operation))
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_operation(&self, task_id: TaskId) -> TaskRepositoryResult<Option<TaskOperation>> {
        self.run_blocking(move |connection| {
            let row = task_operations::table
                .filter(task_operations::task_id.eq(task_id.value()))
                .select(TaskOperationRow::as_select())
                .first::<TaskOperationRow>(connection)
                .optional()?;
            let Some(row) = row else {
                return Ok(None);
            };

            let access: Vec<i64> = task_access::table
                .filter(task_access::operation_id.eq(row.id))
                .select(task_access::user_id)
                .load(connection)?;
            let executors: Vec<i64> = task_executors::table
                .filter(task_executors::operation_id.eq(row.id))
                .select(task_executors::user_id)
                .load(connection)?;

            Ok(Some(TaskOperation::from_persisted(
                TaskOperationId::new(row.id),
                TaskId::new(row.task_id),
                to_user_set(access),
                to_user_set(executors),
            )))
        })
        .await
    }

    async fn save(&self, record: &TaskRecord) -> TaskRepositoryResult<TaskRecord> {
        let task_id = record.task().id();
        let expected_version = record.task().version();
        let persisted_version =
            i64::try_from(expected_version).map_err(TaskRepositoryError::persistence)?;

        let mut next = record.clone();
        next.task_mut().advance_version();
        let changeset = to_changeset(next.task())?;
        let operation_id = next.operation().id().value();
        let access_ids = user_values(next.operation().access());
        let executor_ids = user_values(next.operation().executors());

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_id.value()))
                        .filter(tasks::version.eq(persisted_version)),
                )
                .set(&changeset)
                .execute(tx)?;

                if updated == 0 {
                    let exists: bool = diesel::select(diesel::dsl::exists(
                        tasks::table.filter(tasks::id.eq(task_id.value())),
                    ))
                    .get_result(tx)?;
                    return Err(if exists {
                        TaskRepositoryError::ConcurrentConflict {
                            task_id,
                            expected_version,
                        }
                    } else {
                        TaskRepositoryError::NotFound(task_id)
                    });
                }

                replace_access(tx, operation_id, &access_ids)?;
                replace_executors(tx, operation_id, &executor_ids)?;
                Ok(())
            })?;
            Ok(next)
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let filter = filter.clone();
        self.run_blocking(move |connection| {
            let executor_task_ids = member_task_ids(connection, &filter.executor_ids, true)?;
            let access_task_ids = member_task_ids(connection, &filter.access_ids, false)?;

            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(from) = filter.deadline_from {
                query = query.filter(tasks::deadline.ge(from));
            }
            if let Some(flag) = filter.is_active {
                query = query.filter(tasks::is_active.eq(flag));
            }
            if let Some(task_type) = filter.task_type {
                query = query.filter(tasks::task_type.eq(task_type.as_str()));
            }
            if let Some(step) = filter.step {
                query = query.filter(tasks::task_step.eq(step.as_str()));
            }
            if let Some(min) = filter.min_payment {
                query = query.filter(tasks::payment.ge(to_i64(min)?));
            }
            if let Some(max) = filter.max_payment {
                query = query.filter(tasks::payment.le(to_i64(max)?));
            }
            if let Some(min) = filter.min_duration {
                query = query.filter(tasks::duration.ge(to_i32(min)?));
            }
            if let Some(max) = filter.max_duration {
                query = query.filter(tasks::duration.le(to_i32(max)?));
            }
            if let Some(city) = filter.city {
                query = query.filter(tasks::city.eq(city.as_str()));
            }
            if let Some(needle) = filter.search.as_deref() {
                query = query.filter(tasks::name.ilike(format!("%{}%", escape_like(needle))));
            }
            if let Some(ids) = executor_task_ids {
                query = query.filter(tasks::id.eq_any(ids));
            }
            if let Some(ids) = access_task_ids {
                query = query.filter(tasks::id.eq_any(ids));
            }

            let rows = query
                .order((tasks::deadline.asc(), tasks::id.asc()))
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let operation_ids: Vec<i64> = task_operations::table
                    .filter(task_operations::task_id.eq(id.value()))
                    .select(task_operations::id)
                    .load(tx)?;
                diesel::delete(
                    task_access::table.filter(task_access::operation_id.eq_any(operation_ids.clone())),
                )
                .execute(tx)?;
                diesel::delete(
                    task_executors::table.filter(task_executors::operation_id.eq_any(operation_ids)),
                )
                .execute(tx)?;
                diesel::delete(
                    task_operations::table.filter(task_operations::task_id.eq(id.value())),
                )
                .execute(tx)?;

                let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.value())))
                    .execute(tx)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }
}

/// Task ids whose operation lists any of `users`, or `None` when unfiltered.
fn member_task_ids(
    connection: &mut PgConnection,
    users: &[UserId],
    executors: bool,
) -> TaskRepositoryResult<Option<Vec<i64>>> {
    if users.is_empty() {
        return Ok(None);
    }
    let user_ids: Vec<i64> = users.iter().map(|user| user.value()).collect();
    let operation_ids: Vec<i64> = if executors {
        task_executors::table
            .filter(task_executors::user_id.eq_any(user_ids))
            .select(task_executors::operation_id)
            .load(connection)?
    } else {
        task_access::table
            .filter(task_access::user_id.eq_any(user_ids))
            .select(task_access::operation_id)
            .load(connection)?
    };
    let task_ids = task_operations::table
        .filter(task_operations::id.eq_any(operation_ids))
        .select(task_operations::task_id)
        .load(connection)?;
    Ok(Some(task_ids))
}

fn replace_access(
    tx: &mut PgConnection,
    operation_id: i64,
    users: &[i64],
) -> TaskRepositoryResult<()> {
    diesel::delete(task_access::table.filter(task_access::operation_id.eq(operation_id)))
        .execute(tx)?;
    if users.is_empty() {
        return Ok(());
    }
    let rows: Vec<TaskAccessRow> = users
        .iter()
        .map(|user_id| TaskAccessRow {
            operation_id,
            user_id: *user_id,
        })
        .collect();
    diesel::insert_into(task_access::table)
        .values(&rows)
        .execute(tx)?;
    Ok(())
}

fn replace_executors(
    tx: &mut PgConnection,
    operation_id: i64,
    users: &[i64],
) -> TaskRepositoryResult<()> {
    diesel::delete(task_executors::table.filter(task_executors::operation_id.eq(operation_id)))
        .execute(tx)?;
    if users.is_empty() {
        return Ok(());
    }
    let rows: Vec<TaskExecutorRow> = users
        .iter()
        .map(|user_id| TaskExecutorRow {
            operation_id,
            user_id: *user_id,
        })
        .collect();
    diesel::insert_into(task_executors::table)
        .values(&rows)
        .execute(tx)?;
    Ok(())
}

fn user_values(users: &BTreeSet<UserId>) -> Vec<i64> {
    users.iter().map(|user| user.value()).collect()
}

fn to_user_set(values: Vec<i64>) -> BTreeSet<UserId> {
    values.into_iter().map(UserId::new).collect()
}

fn to_i64(value: u64) -> TaskRepositoryResult<i64> {
    i64::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn to_i32(value: u32) -> TaskRepositoryResult<i32> {
    i32::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_new_row(task: &NewTask) -> TaskRepositoryResult<NewTaskRow> {
    let details = task.details();
    Ok(NewTaskRow {
        company_id: task.company_id().value(),
        name: details.name().to_owned(),
        description: details.description().to_owned(),
        deadline: details.deadline(),
        payment: to_i64(details.payment())?,
        duration: to_i32(details.duration_weeks())?,
        city: details.city().map(|city| city.as_str().to_owned()),
        task_type: task.task_type().as_str().to_owned(),
        task_step: TaskStep::Available.as_str().to_owned(),
        is_active: task.is_active(),
        created_at: task.created_at(),
        updated_at: task.created_at(),
        version: 0,
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    let details = task.details();
    Ok(TaskChangeset {
        name: details.name().to_owned(),
        description: details.description().to_owned(),
        deadline: details.deadline(),
        payment: to_i64(details.payment())?,
        duration: to_i32(details.duration_weeks())?,
        city: details.city().map(|city| city.as_str().to_owned()),
        task_step: task.step().as_str().to_owned(),
        is_active: task.is_active(),
        completed_at: task.completed_at(),
        verified_at: task.verified_at(),
        updated_at: task.updated_at(),
        version: to_i64(task.version())?,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        company_id,
        name,
        description,
        deadline,
        payment,
        duration,
        city,
        task_type,
        task_step,
        is_active,
        completed_at,
        verified_at,
        created_at,
        updated_at,
        version,
    } = row;

    let parsed_city = city
        .as_deref()
        .map(City::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let details = TaskDetails::from_persisted(
        name,
        description,
        deadline,
        u64::try_from(payment).map_err(TaskRepositoryError::persistence)?,
        u32::try_from(duration).map_err(TaskRepositoryError::persistence)?,
        parsed_city,
    );

    let data = PersistedTaskData {
        id: TaskId::new(id),
        company_id: CompanyId::new(company_id),
        details,
        task_type: TaskType::try_from(task_type.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        step: TaskStep::try_from(task_step.as_str()).map_err(TaskRepositoryError::persistence)?,
        is_active,
        completed_at,
        verified_at,
        created_at,
        updated_at,
        version: u64::try_from(version).map_err(TaskRepositoryError::persistence)?,
    };
    Ok(Task::from_persisted(data))
}
