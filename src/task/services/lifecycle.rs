//! Task lifecycle orchestration.

use super::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, UpdateTaskRequest};
use crate::authorization::Grant;
use crate::identity::{
    domain::{CompanyId, UserId, UserIdentity},
    ports::IdentityDirectory,
};
use crate::task::{
    domain::{
        NewTask, Task, TaskDetails, TaskDomainError, TaskId, TaskRecord, TaskStep, TaskType,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Task lifecycle orchestration service.
///
/// Every mutating call reads the task and its operation, applies the
/// domain rules, and saves both under the task's version. A failed
/// precondition returns before anything is written.
#[derive(Clone)]
pub struct TaskLifecycleService<R, D, C>
where
    R: TaskRepository,
    D: IdentityDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, D, C> TaskLifecycleService<R, D, C>
where
    R: TaskRepository,
    D: IdentityDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Creates an `Available` task with its operation.
    ///
    /// Access and executor-eligible users together form the access set;
    /// each must be employed by the owning company.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Authorization`] unless `grant` covers
    /// the company, [`TaskLifecycleError::Domain`] for invalid details,
    /// [`TaskLifecycleError::CompanyNotFound`] or
    /// [`TaskLifecycleError::UserNotFound`] for unknown references,
    /// [`TaskLifecycleError::UserOutsideCompany`] for another tenant's
    /// staff, and [`TaskLifecycleError::Repository`] when persistence fails.
    #[instrument(
        skip(self, grant, request),
        fields(actor = %grant.user_id(), company_id = %request.company_id)
    )]
    pub async fn create(
        &self,
        grant: &Grant,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let result = self.create_task(grant, request).await;
        match &result {
            Ok(task) => info!(task_id = %task.id(), "task created"),
            Err(err) => warn!(%err, "task creation refused"),
        }
        result
    }

    async fn create_task(
        &self,
        grant: &Grant,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let today = self.clock.utc().date_naive();
        let mut details =
            TaskDetails::new(request.name, request.description, request.deadline, today)?
                .with_payment(request.payment)
                .with_city(request.city);
        if let Some(weeks) = request.duration_weeks {
            details = details.with_duration_weeks(weeks)?;
        }

        if !self.directory.company_exists(request.company_id).await? {
            return Err(TaskLifecycleError::CompanyNotFound(request.company_id));
        }
        grant.ensure_covers(request.company_id)?;
        let access: BTreeSet<UserId> = request
            .access_ids
            .into_iter()
            .chain(request.executor_ids)
            .collect();
        self.ensure_employees(&access, request.company_id).await?;

        let new_task = NewTask::new(
            request.company_id,
            details,
            request.task_type,
            request.is_active,
            &*self.clock,
        );
        let record = self.repository.create(&new_task, &access).await?;
        Ok(record.into_parts().0)
    }

    /// Claims an `Available` task for `actor_id`.
    ///
    /// For group tasks each of `extra_executor_ids` joins the executor set
    /// alongside the head; they are ignored for solo tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::OperationNotFound`], or
    /// [`TaskLifecycleError::UserNotFound`] for missing records, and
    /// [`TaskLifecycleError::Domain`] when the step, access set, role, or the
    /// company of the actor or an extra executor forbids the claim.
    #[instrument(skip(self, extra_executor_ids), fields(extra = extra_executor_ids.len()))]
    pub async fn take(
        &self,
        task_id: TaskId,
        actor_id: UserId,
        extra_executor_ids: &[UserId],
    ) -> TaskLifecycleResult<Task> {
        let result = self.take_task(task_id, actor_id, extra_executor_ids).await;
        log_transition(&result, "task taken", "take refused");
        result
    }

    async fn take_task(
        &self,
        task_id: TaskId,
        actor_id: UserId,
        extra_executor_ids: &[UserId],
    ) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        if task.step() != TaskStep::Available {
            return Err(invalid_transition(&task, TaskStep::InProgress));
        }
        let mut record = self.load_record(task).await?;
        let actor = self.load_user(actor_id).await?;
        record.ensure_can_take(&actor)?;

        let team = match record.task().task_type() {
            TaskType::Solo => Vec::new(),
            TaskType::Group => self.load_users(extra_executor_ids).await?,
        };
        record.take(&actor, &team, &*self.clock)?;
        self.save_transition(&record, TaskStep::InProgress).await
    }

    /// Marks an `InProgress` task completed on behalf of an executor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::OperationNotFound`], or
    /// [`TaskLifecycleError::UserNotFound`] for missing records, and
    /// [`TaskLifecycleError::Domain`] when the step, executor set, or role
    /// forbids it.
    #[instrument(skip(self))]
    pub async fn complete(&self, task_id: TaskId, actor_id: UserId) -> TaskLifecycleResult<Task> {
        let result = self.complete_task(task_id, actor_id).await;
        log_transition(&result, "task completed", "complete refused");
        result
    }

    async fn complete_task(&self, task_id: TaskId, actor_id: UserId) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        task.ensure_can_transition_to(TaskStep::Completed)?;
        let mut record = self.load_record(task).await?;
        let actor = self.load_user(actor_id).await?;
        record.complete(&actor, &*self.clock)?;
        self.save_transition(&record, TaskStep::Completed).await
    }

    /// Accepts a `Completed` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::OperationNotFound`] for missing records,
    /// [`TaskLifecycleError::Authorization`] unless `grant` covers the
    /// task's company, and [`TaskLifecycleError::Domain`] unless the task is
    /// `Completed`.
    #[instrument(skip(self, grant), fields(actor = %grant.user_id()))]
    pub async fn verify(&self, grant: &Grant, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let result = self.verify_task(grant, task_id).await;
        log_transition(&result, "task verified", "verify refused");
        result
    }

    async fn verify_task(&self, grant: &Grant, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        grant.ensure_covers(task.company_id())?;
        let mut record = self.load_record(task).await?;
        record.verify(&*self.clock)?;
        self.save_transition(&record, TaskStep::Verified).await
    }

    /// Returns a `Completed` task to `InProgress`, keeping its executors.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::OperationNotFound`] for missing records,
    /// [`TaskLifecycleError::Authorization`] unless `grant` covers the
    /// task's company, and [`TaskLifecycleError::Domain`] unless the task is
    /// `Completed`.
    #[instrument(skip(self, grant), fields(actor = %grant.user_id()))]
    pub async fn reject(&self, grant: &Grant, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let result = self.reject_task(grant, task_id).await;
        log_transition(&result, "task returned to progress", "reject refused");
        result
    }

    async fn reject_task(&self, grant: &Grant, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        grant.ensure_covers(task.company_id())?;
        let mut record = self.load_record(task).await?;
        record.reject(&*self.clock)?;
        self.save_transition(&record, TaskStep::InProgress).await
    }

    /// Retrieves a task together with its operation.
    ///
    /// Returns `Ok(None)` when no task exists with the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::OperationNotFound`] when the task has
    /// no operation and [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<Option<TaskRecord>> {
        match self.repository.find_by_id(task_id).await? {
            Some(task) => self.load_record(task).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lists tasks matching `filter`, ordered by deadline then identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Applies a partial update to a task's descriptive fields and access
    /// set. The step, executors, and lifecycle dates are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::OperationNotFound`], or
    /// [`TaskLifecycleError::UserNotFound`] for missing records,
    /// [`TaskLifecycleError::Authorization`] unless `grant` covers the
    /// task's company, [`TaskLifecycleError::UserOutsideCompany`] for access
    /// ids of another tenant, [`TaskLifecycleError::Domain`] for invalid
    /// values, and [`TaskLifecycleError::Repository`] when another writer
    /// saved first.
    #[instrument(skip(self, grant, request), fields(actor = %grant.user_id()))]
    pub async fn update_details(
        &self,
        grant: &Grant,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let result = self.update_task(grant, task_id, request).await;
        match &result {
            Ok(task) => info!(version = task.version(), "task updated"),
            Err(err) => warn!(%err, "task update refused"),
        }
        result
    }

    async fn update_task(
        &self,
        grant: &Grant,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        let company_id = task.company_id();
        grant.ensure_covers(company_id)?;
        let mut record = self.load_record(task).await?;
        let details = apply_patch(
            record.task().details().clone(),
            &request,
            self.clock.utc().date_naive(),
        )?;

        if let Some(access_ids) = request.access_ids {
            let access: BTreeSet<UserId> = access_ids.into_iter().collect();
            self.ensure_employees(&access, company_id).await?;
            record.operation_mut().replace_access(access);
        }
        record.task_mut().replace_details(details, &*self.clock);
        if let Some(is_active) = request.is_active {
            record.task_mut().set_active(is_active, &*self.clock);
        }

        let saved = self.repository.save(&record).await?;
        Ok(saved.into_parts().0)
    }

    /// Deletes a task and its operation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, [`TaskLifecycleError::Authorization`] unless `grant` covers the
    /// task's company, and [`TaskLifecycleError::Repository`] when
    /// persistence fails.
    #[instrument(skip(self, grant), fields(actor = %grant.user_id()))]
    pub async fn delete(&self, grant: &Grant, task_id: TaskId) -> TaskLifecycleResult<()> {
        let result = self.delete_task(grant, task_id).await;
        match &result {
            Ok(()) => info!("task deleted"),
            Err(err) => warn!(%err, "task deletion refused"),
        }
        result
    }

    async fn delete_task(&self, grant: &Grant, task_id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.load_task(task_id).await?;
        grant.ensure_covers(task.company_id())?;
        Ok(self.repository.delete(task_id).await?)
    }

    async fn load_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn load_record(&self, task: Task) -> TaskLifecycleResult<TaskRecord> {
        let task_id = task.id();
        let operation = self
            .repository
            .find_operation(task_id)
            .await?
            .ok_or(TaskLifecycleError::OperationNotFound(task_id))?;
        Ok(TaskRecord::new(task, operation))
    }

    async fn load_user(&self, user_id: UserId) -> TaskLifecycleResult<UserIdentity> {
        self.directory
            .find_user(user_id)
            .await?
            .ok_or(TaskLifecycleError::UserNotFound(user_id))
    }

    async fn load_users(&self, user_ids: &[UserId]) -> TaskLifecycleResult<Vec<UserIdentity>> {
        let mut users = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            users.push(self.load_user(*user_id).await?);
        }
        Ok(users)
    }

    /// Resolves every id first, so an unknown user is reported before a
    /// user from another company.
    async fn ensure_employees(
        &self,
        user_ids: &BTreeSet<UserId>,
        company_id: CompanyId,
    ) -> TaskLifecycleResult<()> {
        let mut users = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            users.push(self.load_user(*user_id).await?);
        }
        users
            .iter()
            .find(|user| user.company_id() != company_id)
            .map_or(Ok(()), |user| {
                Err(TaskLifecycleError::UserOutsideCompany {
                    user_id: user.id(),
                    company_id,
                })
            })
    }

    /// Saves a transitioned record. A lost version race is reported as an
    /// invalid transition from whatever step the winner left behind.
    async fn save_transition(
        &self,
        record: &TaskRecord,
        target: TaskStep,
    ) -> TaskLifecycleResult<Task> {
        match self.repository.save(record).await {
            Ok(saved) => Ok(saved.into_parts().0),
            Err(TaskRepositoryError::ConcurrentConflict { task_id, .. }) => {
                let current = self.load_task(task_id).await?;
                Err(TaskDomainError::InvalidStateTransition {
                    task_id,
                    from: current.step(),
                    to: target,
                }
                .into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn invalid_transition(task: &Task, target: TaskStep) -> TaskLifecycleError {
    TaskDomainError::InvalidStateTransition {
        task_id: task.id(),
        from: task.step(),
        to: target,
    }
    .into()
}

fn apply_patch(
    mut details: TaskDetails,
    request: &UpdateTaskRequest,
    today: NaiveDate,
) -> Result<TaskDetails, TaskDomainError> {
    if let Some(name) = &request.name {
        details = details.with_name(name.as_str())?;
    }
    if let Some(description) = &request.description {
        details = details.with_description(description.as_str())?;
    }
    if let Some(deadline) = request.deadline {
        details = details.with_deadline(deadline, today)?;
    }
    if let Some(payment) = request.payment {
        details = details.with_payment(payment);
    }
    if let Some(weeks) = request.duration_weeks {
        details = details.with_duration_weeks(weeks)?;
    }
    if let Some(city) = request.city {
        details = details.with_city(city);
    }
    Ok(details)
}

fn log_transition(result: &TaskLifecycleResult<Task>, success: &str, failure: &str) {
    match result {
        Ok(task) => info!(step = %task.step(), version = task.version(), "{success}"),
        Err(err) => warn!(%err, kind = ?err.kind(), "{failure}"),
    }
}
