//! Task paired with its operation, and the transition rules spanning both.

use super::{Task, TaskDomainError, TaskOperation, TaskStep, TaskType};
use crate::identity::domain::{UserId, UserIdentity};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A task together with its membership record.
///
/// Every lifecycle transition is validated against this pair so step,
/// membership, and role checks see one consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    task: Task,
    operation: TaskOperation,
}

impl TaskRecord {
    /// Pairs a task with its operation.
    #[must_use]
    pub const fn new(task: Task, operation: TaskOperation) -> Self {
        Self { task, operation }
    }

    /// Returns the task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the operation.
    #[must_use]
    pub const fn operation(&self) -> &TaskOperation {
        &self.operation
    }

    /// Splits the record into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Task, TaskOperation) {
        (self.task, self.operation)
    }

    pub(crate) const fn task_mut(&mut self) -> &mut Task {
        &mut self.task
    }

    pub(crate) const fn operation_mut(&mut self) -> &mut TaskOperation {
        &mut self.operation
    }

    /// Checks whether `actor` may claim the task, without mutating it.
    ///
    /// Checks run in order: the step must be `Available`, the actor must be
    /// employed by the owning company and be in the access set, and group
    /// tasks require a head.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`],
    /// [`TaskDomainError::ExecutorOutsideCompany`],
    /// [`TaskDomainError::NotInAccessSet`], or
    /// [`TaskDomainError::HeadRequired`].
    pub fn ensure_can_take(&self, actor: &UserIdentity) -> Result<(), TaskDomainError> {
        if self.task.step() != TaskStep::Available {
            return Err(self.invalid_transition(TaskStep::InProgress));
        }
        self.employed_id(actor)?;
        if !self.operation.has_access(actor.id()) {
            return Err(TaskDomainError::NotInAccessSet {
                task_id: self.task.id(),
                user_id: actor.id(),
            });
        }
        self.ensure_head_for_group(actor)
    }

    /// Claims the task for `actor`.
    ///
    /// For group tasks every member of `team` joins the executor set as
    /// well; `team` is ignored for solo tasks.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::ensure_can_take`], or
    /// [`TaskDomainError::ExecutorOutsideCompany`] when a team member is
    /// employed elsewhere. Nothing is mutated on error.
    pub fn take(
        &mut self,
        actor: &UserIdentity,
        team: &[UserIdentity],
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_can_take(actor)?;
        let extra = match self.task.task_type() {
            TaskType::Solo => Vec::new(),
            TaskType::Group => self.team_ids(team)?,
        };
        self.task.transition_to(TaskStep::InProgress, clock)?;
        self.operation
            .assign_executors(std::iter::once(actor.id()).chain(extra));
        Ok(())
    }

    /// Marks the task completed on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// `InProgress`, [`TaskDomainError::NotAnExecutor`] when the actor is not
    /// assigned, or [`TaskDomainError::HeadRequired`] for a non-head on a
    /// group task.
    pub fn complete(
        &mut self,
        actor: &UserIdentity,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.task.ensure_can_transition_to(TaskStep::Completed)?;
        if !self.operation.is_executor(actor.id()) {
            return Err(TaskDomainError::NotAnExecutor {
                task_id: self.task.id(),
                user_id: actor.id(),
            });
        }
        self.ensure_head_for_group(actor)?;
        self.task.transition_to(TaskStep::Completed, clock)
    }

    /// Accepts completed work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// `Completed`.
    pub fn verify(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.task.transition_to(TaskStep::Verified, clock)
    }

    /// Sends completed work back to execution; executors stay assigned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// `Completed`.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.task.step() != TaskStep::Completed {
            return Err(self.invalid_transition(TaskStep::InProgress));
        }
        self.task.transition_to(TaskStep::InProgress, clock)
    }

    fn ensure_head_for_group(&self, actor: &UserIdentity) -> Result<(), TaskDomainError> {
        match self.task.task_type() {
            TaskType::Solo => Ok(()),
            TaskType::Group if actor.role().is_head() => Ok(()),
            TaskType::Group => Err(TaskDomainError::HeadRequired {
                task_id: self.task.id(),
                user_id: actor.id(),
            }),
        }
    }

    fn team_ids(&self, team: &[UserIdentity]) -> Result<Vec<UserId>, TaskDomainError> {
        team.iter().map(|member| self.employed_id(member)).collect()
    }

    fn employed_id(&self, user: &UserIdentity) -> Result<UserId, TaskDomainError> {
        if user.company_id() == self.task.company_id() {
            Ok(user.id())
        } else {
            Err(TaskDomainError::ExecutorOutsideCompany {
                task_id: self.task.id(),
                user_id: user.id(),
                company_id: self.task.company_id(),
            })
        }
    }

    const fn invalid_transition(&self, to: TaskStep) -> TaskDomainError {
        TaskDomainError::InvalidStateTransition {
            task_id: self.task.id(),
            from: self.task.step(),
            to,
        }
    }
}
