//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStep};
use crate::identity::domain::{CompanyId, UserId};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,

    /// The task name exceeds the storage limit.
    #[error("task name exceeds {max} characters")]
    NameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The task description exceeds the storage limit.
    #[error("task description exceeds {max} characters")]
    DescriptionTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The deadline lies before the current date.
    #[error("deadline {deadline} is before today ({today})")]
    DeadlineInPast {
        /// Requested deadline.
        deadline: NaiveDate,
        /// Current date when validated.
        today: NaiveDate,
    },

    /// The duration must be at least one week.
    #[error("task duration must be at least one week")]
    ZeroDuration,

    /// The requested step change is not permitted by the state machine.
    #[error("invalid task step transition for {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Affected task.
        task_id: TaskId,
        /// Current step.
        from: TaskStep,
        /// Requested step.
        to: TaskStep,
    },

    /// The acting user was not offered the task.
    #[error("user {user_id} has no access to task {task_id}")]
    NotInAccessSet {
        /// Affected task.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },

    /// The acting user is not assigned to the task.
    #[error("user {user_id} is not an executor of task {task_id}")]
    NotAnExecutor {
        /// Affected task.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },

    /// Group tasks may only be claimed and completed by a head.
    #[error("group task {task_id} requires a head, user {user_id} is not one")]
    HeadRequired {
        /// Affected task.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },

    /// A would-be executor is employed by a different company.
    #[error("user {user_id} is not employed by company {company_id} owning task {task_id}")]
    ExecutorOutsideCompany {
        /// Affected task.
        task_id: TaskId,
        /// Rejected executor.
        user_id: UserId,
        /// Company owning the task.
        company_id: CompanyId,
    },
}

impl TaskDomainError {
    /// Returns whether the error describes malformed input rather than a
    /// rule of the lifecycle.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyName
                | Self::NameTooLong { .. }
                | Self::EmptyDescription
                | Self::DescriptionTooLong { .. }
                | Self::DeadlineInPast { .. }
                | Self::ZeroDuration
        )
    }
}

/// Error returned while parsing task steps from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task step: {0}")]
pub struct ParseTaskStepError(pub String);

/// Error returned while parsing task types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);

/// Error returned while parsing cities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown city: {0}")]
pub struct ParseCityError(pub String);
