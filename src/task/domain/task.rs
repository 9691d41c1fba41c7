//! Task aggregate root and lifecycle vocabulary.

use super::{
    ParseTaskStepError, ParseTaskTypeError, TaskDetails, TaskDomainError, TaskId,
};
use crate::identity::domain::CompanyId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStep {
    /// Offered to the access set and waiting to be claimed.
    Available,
    /// Claimed and being executed.
    InProgress,
    /// Marked done by an executor and awaiting review.
    Completed,
    /// Accepted by a supervisor.
    Verified,
    /// Abandoned through an administrative path outside the lifecycle.
    Failed,
}

impl TaskStep {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Available, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Completed, Self::Verified | Self::InProgress)
        )
    }

    /// Returns whether no transition leaves this step.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Failed)
    }
}

impl fmt::Display for TaskStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStep {
    type Error = ParseTaskStepError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "available" => Ok(Self::Available),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "verified" => Ok(Self::Verified),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStepError(value.to_owned())),
        }
    }
}

/// Whether a task is executed by one person or by a head-led team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Executed by a single employee.
    #[default]
    Solo,
    /// Claimed and completed by a head on behalf of a team.
    Group,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "solo" => Ok(Self::Solo),
            "group" => Ok(Self::Group),
            _ => Err(ParseTaskTypeError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
///
/// `completed_at` is set exactly while the step is `Completed` or
/// `Verified`; `verified_at` exactly while it is `Verified`. Only
/// [`Task::transition_to`] moves the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    company_id: CompanyId,
    details: TaskDetails,
    task_type: TaskType,
    step: TaskStep,
    is_active: bool,
    completed_at: Option<NaiveDate>,
    verified_at: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Persisted descriptive fields.
    pub details: TaskDetails,
    /// Persisted task type.
    pub task_type: TaskType,
    /// Persisted lifecycle step.
    pub step: TaskStep,
    /// Persisted listing flag.
    pub is_active: bool,
    /// Persisted completion date.
    pub completed_at: Option<NaiveDate>,
    /// Persisted verification date.
    pub verified_at: Option<NaiveDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic concurrency version.
    pub version: u64,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            company_id: data.company_id,
            details: data.details,
            task_type: data.task_type,
            step: data.step,
            is_active: data.is_active,
            completed_at: data.completed_at,
            verified_at: data.verified_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the lifecycle step.
    #[must_use]
    pub const fn step(&self) -> TaskStep {
        self.step
    }

    /// Returns whether the task is listable.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the completion date, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<NaiveDate> {
        self.completed_at
    }

    /// Returns the verification date, if any.
    #[must_use]
    pub const fn verified_at(&self) -> Option<NaiveDate> {
        self.verified_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic concurrency version observed at load time.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Checks that the lifecycle permits moving to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when it does not.
    pub const fn ensure_can_transition_to(&self, target: TaskStep) -> Result<(), TaskDomainError> {
        if self.step.can_transition_to(target) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.step,
                to: target,
            })
        }
    }

    /// Moves the task to `target`, stamping or clearing the completion and
    /// verification dates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the lifecycle
    /// does not permit the move. The task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStep,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_can_transition_to(target)?;
        let now = clock.utc();
        let today = now.date_naive();
        match target {
            TaskStep::InProgress => self.completed_at = None,
            TaskStep::Completed => self.completed_at = Some(today),
            TaskStep::Verified => self.verified_at = Some(today),
            TaskStep::Available | TaskStep::Failed => {}
        }
        self.step = target;
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the descriptive fields.
    pub fn replace_details(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.details = details;
        self.touch(clock);
    }

    /// Sets whether the task is listable.
    pub fn set_active(&mut self, is_active: bool, clock: &impl Clock) {
        self.is_active = is_active;
        self.touch(clock);
    }

    /// Advances the version after a successful save.
    pub(crate) const fn advance_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// A task that has not yet been assigned storage identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    company_id: CompanyId,
    details: TaskDetails,
    task_type: TaskType,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates an unsaved task in the `Available` step.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        details: TaskDetails,
        task_type: TaskType,
        is_active: bool,
        clock: &impl Clock,
    ) -> Self {
        Self {
            company_id,
            details,
            task_type,
            is_active,
            created_at: clock.utc(),
        }
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns whether the task will be listable.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Binds the storage-assigned identifier, producing a version-zero task.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            company_id: self.company_id,
            details: self.details,
            task_type: self.task_type,
            step: TaskStep::Available,
            is_active: self.is_active,
            completed_at: None,
            verified_at: None,
            created_at: self.created_at,
            updated_at: self.created_at,
            version: 0,
        }
    }
}
