//! Listing filter for tasks.

use crate::identity::domain::UserId;
use crate::task::domain::{City, Task, TaskOperation, TaskStep, TaskType};
use chrono::NaiveDate;

/// Criteria for listing tasks. Unset criteria match everything.
///
/// Executor and access criteria match tasks whose respective set contains
/// at least one of the given users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks whose deadline is on or after this date.
    pub deadline_from: Option<NaiveDate>,
    /// Only tasks with this listing flag.
    pub is_active: Option<bool>,
    /// Only tasks of this type.
    pub task_type: Option<TaskType>,
    /// Only tasks in this step.
    pub step: Option<TaskStep>,
    /// Minimum payment, inclusive.
    pub min_payment: Option<u64>,
    /// Maximum payment, inclusive.
    pub max_payment: Option<u64>,
    /// Minimum duration in weeks, inclusive.
    pub min_duration: Option<u32>,
    /// Maximum duration in weeks, inclusive.
    pub max_duration: Option<u32>,
    /// Only tasks in this city.
    pub city: Option<City>,
    /// Case-insensitive substring of the task name.
    pub search: Option<String>,
    /// Tasks executed by any of these users.
    pub executor_ids: Vec<UserId>,
    /// Tasks offered to any of these users.
    pub access_ids: Vec<UserId>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given step.
    #[must_use]
    pub const fn with_step(mut self, step: TaskStep) -> Self {
        self.step = Some(step);
        self
    }

    /// Restricts to the given task type.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Restricts to tasks offered to any of `users`.
    #[must_use]
    pub fn with_access(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.access_ids = users.into_iter().collect();
        self
    }

    /// Restricts to tasks executed by any of `users`.
    #[must_use]
    pub fn with_executors(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.executor_ids = users.into_iter().collect();
        self
    }

    /// Restricts to names containing `needle`, ignoring case.
    #[must_use]
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Returns whether `task` and its operation satisfy every criterion.
    ///
    /// Adapters that cannot push filtering into storage use this directly.
    #[must_use]
    pub fn matches(&self, task: &Task, operation: Option<&TaskOperation>) -> bool {
        let details = task.details();
        let scalar_match = self.deadline_from.is_none_or(|from| details.deadline() >= from)
            && self.is_active.is_none_or(|flag| task.is_active() == flag)
            && self.task_type.is_none_or(|kind| task.task_type() == kind)
            && self.step.is_none_or(|step| task.step() == step)
            && self.min_payment.is_none_or(|min| details.payment() >= min)
            && self.max_payment.is_none_or(|max| details.payment() <= max)
            && self.min_duration.is_none_or(|min| details.duration_weeks() >= min)
            && self.max_duration.is_none_or(|max| details.duration_weeks() <= max)
            && self.city.is_none_or(|city| details.city() == Some(city))
            && self.search.as_deref().is_none_or(|needle| {
                details
                    .name()
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            });

        scalar_match
            && members_match(&self.executor_ids, operation, TaskOperation::is_executor)
            && members_match(&self.access_ids, operation, TaskOperation::has_access)
    }
}

fn members_match(
    wanted: &[UserId],
    operation: Option<&TaskOperation>,
    contains: fn(&TaskOperation, UserId) -> bool,
) -> bool {
    if wanted.is_empty() {
        return true;
    }
    operation.is_some_and(|op| wanted.iter().any(|user| contains(op, *user)))
}
