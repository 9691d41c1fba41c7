//! Request payloads accepted by the lifecycle service.

use crate::identity::domain::{CompanyId, UserId};
use crate::task::domain::{City, TaskType};
use chrono::NaiveDate;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) company_id: CompanyId,
    pub(super) name: String,
    pub(super) description: String,
    pub(super) deadline: NaiveDate,
    pub(super) payment: u64,
    pub(super) duration_weeks: Option<u32>,
    pub(super) task_type: TaskType,
    pub(super) city: Option<City>,
    pub(super) is_active: bool,
    pub(super) access_ids: Vec<UserId>,
    pub(super) executor_ids: Vec<UserId>,
}

impl CreateTaskRequest {
    /// Creates an active solo task request with required fields.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            company_id,
            name: name.into(),
            description: description.into(),
            deadline,
            payment: 0,
            duration_weeks: None,
            task_type: TaskType::default(),
            city: None,
            is_active: true,
            access_ids: Vec::new(),
            executor_ids: Vec::new(),
        }
    }

    /// Sets the payment amount.
    #[must_use]
    pub const fn with_payment(mut self, payment: u64) -> Self {
        self.payment = payment;
        self
    }

    /// Sets an explicit duration instead of deriving it from the deadline.
    #[must_use]
    pub const fn with_duration_weeks(mut self, weeks: u32) -> Self {
        self.duration_weeks = Some(weeks);
        self
    }

    /// Sets the task type.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Sets the city.
    #[must_use]
    pub const fn with_city(mut self, city: City) -> Self {
        self.city = Some(city);
        self
    }

    /// Sets whether the task is listable.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Sets the users the task is offered to.
    #[must_use]
    pub fn with_access(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.access_ids = users.into_iter().collect();
        self
    }

    /// Sets the users eligible to lead the task. They are offered the task
    /// as well.
    #[must_use]
    pub fn with_executors(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.executor_ids = users.into_iter().collect();
        self
    }
}

/// Partial update of a task's descriptive fields. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
    pub(super) deadline: Option<NaiveDate>,
    pub(super) payment: Option<u64>,
    pub(super) duration_weeks: Option<u32>,
    pub(super) city: Option<Option<City>>,
    pub(super) is_active: Option<bool>,
    pub(super) access_ids: Option<Vec<UserId>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the payment amount.
    #[must_use]
    pub const fn with_payment(mut self, payment: u64) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Replaces the duration.
    #[must_use]
    pub const fn with_duration_weeks(mut self, weeks: u32) -> Self {
        self.duration_weeks = Some(weeks);
        self
    }

    /// Sets or clears the city.
    #[must_use]
    pub const fn with_city(mut self, city: Option<City>) -> Self {
        self.city = Some(city);
        self
    }

    /// Changes whether the task is listable.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Replaces the access set.
    #[must_use]
    pub fn with_access(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.access_ids = Some(users.into_iter().collect());
        self
    }
}
