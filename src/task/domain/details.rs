//! Validated descriptive fields of a task.

use super::{City, TaskDomainError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum task name length in characters.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

const DAYS_PER_WEEK: u64 = 7;

/// Descriptive task fields that carry no lifecycle meaning.
///
/// Construction validates name and description limits and requires the
/// deadline to be today or later. Later edits through the `with_*` methods
/// re-validate only the field they change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    name: String,
    description: String,
    deadline: NaiveDate,
    payment: u64,
    duration_weeks: u32,
    city: Option<City>,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// The duration defaults to the number of weeks until the deadline,
    /// rounded up, with a minimum of one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] validation variants for an empty or
    /// oversized name or description, or a deadline before `today`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, TaskDomainError> {
        ensure_deadline(deadline, today)?;
        Ok(Self {
            name: validated_name(name.into())?,
            description: validated_description(description.into())?,
            deadline,
            payment: 0,
            duration_weeks: weeks_until(deadline, today),
            city: None,
        })
    }

    /// Reconstructs details from persisted storage without validation.
    #[must_use]
    pub const fn from_persisted(
        name: String,
        description: String,
        deadline: NaiveDate,
        payment: u64,
        duration_weeks: u32,
        city: Option<City>,
    ) -> Self {
        Self {
            name,
            description,
            deadline,
            payment,
            duration_weeks,
            city,
        }
    }

    /// Replaces the task name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyName`] or
    /// [`TaskDomainError::NameTooLong`].
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, TaskDomainError> {
        self.name = validated_name(name.into())?;
        Ok(self)
    }

    /// Replaces the task description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] or
    /// [`TaskDomainError::DescriptionTooLong`].
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        self.description = validated_description(description.into())?;
        Ok(self)
    }

    /// Moves the deadline. The duration is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeadlineInPast`] when `deadline` is before
    /// `today`.
    pub fn with_deadline(
        mut self,
        deadline: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, TaskDomainError> {
        ensure_deadline(deadline, today)?;
        self.deadline = deadline;
        Ok(self)
    }

    /// Sets the payment amount.
    #[must_use]
    pub const fn with_payment(mut self, payment: u64) -> Self {
        self.payment = payment;
        self
    }

    /// Sets an explicit duration in weeks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ZeroDuration`] when `weeks` is zero.
    pub fn with_duration_weeks(mut self, weeks: u32) -> Result<Self, TaskDomainError> {
        if weeks == 0 {
            return Err(TaskDomainError::ZeroDuration);
        }
        self.duration_weeks = weeks;
        Ok(self)
    }

    /// Sets or clears the city.
    #[must_use]
    pub const fn with_city(mut self, city: Option<City>) -> Self {
        self.city = city;
        self
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    /// Returns the payment amount.
    #[must_use]
    pub const fn payment(&self) -> u64 {
        self.payment
    }

    /// Returns the duration in weeks.
    #[must_use]
    pub const fn duration_weeks(&self) -> u32 {
        self.duration_weeks
    }

    /// Returns the city, if any.
    #[must_use]
    pub const fn city(&self) -> Option<City> {
        self.city
    }
}

/// Number of whole or partial weeks from `today` until `deadline`, at least one.
#[must_use]
pub fn weeks_until(deadline: NaiveDate, today: NaiveDate) -> u32 {
    let days = u64::try_from((deadline - today).num_days()).unwrap_or(0);
    let weeks = days.div_ceil(DAYS_PER_WEEK).max(1);
    u32::try_from(weeks).unwrap_or(u32::MAX)
}

fn ensure_deadline(deadline: NaiveDate, today: NaiveDate) -> Result<(), TaskDomainError> {
    if deadline < today {
        return Err(TaskDomainError::DeadlineInPast { deadline, today });
    }
    Ok(())
}

fn validated_name(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(TaskDomainError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_owned())
}

fn validated_description(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyDescription);
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(TaskDomainError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LENGTH,
        });
    }
    Ok(trimmed.to_owned())
}
