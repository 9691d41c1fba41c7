//! Domain model for the task lifecycle.
//!
//! A [`Task`] moves through [`TaskStep`]s; its [`TaskOperation`] records who
//! may claim it and who executes it. [`TaskRecord`] pairs the two and owns
//! the transition rules that depend on both. Infrastructure concerns stay
//! outside this boundary.

mod city;
mod details;
mod error;
mod ids;
mod operation;
mod record;
mod task;

pub use city::City;
pub use details::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, TaskDetails, weeks_until};
pub use error::{ParseCityError, ParseTaskStepError, ParseTaskTypeError, TaskDomainError};
pub use ids::{TaskId, TaskOperationId};
pub use operation::TaskOperation;
pub use record::TaskRecord;
pub use task::{NewTask, PersistedTaskData, Task, TaskStep, TaskType};
