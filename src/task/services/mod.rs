//! Application services for task lifecycle orchestration.

mod error;
mod lifecycle;
mod request;

pub use error::{ErrorKind, TaskLifecycleError, TaskLifecycleResult};
pub use lifecycle::TaskLifecycleService;
pub use request::{CreateTaskRequest, UpdateTaskRequest};
