//! Repository port for task and task operation persistence.

use super::TaskFilter;
use crate::identity::domain::UserId;
use crate::task::domain::{NewTask, Task, TaskId, TaskOperation, TaskRecord};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// A task and its operation are written together: [`Self::create`] inserts
/// both, and [`Self::save`] replaces both under an optimistic version check
/// on the task row, so a save based on a stale read never commits.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task in the `Available` step with a paired operation whose
    /// access set is `access` and whose executor set is empty.
    ///
    /// Returns the stored pair with assigned identifiers.
    async fn create(
        &self,
        task: &NewTask,
        access: &BTreeSet<UserId>,
    ) -> TaskRepositoryResult<TaskRecord>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the operation paired with a task.
    ///
    /// Returns `None` when no operation exists for the task.
    async fn find_operation(&self, task_id: TaskId) -> TaskRepositoryResult<Option<TaskOperation>>;

    /// Persists the task and its operation if the stored task version still
    /// equals `record.task().version()`.
    ///
    /// Returns the stored pair carrying the advanced version.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::ConcurrentConflict`] when another writer
    /// saved first. Neither record is modified in either case.
    async fn save(&self, record: &TaskRecord) -> TaskRepositoryResult<TaskRecord>;

    /// Returns tasks matching `filter`, ordered by deadline then identifier.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task together with its operation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Another writer saved the task after it was read.
    #[error("concurrent modification of task {task_id}: expected version {expected_version}")]
    ConcurrentConflict {
        /// Affected task.
        task_id: TaskId,
        /// Version the failed save was based on.
        expected_version: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
