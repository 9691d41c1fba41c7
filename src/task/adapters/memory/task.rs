//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{NewTask, Task, TaskId, TaskOperation, TaskOperationId, TaskRecord},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// A single write lock spans each version check and write, which gives the
/// same at-most-one-winner behaviour as the `PostgreSQL` adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    operations: HashMap<TaskId, TaskOperation>,
    last_task_id: i64,
    last_operation_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the operation paired with `task_id`, leaving the task in place.
    ///
    /// Mirrors storage where the operation row was removed out of band.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] if the lock is poisoned.
    pub fn detach_operation(&self, task_id: TaskId) -> TaskRepositoryResult<Option<TaskOperation>> {
        let mut state = self.state.write().map_err(poisoned)?;
        Ok(state.operations.remove(&task_id))
    }
}

fn poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(
        &self,
        task: &NewTask,
        access: &BTreeSet<UserId>,
    ) -> TaskRepositoryResult<TaskRecord> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.last_task_id += 1;
        state.last_operation_id += 1;
        let task_id = TaskId::new(state.last_task_id);
        let operation_id = TaskOperationId::new(state.last_operation_id);

        let stored_task = task.clone().into_task(task_id);
        let operation = TaskOperation::new(operation_id, task_id, access.iter().copied());
        state.tasks.insert(task_id, stored_task.clone());
        state.operations.insert(task_id, operation.clone());
        Ok(TaskRecord::new(stored_task, operation))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_operation(&self, task_id: TaskId) -> TaskRepositoryResult<Option<TaskOperation>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.operations.get(&task_id).cloned())
    }

    async fn save(&self, record: &TaskRecord) -> TaskRepositoryResult<TaskRecord> {
        let mut state = self.state.write().map_err(poisoned)?;
        let task_id = record.task().id();
        let expected_version = record.task().version();

        let stored = state
            .tasks
            .get(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        if stored.version() != expected_version {
            return Err(TaskRepositoryError::ConcurrentConflict {
                task_id,
                expected_version,
            });
        }

        let (mut task, operation) = record.clone().into_parts();
        task.advance_version();
        state.tasks.insert(task_id, task.clone());
        state.operations.insert(task_id, operation.clone());
        Ok(TaskRecord::new(task, operation))
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task, state.operations.get(&task.id())))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.details().deadline(), task.id()));
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.operations.remove(&id);
        Ok(())
    }
}
