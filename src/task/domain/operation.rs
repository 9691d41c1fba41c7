//! Task operation side record holding access and executor membership.

use super::{TaskId, TaskOperationId};
use crate::identity::domain::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-task membership record.
///
/// The access set lists users the task was offered to; the executor set
/// lists users currently assigned to it. Membership lives here rather than
/// on [`super::Task`] so it can change without widening the task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOperation {
    id: TaskOperationId,
    task_id: TaskId,
    access: BTreeSet<UserId>,
    executors: BTreeSet<UserId>,
}

impl TaskOperation {
    /// Creates an operation with the given access set and no executors.
    #[must_use]
    pub fn new(
        id: TaskOperationId,
        task_id: TaskId,
        access: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            id,
            task_id,
            access: access.into_iter().collect(),
            executors: BTreeSet::new(),
        }
    }

    /// Reconstructs an operation from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TaskOperationId,
        task_id: TaskId,
        access: BTreeSet<UserId>,
        executors: BTreeSet<UserId>,
    ) -> Self {
        Self {
            id,
            task_id,
            access,
            executors,
        }
    }

    /// Returns the operation identifier.
    #[must_use]
    pub const fn id(&self) -> TaskOperationId {
        self.id
    }

    /// Returns the task this operation belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the users the task was offered to.
    #[must_use]
    pub const fn access(&self) -> &BTreeSet<UserId> {
        &self.access
    }

    /// Returns the users assigned to execute the task.
    #[must_use]
    pub const fn executors(&self) -> &BTreeSet<UserId> {
        &self.executors
    }

    /// Returns whether `user_id` may view and claim the task.
    #[must_use]
    pub fn has_access(&self, user_id: UserId) -> bool {
        self.access.contains(&user_id)
    }

    /// Returns whether `user_id` is assigned to the task.
    #[must_use]
    pub fn is_executor(&self, user_id: UserId) -> bool {
        self.executors.contains(&user_id)
    }

    /// Replaces the access set. Executors are kept.
    pub fn replace_access(&mut self, access: impl IntoIterator<Item = UserId>) {
        self.access = access.into_iter().collect();
    }

    pub(crate) fn assign_executors(&mut self, executors: impl IntoIterator<Item = UserId>) {
        self.executors.extend(executors);
    }
}
