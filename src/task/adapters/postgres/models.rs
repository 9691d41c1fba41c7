//! Diesel row models for task persistence.

use super::schema::{task_access, task_executors, task_operations, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning company.
    pub company_id: i64,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Deadline date.
    pub deadline: NaiveDate,
    /// Payment amount.
    pub payment: i64,
    /// Duration in weeks.
    pub duration: i32,
    /// Optional city.
    pub city: Option<String>,
    /// Solo or group.
    pub task_type: String,
    /// Lifecycle step.
    pub task_step: String,
    /// Listing flag.
    pub is_active: bool,
    /// Completion date.
    pub completed_at: Option<NaiveDate>,
    /// Verification date.
    pub verified_at: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning company.
    pub company_id: i64,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Deadline date.
    pub deadline: NaiveDate,
    /// Payment amount.
    pub payment: i64,
    /// Duration in weeks.
    pub duration: i32,
    /// Optional city.
    pub city: Option<String>,
    /// Solo or group.
    pub task_type: String,
    /// Lifecycle step.
    pub task_step: String,
    /// Listing flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Initial version.
    pub version: i64,
}

/// Changeset written by version-checked saves.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks, treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Deadline date.
    pub deadline: NaiveDate,
    /// Payment amount.
    pub payment: i64,
    /// Duration in weeks.
    pub duration: i32,
    /// Optional city.
    pub city: Option<String>,
    /// Lifecycle step.
    pub task_step: String,
    /// Listing flag.
    pub is_active: bool,
    /// Completion date.
    pub completed_at: Option<NaiveDate>,
    /// Verification date.
    pub verified_at: Option<NaiveDate>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Advanced version.
    pub version: i64,
}

/// Query result row for task operations.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_operations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskOperationRow {
    /// Operation identifier.
    pub id: i64,
    /// Paired task.
    pub task_id: i64,
}

/// Insert model for task operations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_operations)]
pub struct NewTaskOperationRow {
    /// Paired task.
    pub task_id: i64,
}

/// Access set membership row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_access)]
pub struct TaskAccessRow {
    /// Owning operation.
    pub operation_id: i64,
    /// Member user.
    pub user_id: i64,
}

/// Executor set membership row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_executors)]
pub struct TaskExecutorRow {
    /// Owning operation.
    pub operation_id: i64,
    /// Member user.
    pub user_id: i64,
}
