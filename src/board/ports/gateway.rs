//! Remote task operations a board session depends on.

use crate::tracker::domain::{EntityRef, SprintId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task gateway operations.
pub type TaskGatewayResult<T> = Result<T, TaskGatewayError>;

/// Status change produced by moving a task across columns.
///
/// Timestamps are forwarded as computed by the board; `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusChange {
    /// Task being moved.
    pub task_id: TaskId,
    /// Status of the target column.
    pub status: TaskStatus,
    /// Start timestamp after the move.
    pub started_at: Option<DateTime<Utc>>,
    /// Finish timestamp after the move.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Task persistence as seen from a board.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Loads the tasks of a sprint in store order.
    async fn load_sprint_tasks(&self, sprint_id: SprintId) -> TaskGatewayResult<Vec<Task>>;

    /// Persists a task's new status and timestamps.
    async fn update_task_status(&self, change: TaskStatusChange) -> TaskGatewayResult<Task>;

    /// Creates a task in `sprint_id` and returns the stored record.
    async fn create_task(
        &self,
        sprint_id: SprintId,
        title: String,
        description: Option<String>,
    ) -> TaskGatewayResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, task_id: TaskId) -> TaskGatewayResult<()>;
}

/// Errors returned by task gateways.
#[derive(Debug, Clone, Error)]
pub enum TaskGatewayError {
    /// The addressed record no longer exists for the caller.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// The remote side refused or failed the request.
    #[error("task gateway failure: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskGatewayError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
