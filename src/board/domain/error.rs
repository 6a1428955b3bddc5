//! Errors raised by board sessions.

use super::Column;
use crate::board::ports::TaskGatewayError;
use crate::tracker::domain::{SprintId, TaskId};
use thiserror::Error;

/// Errors returned by board operations.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// The drag index does not address a task in the source column.
    #[error("no task at index {index} in column {column}")]
    TaskIndexOutOfRange {
        /// Source column of the drag.
        column: Column,
        /// Requested index.
        index: usize,
    },

    /// A task was submitted without a title.
    #[error("task title is required")]
    EmptyTaskTitle,

    /// Persisting a column change failed; the board was restored.
    #[error("failed to update status of task {task_id}")]
    StatusUpdateFailed {
        /// Task whose move was reverted.
        task_id: TaskId,
        /// Gateway failure.
        #[source]
        source: TaskGatewayError,
    },

    /// Creating a task failed; the board was not changed.
    #[error("failed to create task")]
    CreateFailed(#[source] TaskGatewayError),

    /// Deleting a task failed; the board was not changed.
    #[error("failed to delete task {task_id}")]
    DeleteFailed {
        /// Task that was kept.
        task_id: TaskId,
        /// Gateway failure.
        #[source]
        source: TaskGatewayError,
    },

    /// Loading the sprint's tasks failed.
    #[error("failed to load tasks of sprint {sprint_id}")]
    LoadFailed {
        /// Sprint being opened.
        sprint_id: SprintId,
        /// Gateway failure.
        #[source]
        source: TaskGatewayError,
    },
}
