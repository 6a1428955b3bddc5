//! Board session for one sprint: local column state plus persisted moves.

use crate::board::{
    domain::{BoardColumns, BoardError, BoardNotification, Column, MoveOutcome},
    ports::{TaskGateway, TaskStatusChange},
};
use crate::tracker::domain::{SprintId, Task, TaskId};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ERROR_UPDATING_STATUS: &str = "Error updating task status";
const TASK_ADDED: &str = "Task added successfully";
const ERROR_ADDING_TASK: &str = "Error adding task";
const TITLE_REQUIRED: &str = "Task title is required";
const TASK_DELETED: &str = "Task deleted successfully";
const FAILED_TO_DELETE: &str = "Failed to delete task";

/// Columns and pending notifications captured after a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Column state at capture time.
    pub columns: BoardColumns,
    /// Notifications queued since the previous capture, oldest first.
    pub notifications: Vec<BoardNotification>,
}

/// Interactive board over the tasks of one sprint.
///
/// Reorders within a column are local only. Moves across columns are applied
/// optimistically and persisted through the gateway; a failed persist
/// restores the columns exactly as they were before the move. Every method
/// takes `&mut self`, so one gesture completes before the next starts.
pub struct BoardSession<G, C>
where
    G: TaskGateway,
    C: Clock + Send + Sync,
{
    sprint_id: SprintId,
    columns: BoardColumns,
    gateway: Arc<G>,
    clock: Arc<C>,
    notifications: Vec<BoardNotification>,
}

impl<G, C> BoardSession<G, C>
where
    G: TaskGateway,
    C: Clock + Send + Sync,
{
    /// Creates a session from tasks already loaded for `sprint_id`.
    #[must_use]
    pub fn new(sprint_id: SprintId, tasks: Vec<Task>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            sprint_id,
            columns: BoardColumns::from_tasks(tasks),
            gateway,
            clock,
            notifications: Vec::new(),
        }
    }

    /// Loads the tasks of `sprint_id` through the gateway and opens a
    /// session over them.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LoadFailed`] when the gateway cannot load the
    /// sprint.
    pub async fn open(sprint_id: SprintId, gateway: Arc<G>, clock: Arc<C>) -> Result<Self, BoardError> {
        let tasks = gateway
            .load_sprint_tasks(sprint_id)
            .await
            .map_err(|source| BoardError::LoadFailed { sprint_id, source })?;
        debug!(sprint_id = %sprint_id, count = tasks.len(), "opened board");
        Ok(Self::new(sprint_id, tasks, gateway, clock))
    }

    /// Returns the sprint shown on this board.
    #[must_use]
    pub const fn sprint_id(&self) -> SprintId {
        self.sprint_id
    }

    /// Returns the current column state.
    #[must_use]
    pub const fn columns(&self) -> &BoardColumns {
        &self.columns
    }

    /// Returns queued notifications without consuming them.
    #[must_use]
    pub fn notifications(&self) -> &[BoardNotification] {
        &self.notifications
    }

    /// Removes and returns all queued notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<BoardNotification> {
        std::mem::take(&mut self.notifications)
    }

    /// Captures the current columns and drains the notification queue.
    ///
    /// Works the same after a failed gesture, so callers can show the
    /// reverted board together with the error notification.
    pub fn snapshot(&mut self) -> BoardSnapshot {
        BoardSnapshot {
            columns: self.columns.clone(),
            notifications: self.drain_notifications(),
        }
    }

    /// Moves the task at `drag_index` in `source` to `hover_index` in
    /// `target`.
    ///
    /// `hover_index` past the end of the target column appends. A move
    /// within one column is a local reorder. A move across columns takes the
    /// target column's status, stamps `started_at` or `finished_at` when
    /// first entering `IN_PROGRESS` or `DONE`, and is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskIndexOutOfRange`] without changing the
    /// board when `drag_index` does not address a task, or
    /// [`BoardError::StatusUpdateFailed`] after restoring the board when the
    /// gateway rejects the status change.
    pub async fn move_task(
        &mut self,
        drag_index: usize,
        hover_index: usize,
        source: Column,
        target: Column,
    ) -> Result<MoveOutcome, BoardError> {
        let snapshot = self.columns.clone();
        let Some(mut task) = self.columns.take(source, drag_index) else {
            return Err(BoardError::TaskIndexOutOfRange {
                column: source,
                index: drag_index,
            });
        };

        if source == target {
            let position = self.columns.insert(target, hover_index, task);
            debug!(column = %target, from = drag_index, to = position, "reordered task");
            return Ok(MoveOutcome::Reordered);
        }

        let task_id = task.id();
        let from = task.status();
        let to = target.status();
        task.transition_to(to, &*self.clock);
        let change = TaskStatusChange {
            task_id,
            status: to,
            started_at: task.started_at(),
            finished_at: task.finished_at(),
        };
        self.columns.insert(target, hover_index, task);

        match self.gateway.update_task_status(change).await {
            Ok(_) => {
                info!(task_id = %task_id, from = from.as_str(), to = to.as_str(), "moved task");
                self.notifications
                    .push(BoardNotification::success(format!("Task moved to {}", target.title())));
                Ok(MoveOutcome::StatusChanged { task_id, from, to })
            }
            Err(source) => {
                warn!(task_id = %task_id, error = %source, "status update failed, reverting move");
                self.columns = snapshot;
                self.notifications
                    .push(BoardNotification::error(ERROR_UPDATING_STATUS));
                Err(BoardError::StatusUpdateFailed { task_id, source })
            }
        }
    }

    /// Creates a task through the gateway and appends it to the `To Do`
    /// column once stored. A blank description is sent as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyTaskTitle`] without contacting the gateway
    /// when `title` is blank, or [`BoardError::CreateFailed`] when the
    /// gateway rejects the task. The board is unchanged on error.
    pub async fn add_task(
        &mut self,
        title: &str,
        description: Option<String>,
    ) -> Result<Task, BoardError> {
        if title.trim().is_empty() {
            self.notifications.push(BoardNotification::error(TITLE_REQUIRED));
            return Err(BoardError::EmptyTaskTitle);
        }
        let details = description.filter(|text| !text.trim().is_empty());

        match self
            .gateway
            .create_task(self.sprint_id, title.to_owned(), details)
            .await
        {
            Ok(task) => {
                info!(task_id = %task.id(), sprint_id = %self.sprint_id, "added task to board");
                self.columns.push(Column::Todo, task.clone());
                self.notifications.push(BoardNotification::success(TASK_ADDED));
                Ok(task)
            }
            Err(source) => {
                warn!(sprint_id = %self.sprint_id, error = %source, "task creation failed");
                self.notifications.push(BoardNotification::error(ERROR_ADDING_TASK));
                Err(BoardError::CreateFailed(source))
            }
        }
    }

    /// Removes the task with `task_id` from the board without contacting
    /// the gateway.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        self.columns.remove_task(task_id)
    }

    /// Deletes the task remotely, then removes its card.
    ///
    /// Returns the removed card, or `None` when the task was not on this
    /// board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DeleteFailed`] and keeps the card when the
    /// gateway rejects the delete.
    pub async fn delete_task(&mut self, task_id: TaskId) -> Result<Option<Task>, BoardError> {
        match self.gateway.delete_task(task_id).await {
            Ok(()) => {
                info!(task_id = %task_id, "deleted task from board");
                self.notifications.push(BoardNotification::success(TASK_DELETED));
                Ok(self.remove_task(task_id))
            }
            Err(source) => {
                warn!(task_id = %task_id, error = %source, "task delete failed");
                self.notifications.push(BoardNotification::error(FAILED_TO_DELETE));
                Err(BoardError::DeleteFailed { task_id, source })
            }
        }
    }
}
