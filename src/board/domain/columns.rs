//! Column-partitioned task state for one sprint board.

use super::Column;
use crate::tracker::domain::{Task, TaskId};
use serde::Serialize;

/// Tasks of one sprint partitioned into the three board columns.
///
/// Order within a column is the display order. A task appears in at most
/// one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardColumns {
    todo: Vec<Task>,
    #[serde(rename = "in-progress")]
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

impl BoardColumns {
    /// Partitions `tasks` by status, keeping their relative order.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns = Self::default();
        for task in tasks {
            columns.push(Column::from_status(task.status()), task);
        }
        columns
    }

    /// Returns the tasks shown in `column`.
    #[must_use]
    pub fn tasks(&self, column: Column) -> &[Task] {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<Task> {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }

    /// Removes and returns the task at `index` in `column`.
    ///
    /// Returns `None` and leaves the board untouched when `index` is out of
    /// range.
    pub fn take(&mut self, column: Column, index: usize) -> Option<Task> {
        let tasks = self.column_mut(column);
        (index < tasks.len()).then(|| tasks.remove(index))
    }

    /// Inserts `task` at `index` in `column`, appending when `index` is past
    /// the end. Returns the position the task landed at.
    pub fn insert(&mut self, column: Column, index: usize, task: Task) -> usize {
        let tasks = self.column_mut(column);
        let position = index.min(tasks.len());
        tasks.insert(position, task);
        position
    }

    /// Appends `task` to `column`.
    pub fn push(&mut self, column: Column, task: Task) {
        self.column_mut(column).push(task);
    }

    /// Removes the first task with `task_id`, scanning columns in display
    /// order.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let (column, index) = self.position(task_id)?;
        self.take(column, index)
    }

    /// Locates the task with `task_id`.
    #[must_use]
    pub fn position(&self, task_id: TaskId) -> Option<(Column, usize)> {
        Column::ALL.into_iter().find_map(|column| {
            self.tasks(column)
                .iter()
                .position(|task| task.id() == task_id)
                .map(|index| (column, index))
        })
    }

    /// Total number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when no column holds a task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
