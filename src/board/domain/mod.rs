//! Board state: columns, moves, and notifications.

mod column;
mod columns;
mod error;
mod notification;

pub use column::{Column, ParseColumnError};
pub use columns::BoardColumns;
pub use error::BoardError;
pub use notification::{BoardNotification, NotificationLevel};

use crate::tracker::domain::{TaskId, TaskStatus};
use serde::Serialize;

/// Result of a successful task move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The task changed position within its column. Nothing was persisted.
    Reordered,
    /// The task crossed columns and its new status was persisted.
    StatusChanged {
        /// The moved task.
        task_id: TaskId,
        /// Status before the move.
        from: TaskStatus,
        /// Status after the move.
        to: TaskStatus,
    },
}
