//! User-facing feedback queued by board operations.

use serde::Serialize;

/// Severity of a board notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// The operation completed.
    Success,
    /// The operation failed and its effect was not kept.
    Error,
}

/// A message for the presentation layer to show once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardNotification {
    level: NotificationLevel,
    message: String,
}

impl BoardNotification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Returns the severity.
    #[must_use]
    pub const fn level(&self) -> NotificationLevel {
        self.level
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
