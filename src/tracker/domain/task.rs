//! Task entity and its board status.

use super::{OwnerIdentity, ParseTaskStatusError, SprintId, TaskId, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Board status of a task. Each status maps to exactly one board column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// A unit of work tracked on a sprint board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    sprint_id: SprintId,
    owner: OwnerIdentity,
    title: Title,
    description: Option<String>,
    status: TaskStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted parent sprint identifier.
    pub sprint_id: SprintId,
    /// Persisted owner identity.
    pub owner: OwnerIdentity,
    /// Persisted title.
    pub title: Title,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted first-start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted first-finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field changes applied to a task.
///
/// Each field is independently present or absent. Nullable fields use a
/// nested `Option` so that `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<Title>,
    /// Replacement description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Target status.
    pub status: Option<TaskStatus>,
    /// Replacement first-start timestamp; `Some(None)` clears it.
    pub started_at: Option<Option<DateTime<Utc>>>,
    /// Replacement first-finish timestamp; `Some(None)` clears it.
    pub finished_at: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.started_at.is_none()
            && self.finished_at.is_none()
    }
}

impl Task {
    /// Creates a new task in the [`TaskStatus::Todo`] state with no
    /// start or finish timestamps.
    #[must_use]
    pub fn new(
        owner: OwnerIdentity,
        sprint_id: SprintId,
        title: Title,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            sprint_id,
            owner,
            title,
            description,
            status: TaskStatus::Todo,
            started_at: None,
            finished_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            sprint_id: data.sprint_id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            started_at: data.started_at,
            finished_at: data.finished_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the parent sprint identifier.
    #[must_use]
    pub const fn sprint_id(&self) -> SprintId {
        self.sprint_id
    }

    /// Returns the owning identity.
    #[must_use]
    pub const fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the board status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when the task first entered [`TaskStatus::InProgress`].
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the task first entered [`TaskStatus::Done`].
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `identity` owns this task.
    #[must_use]
    pub fn is_owned_by(&self, identity: &OwnerIdentity) -> bool {
        &self.owner == identity
    }

    /// Applies the provided field changes.
    ///
    /// Explicit timestamps are written first; the status transition then
    /// fills `started_at` or `finished_at` only if it is still unset.
    pub fn apply_changes(&mut self, changes: TaskChanges, clock: &impl Clock) {
        if changes.is_empty() {
            return;
        }
        let TaskChanges {
            title,
            description,
            status,
            started_at,
            finished_at,
        } = changes;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(timestamp) = started_at {
            self.started_at = timestamp;
        }
        if let Some(timestamp) = finished_at {
            self.finished_at = timestamp;
        }
        if let Some(target) = status {
            self.transition_to(target, clock);
        }
        self.updated_at = clock.utc();
    }

    /// Moves the task to `target`, stamping the first entry into
    /// [`TaskStatus::InProgress`] or [`TaskStatus::Done`].
    ///
    /// Any transition is permitted, including backwards ones. Backward moves
    /// leave existing timestamps in place.
    pub fn transition_to(&mut self, target: TaskStatus, clock: &impl Clock) {
        match target {
            TaskStatus::InProgress if self.started_at.is_none() => {
                self.started_at = Some(clock.utc());
            }
            TaskStatus::Done if self.finished_at.is_none() => {
                self.finished_at = Some(clock.utc());
            }
            _ => {}
        }
        self.status = target;
        self.updated_at = clock.utc();
    }
}
