//! Request payloads accepted by [`super::TrackerService`].
//!
//! Partial updates use explicit presence: a field left untouched keeps its
//! stored value, while clearable fields distinguish "set" from "clear".

use crate::tracker::domain::{
    ProjectChanges, ProjectId, SprintChanges, SprintId, SprintStatus, TaskChanges, TaskStatus,
    Title, TrackerDomainError,
};
use chrono::{DateTime, Utc};

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    pub(crate) title: String,
    pub(crate) description: String,
}

impl CreateProjectRequest {
    /// Creates a request with the project title and description.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Partial update of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    title: Option<String>,
    description: Option<String>,
    image_url: Option<Option<String>>,
}

impl UpdateProjectRequest {
    /// Creates an empty update that leaves every field untouched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(Some(image_url.into()));
        self
    }

    /// Removes the image URL.
    #[must_use]
    pub fn clear_image_url(mut self) -> Self {
        self.image_url = Some(None);
        self
    }

    pub(crate) fn into_changes(self) -> Result<ProjectChanges, TrackerDomainError> {
        Ok(ProjectChanges {
            title: self.title.map(Title::new).transpose()?,
            description: self.description,
            image_url: self.image_url,
        })
    }
}

/// Request payload for planning a sprint inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSprintRequest {
    pub(crate) project_id: ProjectId,
    pub(crate) title: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) starting_thoughts: String,
}

impl CreateSprintRequest {
    /// Creates a request for a sprint in `project_id`.
    ///
    /// Dates accept `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            starting_thoughts: String::new(),
        }
    }

    /// Sets the notes written when the sprint is planned.
    #[must_use]
    pub fn with_starting_thoughts(mut self, thoughts: impl Into<String>) -> Self {
        self.starting_thoughts = thoughts.into();
        self
    }
}

/// Partial update of a sprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSprintRequest {
    title: Option<String>,
    ending_thoughts: Option<Option<String>>,
    status: Option<String>,
}

impl UpdateSprintRequest {
    /// Creates an empty update that leaves every field untouched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the retrospective notes.
    #[must_use]
    pub fn with_ending_thoughts(mut self, thoughts: impl Into<String>) -> Self {
        self.ending_thoughts = Some(Some(thoughts.into()));
        self
    }

    /// Removes the retrospective notes.
    #[must_use]
    pub fn clear_ending_thoughts(mut self) -> Self {
        self.ending_thoughts = Some(None);
        self
    }

    /// Sets the status from its wire name, e.g. `IN_PROGRESS`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub(crate) fn into_changes(self) -> Result<SprintChanges, TrackerDomainError> {
        let status = self
            .status
            .as_deref()
            .map(SprintStatus::try_from)
            .transpose()?;
        Ok(SprintChanges {
            title: self.title.map(Title::new).transpose()?,
            ending_thoughts: self.ending_thoughts,
            status,
        })
    }
}

/// Request payload for adding a task to a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(crate) sprint_id: SprintId,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request for a task in `sprint_id`.
    #[must_use]
    pub fn new(sprint_id: SprintId, title: impl Into<String>) -> Self {
        Self {
            sprint_id,
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a task.
///
/// Explicit timestamps are applied before the status transition, so a
/// transition only fills timestamps that remain unset afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<String>,
    started_at: Option<Option<DateTime<Utc>>>,
    finished_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update that leaves every field untouched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Sets the status from its wire name: `TODO`, `IN_PROGRESS`, or `DONE`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the start timestamp explicitly.
    #[must_use]
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(Some(started_at));
        self
    }

    /// Clears the start timestamp.
    #[must_use]
    pub fn clear_started_at(mut self) -> Self {
        self.started_at = Some(None);
        self
    }

    /// Sets the finish timestamp explicitly.
    #[must_use]
    pub fn with_finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(Some(finished_at));
        self
    }

    /// Clears the finish timestamp.
    #[must_use]
    pub fn clear_finished_at(mut self) -> Self {
        self.finished_at = Some(None);
        self
    }

    pub(crate) fn into_changes(self) -> Result<TaskChanges, TrackerDomainError> {
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?;
        Ok(TaskChanges {
            title: self.title.map(Title::new).transpose()?,
            description: self.description,
            status,
            started_at: self.started_at,
            finished_at: self.finished_at,
        })
    }
}
