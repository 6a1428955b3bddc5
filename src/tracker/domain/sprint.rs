//! Sprint aggregate and its planning status.

use super::{OwnerIdentity, ParseSprintStatusError, ProjectId, SprintId, Title, TrackerDomainError};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Planning status of a sprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SprintStatus {
    /// Sprint is scheduled but has not started.
    #[default]
    Planned,
    /// Sprint is running.
    InProgress,
    /// Sprint has ended.
    Completed,
}

impl SprintStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl TryFrom<&str> for SprintStatus {
    type Error = ParseSprintStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "PLANNED" => Ok(Self::Planned),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseSprintStatusError(value.to_owned())),
        }
    }
}

/// Validated start and end dates of a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintSchedule {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl SprintSchedule {
    /// Creates a schedule, rejecting an end date before the start date.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::InvalidDateRange`] when `end_date`
    /// precedes `start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, TrackerDomainError> {
        if end_date < start_date {
            return Err(TrackerDomainError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Returns the first day of the sprint.
    #[must_use]
    pub const fn start_date(self) -> NaiveDate {
        self.start_date
    }

    /// Returns the last day of the sprint.
    #[must_use]
    pub const fn end_date(self) -> NaiveDate {
        self.end_date
    }
}

/// A time-boxed sprint within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    id: SprintId,
    project_id: ProjectId,
    owner: OwnerIdentity,
    title: Title,
    schedule: SprintSchedule,
    starting_thoughts: String,
    ending_thoughts: Option<String>,
    status: SprintStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSprintData {
    /// Persisted sprint identifier.
    pub id: SprintId,
    /// Persisted parent project identifier.
    pub project_id: ProjectId,
    /// Persisted owner identity.
    pub owner: OwnerIdentity,
    /// Persisted title.
    pub title: Title,
    /// Persisted schedule.
    pub schedule: SprintSchedule,
    /// Persisted goals written when the sprint was planned.
    pub starting_thoughts: String,
    /// Persisted retrospective notes, if any.
    pub ending_thoughts: Option<String>,
    /// Persisted planning status.
    pub status: SprintStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Parameter object for planning a new sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintPlan {
    /// Parent project.
    pub project_id: ProjectId,
    /// Sprint title.
    pub title: Title,
    /// Sprint dates.
    pub schedule: SprintSchedule,
    /// Goals written when the sprint is planned.
    pub starting_thoughts: String,
}

/// Field changes applied to a sprint. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintChanges {
    /// Replacement title.
    pub title: Option<Title>,
    /// Replacement retrospective notes; `Some(None)` clears them.
    pub ending_thoughts: Option<Option<String>>,
    /// Replacement planning status.
    pub status: Option<SprintStatus>,
}

impl Sprint {
    /// Creates a new sprint in the [`SprintStatus::Planned`] state.
    #[must_use]
    pub fn new(owner: OwnerIdentity, plan: SprintPlan, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SprintId::new(),
            project_id: plan.project_id,
            owner,
            title: plan.title,
            schedule: plan.schedule,
            starting_thoughts: plan.starting_thoughts,
            ending_thoughts: None,
            status: SprintStatus::Planned,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a sprint from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSprintData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            owner: data.owner,
            title: data.title,
            schedule: data.schedule,
            starting_thoughts: data.starting_thoughts,
            ending_thoughts: data.ending_thoughts,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the parent project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning identity.
    #[must_use]
    pub const fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    /// Returns the sprint title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the sprint dates.
    #[must_use]
    pub const fn schedule(&self) -> SprintSchedule {
        self.schedule
    }

    /// Returns the goals written when the sprint was planned.
    #[must_use]
    pub fn starting_thoughts(&self) -> &str {
        &self.starting_thoughts
    }

    /// Returns the retrospective notes, if any.
    #[must_use]
    pub fn ending_thoughts(&self) -> Option<&str> {
        self.ending_thoughts.as_deref()
    }

    /// Returns the planning status.
    #[must_use]
    pub const fn status(&self) -> SprintStatus {
        self.status
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

    /// Returns `true` when `identity` owns this sprint.
    #[must_use]
    pub fn is_owned_by(&self, identity: &OwnerIdentity) -> bool {
        &self.owner == identity
    }

    /// Applies the provided field changes.
    pub fn apply_changes(&mut self, changes: SprintChanges, clock: &impl Clock) {
        let SprintChanges {
            title,
            ending_thoughts,
            status,
        } = changes;
        if title.is_none() && ending_thoughts.is_none() && status.is_none() {
            return;
        }
        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(notes) = ending_thoughts {
            self.ending_thoughts = notes;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }
        self.updated_at = clock.utc();
    }
}
