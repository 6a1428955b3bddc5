//! Project aggregate root.

use super::{OwnerIdentity, ProjectId, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A project owned by a single identity; parent of sprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    owner: OwnerIdentity,
    title: Title,
    description: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted owner identity.
    pub owner: OwnerIdentity,
    /// Persisted title.
    pub title: Title,
    /// Persisted description.
    pub description: String,
    /// Persisted image URL, if any.
    pub image_url: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field changes applied to a project. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    /// Replacement title.
    pub title: Option<Title>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement image URL; `Some(None)` clears it.
    pub image_url: Option<Option<String>>,
}

impl ProjectChanges {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image_url.is_none()
    }
}

impl Project {
    /// Creates a new project owned by `owner`.
    #[must_use]
    pub fn new(
        owner: OwnerIdentity,
        title: Title,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            owner,
            title,
            description: description.into(),
            image_url: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            image_url: data.image_url,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning identity.
    #[must_use]
    pub const fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    /// Returns the project title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the cover image URL, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
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

    /// Returns `true` when `identity` owns this project.
    #[must_use]
    pub fn is_owned_by(&self, identity: &OwnerIdentity) -> bool {
        &self.owner == identity
    }

    /// Applies the provided field changes.
    pub fn apply_changes(&mut self, changes: ProjectChanges, clock: &impl Clock) {
        if changes.is_empty() {
            return;
        }
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = image_url;
        }
        self.updated_at = clock.utc();
    }
}
