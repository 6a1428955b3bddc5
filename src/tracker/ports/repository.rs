//! Repository port for project, sprint, and task persistence.
//!
//! Lookups are ownership-scoped: a record owned by a different identity is
//! reported exactly like a missing one. Deletes cascade to descendants and
//! must be atomic.

use crate::tracker::domain::{
    EntityRef, OwnerIdentity, Project, ProjectId, Sprint, SprintId, Task, TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracker repository operations.
pub type TrackerRepositoryResult<T> = Result<T, TrackerRepositoryError>;

/// Relational store contract for the tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateEntity`] when the project ID
    /// already exists.
    async fn insert_project(&self, project: &Project) -> TrackerRepositoryResult<()>;

    /// Finds a project by identifier, restricted to `owner`.
    ///
    /// Returns `None` when the project does not exist or is owned by another
    /// identity.
    async fn find_project(
        &self,
        owner: &OwnerIdentity,
        id: ProjectId,
    ) -> TrackerRepositoryResult<Option<Project>>;

    /// Returns every project owned by `owner`, oldest first.
    async fn list_projects(&self, owner: &OwnerIdentity) -> TrackerRepositoryResult<Vec<Project>>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()>;

    /// Deletes a project together with its sprints and their tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::NotFound`] when the project does not
    /// exist. On any failure nothing is removed.
    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()>;

    /// Stores a new sprint.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateEntity`] when the sprint ID
    /// already exists, or [`TrackerRepositoryError::NotFound`] when the parent
    /// project does not exist.
    async fn insert_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()>;

    /// Finds a sprint by identifier, restricted to `owner`.
    async fn find_sprint(
        &self,
        owner: &OwnerIdentity,
        id: SprintId,
    ) -> TrackerRepositoryResult<Option<Sprint>>;

    /// Returns the sprints of a project owned by `owner`, oldest first.
    async fn list_sprints(
        &self,
        owner: &OwnerIdentity,
        project_id: ProjectId,
    ) -> TrackerRepositoryResult<Vec<Sprint>>;

    /// Persists changes to an existing sprint.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::NotFound`] when the sprint does not
    /// exist.
    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()>;

    /// Deletes a sprint together with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::NotFound`] when the sprint does not
    /// exist. On any failure nothing is removed.
    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateEntity`] when the task ID
    /// already exists, or [`TrackerRepositoryError::NotFound`] when the parent
    /// sprint does not exist.
    async fn insert_task(&self, task: &Task) -> TrackerRepositoryResult<()>;

    /// Finds a task by identifier, restricted to `owner`.
    async fn find_task(
        &self,
        owner: &OwnerIdentity,
        id: TaskId,
    ) -> TrackerRepositoryResult<Option<Task>>;

    /// Returns the tasks of a sprint owned by `owner`, oldest first.
    async fn list_tasks(
        &self,
        owner: &OwnerIdentity,
        sprint_id: SprintId,
    ) -> TrackerRepositoryResult<Vec<Task>>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_task(&self, task: &Task) -> TrackerRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()>;
}

/// Errors returned by tracker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate {0}")]
    DuplicateEntity(EntityRef),

    /// The record was not found.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a data-quality error raised while reading persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }
}
