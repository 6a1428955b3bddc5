//! In-memory tracker repository for tests and local sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::tracker::{
    domain::{EntityRef, OwnerIdentity, Project, ProjectId, Sprint, SprintId, Task, TaskId},
    ports::{TrackerRepository, TrackerRepositoryError, TrackerRepositoryResult},
};

/// Thread-safe in-memory tracker repository.
///
/// Lists come back oldest first, ties broken by identifier, the same order
/// the `PostgreSQL` adapter uses. A single lock guards all three
/// collections, so a cascade is observed either completely or not at all.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerRepository {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    projects: Vec<Project>,
    sprints: Vec<Sprint>,
    tasks: Vec<Task>,
}

impl InMemoryTrackerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackerRepositoryResult<RwLockReadGuard<'_, InMemoryTrackerState>> {
        self.state.read().map_err(|err| {
            TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TrackerRepositoryResult<RwLockWriteGuard<'_, InMemoryTrackerState>> {
        self.state.write().map_err(|err| {
            TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Replaces the record matching `id_of(record) == id`, or reports it missing.
fn replace_record<T: Clone, K: PartialEq>(
    records: &mut [T],
    record: &T,
    id_of: impl Fn(&T) -> K,
    missing: EntityRef,
) -> TrackerRepositoryResult<()> {
    let key = id_of(record);
    let slot = records
        .iter_mut()
        .find(|existing| id_of(existing) == key)
        .ok_or(TrackerRepositoryError::NotFound(missing))?;
    *slot = record.clone();
    Ok(())
}

/// Sorts `records` by `(created_at, id)`.
fn oldest_first<T>(mut records: Vec<T>, key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) -> Vec<T> {
    records.sort_by_key(key);
    records
}

fn remove_sprint_tree(state: &mut InMemoryTrackerState, sprint_ids: &[SprintId]) {
    state
        .tasks
        .retain(|task| !sprint_ids.contains(&task.sprint_id()));
    state
        .sprints
        .retain(|sprint| !sprint_ids.contains(&sprint.id()));
}

#[async_trait]
impl TrackerRepository for InMemoryTrackerRepository {
    async fn insert_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        if state.projects.iter().any(|p| p.id() == project.id()) {
            return Err(TrackerRepositoryError::DuplicateEntity(project.id().into()));
        }
        state.projects.push(project.clone());
        Ok(())
    }

    async fn find_project(
        &self,
        owner: &OwnerIdentity,
        id: ProjectId,
    ) -> TrackerRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state
            .projects
            .iter()
            .find(|p| p.id() == id && p.is_owned_by(owner))
            .cloned())
    }

    async fn list_projects(&self, owner: &OwnerIdentity) -> TrackerRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        let owned = state
            .projects
            .iter()
            .filter(|p| p.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(oldest_first(owned, |p: &Project| {
            (p.created_at(), p.id().into_inner())
        }))
    }

    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        replace_record(
            &mut state.projects,
            project,
            Project::id,
            project.id().into(),
        )
    }

    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.projects.iter().any(|p| p.id() == id) {
            return Err(TrackerRepositoryError::NotFound(id.into()));
        }
        let sprint_ids: Vec<SprintId> = state
            .sprints
            .iter()
            .filter(|s| s.project_id() == id)
            .map(Sprint::id)
            .collect();
        remove_sprint_tree(&mut state, &sprint_ids);
        state.projects.retain(|p| p.id() != id);
        Ok(())
    }

    async fn insert_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        if state.sprints.iter().any(|s| s.id() == sprint.id()) {
            return Err(TrackerRepositoryError::DuplicateEntity(sprint.id().into()));
        }
        if !state.projects.iter().any(|p| p.id() == sprint.project_id()) {
            return Err(TrackerRepositoryError::NotFound(sprint.project_id().into()));
        }
        state.sprints.push(sprint.clone());
        Ok(())
    }

    async fn find_sprint(
        &self,
        owner: &OwnerIdentity,
        id: SprintId,
    ) -> TrackerRepositoryResult<Option<Sprint>> {
        let state = self.read()?;
        Ok(state
            .sprints
            .iter()
            .find(|s| s.id() == id && s.is_owned_by(owner))
            .cloned())
    }

    async fn list_sprints(
        &self,
        owner: &OwnerIdentity,
        project_id: ProjectId,
    ) -> TrackerRepositoryResult<Vec<Sprint>> {
        let state = self.read()?;
        let owned = state
            .sprints
            .iter()
            .filter(|s| s.project_id() == project_id && s.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(oldest_first(owned, |s: &Sprint| {
            (s.created_at(), s.id().into_inner())
        }))
    }

    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        replace_record(&mut state.sprints, sprint, Sprint::id, sprint.id().into())
    }

    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.sprints.iter().any(|s| s.id() == id) {
            return Err(TrackerRepositoryError::NotFound(id.into()));
        }
        remove_sprint_tree(&mut state, &[id]);
        Ok(())
    }

    async fn insert_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.iter().any(|t| t.id() == task.id()) {
            return Err(TrackerRepositoryError::DuplicateEntity(task.id().into()));
        }
        if !state.sprints.iter().any(|s| s.id() == task.sprint_id()) {
            return Err(TrackerRepositoryError::NotFound(task.sprint_id().into()));
        }
        state.tasks.push(task.clone());
        Ok(())
    }

    async fn find_task(
        &self,
        owner: &OwnerIdentity,
        id: TaskId,
    ) -> TrackerRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .iter()
            .find(|t| t.id() == id && t.is_owned_by(owner))
            .cloned())
    }

    async fn list_tasks(
        &self,
        owner: &OwnerIdentity,
        sprint_id: SprintId,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let owned = state
            .tasks
            .iter()
            .filter(|t| t.sprint_id() == sprint_id && t.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(oldest_first(owned, |t: &Task| {
            (t.created_at(), t.id().into_inner())
        }))
    }

    async fn update_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        replace_record(&mut state.tasks, task, Task::id, task.id().into())
    }

    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id() != id);
        if state.tasks.len() == before {
            return Err(TrackerRepositoryError::NotFound(id.into()));
        }
        Ok(())
    }
}
