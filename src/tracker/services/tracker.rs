//! Ownership-scoped orchestration of projects, sprints, and tasks.

use super::requests::{
    CreateProjectRequest, CreateSprintRequest, CreateTaskRequest, UpdateProjectRequest,
    UpdateSprintRequest, UpdateTaskRequest,
};
use crate::tracker::{
    domain::{
        EntityRef, OwnerIdentity, Project, ProjectId, RequestContext, Sprint, SprintId,
        SprintPlan, SprintSchedule, Task, TaskId, Title, TrackerDomainError, parse_calendar_date,
    },
    ports::{TrackerRepository, TrackerRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// A project together with its sprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetails {
    /// The requested project.
    pub project: Project,
    /// Sprints of the project, oldest first.
    pub sprints: Vec<Sprint>,
}

/// A sprint together with its owning project's title and its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintDetails {
    /// The requested sprint.
    pub sprint: Sprint,
    /// Title of the project the sprint belongs to.
    pub project_title: Title,
    /// Tasks of the sprint, oldest first.
    pub tasks: Vec<Task>,
}

/// Service-level errors for tracker operations.
#[derive(Debug, Error)]
pub enum TrackerServiceError {
    /// The request carried no owner identity.
    #[error("authentication required")]
    Unauthenticated,
    /// The entity does not exist or belongs to another identity.
    #[error("{0} not found")]
    NotFound(EntityRef),
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TrackerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TrackerRepositoryError),
}

impl TrackerServiceError {
    /// Returns `true` when the error reports a missing or foreign entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TrackerRepositoryError> for TrackerServiceError {
    fn from(err: TrackerRepositoryError) -> Self {
        match err {
            TrackerRepositoryError::NotFound(entity) => Self::NotFound(entity),
            other => Self::Repository(other),
        }
    }
}

/// Result type for tracker service operations.
pub type TrackerServiceResult<T> = Result<T, TrackerServiceError>;

/// Tracker orchestration service.
///
/// Every operation takes a [`RequestContext`]; a context without identity
/// fails with [`TrackerServiceError::Unauthenticated`] before the repository
/// is touched.
pub struct TrackerService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TrackerService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

fn require_identity(ctx: &RequestContext) -> TrackerServiceResult<&OwnerIdentity> {
    ctx.identity().ok_or(TrackerServiceError::Unauthenticated)
}

impl<R, C> TrackerService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new tracker service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a project owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Unauthenticated`] without identity,
    /// [`TrackerServiceError::Validation`] for an invalid title, or
    /// [`TrackerServiceError::Repository`] when persistence fails.
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        request: CreateProjectRequest,
    ) -> TrackerServiceResult<Project> {
        let owner = require_identity(ctx)?;
        let title = Title::new(request.title)?;
        let project = Project::new(owner.clone(), title, request.description, &*self.clock);
        self.repository.insert_project(&project).await?;
        info!(project_id = %project.id(), owner = %owner, "created project");
        Ok(project)
    }

    /// Lists the caller's projects, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Unauthenticated`] without identity or
    /// [`TrackerServiceError::Repository`] when the lookup fails.
    pub async fn list_projects(&self, ctx: &RequestContext) -> TrackerServiceResult<Vec<Project>> {
        let owner = require_identity(ctx)?;
        let projects = self.repository.list_projects(owner).await?;
        debug!(owner = %owner, count = projects.len(), "listed projects");
        Ok(projects)
    }

    /// Loads a project together with its sprints.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::NotFound`] when the project is missing
    /// or owned by someone else.
    pub async fn get_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
    ) -> TrackerServiceResult<ProjectDetails> {
        let owner = require_identity(ctx)?;
        let project = self.owned_project(owner, id).await?;
        let sprints = self.repository.list_sprints(owner, id).await?;
        Ok(ProjectDetails { project, sprints })
    }

    /// Applies a partial update to one of the caller's projects.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Validation`] for an invalid title or
    /// [`TrackerServiceError::NotFound`] when the project is not the caller's.
    pub async fn update_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> TrackerServiceResult<Project> {
        let owner = require_identity(ctx)?;
        let changes = request.into_changes()?;
        let mut project = self.owned_project(owner, id).await?;
        project.apply_changes(changes, &*self.clock);
        self.repository.update_project(&project).await?;
        info!(project_id = %id, "updated project");
        Ok(project)
    }

    /// Deletes one of the caller's projects with all of its sprints and
    /// tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::NotFound`] when the project is not the
    /// caller's.
    pub async fn delete_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
    ) -> TrackerServiceResult<()> {
        let owner = require_identity(ctx)?;
        self.owned_project(owner, id).await?;
        self.repository.delete_project(id).await?;
        info!(project_id = %id, "deleted project");
        Ok(())
    }

    /// Plans a sprint in one of the caller's projects.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Validation`] for an invalid title or
    /// date, or [`TrackerServiceError::NotFound`] when the parent project is
    /// not the caller's.
    pub async fn create_sprint(
        &self,
        ctx: &RequestContext,
        request: CreateSprintRequest,
    ) -> TrackerServiceResult<Sprint> {
        let owner = require_identity(ctx)?;
        let title = Title::new(request.title)?;
        let start = parse_calendar_date("start date", &request.start_date)?;
        let end = parse_calendar_date("end date", &request.end_date)?;
        let schedule = SprintSchedule::new(start, end)?;
        self.owned_project(owner, request.project_id).await?;

        let plan = SprintPlan {
            project_id: request.project_id,
            title,
            schedule,
            starting_thoughts: request.starting_thoughts,
        };
        let sprint = Sprint::new(owner.clone(), plan, &*self.clock);
        self.repository.insert_sprint(&sprint).await?;
        info!(
            sprint_id = %sprint.id(),
            project_id = %sprint.project_id(),
            "created sprint"
        );
        Ok(sprint)
    }

    /// Loads a sprint with its project title and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::NotFound`] when the sprint is not the
    /// caller's.
    pub async fn get_sprint(
        &self,
        ctx: &RequestContext,
        id: SprintId,
    ) -> TrackerServiceResult<SprintDetails> {
        let owner = require_identity(ctx)?;
        let sprint = self.owned_sprint(owner, id).await?;
        let project = self.owned_project(owner, sprint.project_id()).await?;
        let tasks = self.repository.list_tasks(owner, id).await?;
        Ok(SprintDetails {
            sprint,
            project_title: project.title().clone(),
            tasks,
        })
    }

    /// Applies a partial update to one of the caller's sprints.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Validation`] for an invalid title or
    /// status, or [`TrackerServiceError::NotFound`] when the sprint is not
    /// the caller's.
    pub async fn update_sprint(
        &self,
        ctx: &RequestContext,
        id: SprintId,
        request: UpdateSprintRequest,
    ) -> TrackerServiceResult<Sprint> {
        let owner = require_identity(ctx)?;
        let changes = request.into_changes()?;
        let mut sprint = self.owned_sprint(owner, id).await?;
        sprint.apply_changes(changes, &*self.clock);
        self.repository.update_sprint(&sprint).await?;
        info!(sprint_id = %id, status = sprint.status().as_str(), "updated sprint");
        Ok(sprint)
    }

    /// Deletes one of the caller's sprints with all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::NotFound`] when the sprint is not the
    /// caller's.
    pub async fn delete_sprint(&self, ctx: &RequestContext, id: SprintId) -> TrackerServiceResult<()> {
        let owner = require_identity(ctx)?;
        self.owned_sprint(owner, id).await?;
        self.repository.delete_sprint(id).await?;
        info!(sprint_id = %id, "deleted sprint");
        Ok(())
    }

    /// Adds a task to one of the caller's sprints, in `TODO` with no
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Validation`] for an invalid title or
    /// [`TrackerServiceError::NotFound`] when the parent sprint is not the
    /// caller's.
    pub async fn create_task(
        &self,
        ctx: &RequestContext,
        request: CreateTaskRequest,
    ) -> TrackerServiceResult<Task> {
        let owner = require_identity(ctx)?;
        let title = Title::new(request.title)?;
        self.owned_sprint(owner, request.sprint_id).await?;
        let task = Task::new(
            owner.clone(),
            request.sprint_id,
            title,
            request.description,
            &*self.clock,
        );
        self.repository.insert_task(&task).await?;
        info!(task_id = %task.id(), sprint_id = %task.sprint_id(), "created task");
        Ok(task)
    }

    /// Loads one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::NotFound`] when the task is not the
    /// caller's.
    pub async fn get_task(&self, ctx: &RequestContext, id: TaskId) -> TrackerServiceResult<Task> {
        let owner = require_identity(ctx)?;
        self.owned_task(owner, id).await
    }

    /// Applies a partial update to one of the caller's tasks.
    ///
    /// A status change stamps `started_at` on first entry into
    /// `IN_PROGRESS` and `finished_at` on first entry into `DONE`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::Validation`] for an invalid title or
    /// status, or [`TrackerServiceError::NotFound`] when the task is not the
    /// caller's.
    pub async fn update_task(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TrackerServiceResult<Task> {
        let owner = require_identity(ctx)?;
        let changes = request.into_changes()?;
        let mut task = self.owned_task(owner, id).await?;
        let previous = task.status();
        task.apply_changes(changes, &*self.clock);
        self.repository.update_task(&task).await?;
        info!(
            task_id = %id,
            from = previous.as_str(),
            to = task.status().as_str(),
            "updated task"
        );
        Ok(task)
    }

    /// Deletes one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerServiceError::NotFound`] when the task is not the
    /// caller's.
    pub async fn delete_task(&self, ctx: &RequestContext, id: TaskId) -> TrackerServiceResult<()> {
        let owner = require_identity(ctx)?;
        self.owned_task(owner, id).await?;
        self.repository.delete_task(id).await?;
        info!(task_id = %id, "deleted task");
        Ok(())
    }

    async fn owned_project(
        &self,
        owner: &OwnerIdentity,
        id: ProjectId,
    ) -> TrackerServiceResult<Project> {
        let found = self.repository.find_project(owner, id).await?;
        debug!(project_id = %id, found = found.is_some(), "looked up project");
        found.ok_or_else(|| TrackerServiceError::NotFound(id.into()))
    }

    async fn owned_sprint(&self, owner: &OwnerIdentity, id: SprintId) -> TrackerServiceResult<Sprint> {
        let found = self.repository.find_sprint(owner, id).await?;
        debug!(sprint_id = %id, found = found.is_some(), "looked up sprint");
        found.ok_or_else(|| TrackerServiceError::NotFound(id.into()))
    }

    async fn owned_task(&self, owner: &OwnerIdentity, id: TaskId) -> TrackerServiceResult<Task> {
        let found = self.repository.find_task(owner, id).await?;
        debug!(task_id = %id, found = found.is_some(), "looked up task");
        found.ok_or_else(|| TrackerServiceError::NotFound(id.into()))
    }
}
