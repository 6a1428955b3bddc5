//! `PostgreSQL` repository implementation for tracker storage.

use super::{
    models::{
        NewProjectRow, NewSprintRow, NewTaskRow, ProjectChangeset, ProjectRow, SprintChangeset,
        SprintRow, TaskChangeset, TaskRow,
    },
    schema::{projects, sprints, tasks},
};
use crate::tracker::{
    domain::{
        EntityRef, OwnerIdentity, PersistedProjectData, PersistedSprintData, PersistedTaskData,
        Project, ProjectId, Sprint, SprintId, SprintSchedule, SprintStatus, Task, TaskId,
        TaskStatus, Title,
    },
    ports::{TrackerRepository, TrackerRepositoryError, TrackerRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed tracker repository.
#[derive(Debug, Clone)]
pub struct PostgresTrackerRepository {
    pool: TrackerPgPool,
}

impl PostgresTrackerRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TrackerRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TrackerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackerRepositoryError::persistence)?
    }
}

impl From<DieselError> for TrackerRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Maps insert failures onto duplicate-key and missing-parent errors.
fn map_insert_error(err: DieselError, entity: EntityRef, parent: EntityRef) -> TrackerRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TrackerRepositoryError::DuplicateEntity(entity)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TrackerRepositoryError::NotFound(parent)
        }
        other => TrackerRepositoryError::persistence(other),
    }
}

fn require_affected(affected: usize, entity: EntityRef) -> TrackerRepositoryResult<()> {
    if affected == 0 {
        return Err(TrackerRepositoryError::NotFound(entity));
    }
    Ok(())
}

#[async_trait]
impl TrackerRepository for PostgresTrackerRepository {
    async fn insert_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let entity = EntityRef::from(project.id());
        let new_row = NewProjectRow {
            id: project.id().into_inner(),
            owner_identity: project.owner().as_str().to_owned(),
            title: project.title().as_str().to_owned(),
            description: project.description().to_owned(),
            image_url: project.image_url().map(str::to_owned),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, entity, entity))?;
            Ok(())
        })
        .await
    }

    async fn find_project(
        &self,
        owner: &OwnerIdentity,
        id: ProjectId,
    ) -> TrackerRepositoryResult<Option<Project>> {
        let owner_identity = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .filter(projects::owner_identity.eq(owner_identity))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_projects(&self, owner: &OwnerIdentity) -> TrackerRepositoryResult<Vec<Project>> {
        let owner_identity = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::owner_identity.eq(owner_identity))
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let id = project.id();
        let changeset = ProjectChangeset {
            title: project.title().as_str().to_owned(),
            description: project.description().to_owned(),
            image_url: project.image_url().map(str::to_owned),
            updated_at: project.updated_at(),
        };
        self.run_blocking(move |connection| {
            let affected = diesel::update(projects::table.find(id.into_inner()))
                .set(&changeset)
                .execute(connection)?;
            require_affected(affected, id.into())
        })
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TrackerRepositoryError, _>(|tx| {
                let project_uuid = id.into_inner();
                let sprint_ids = sprints::table
                    .filter(sprints::project_id.eq(project_uuid))
                    .select(sprints::id);
                let removed_tasks = diesel::delete(tasks::table.filter(tasks::sprint_id.eq_any(sprint_ids)))
                    .execute(tx)?;
                let removed_sprints =
                    diesel::delete(sprints::table.filter(sprints::project_id.eq(project_uuid)))
                        .execute(tx)?;
                let removed = diesel::delete(projects::table.find(project_uuid)).execute(tx)?;
                require_affected(removed, id.into())?;
                debug!(
                    project_id = %id,
                    removed_sprints,
                    removed_tasks,
                    "cascaded project delete"
                );
                Ok(())
            })
        })
        .await
    }

    async fn insert_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let entity = EntityRef::from(sprint.id());
        let parent = EntityRef::from(sprint.project_id());
        let schedule = sprint.schedule();
        let new_row = NewSprintRow {
            id: sprint.id().into_inner(),
            project_id: sprint.project_id().into_inner(),
            owner_identity: sprint.owner().as_str().to_owned(),
            title: sprint.title().as_str().to_owned(),
            start_date: schedule.start_date(),
            end_date: schedule.end_date(),
            starting_thoughts: sprint.starting_thoughts().to_owned(),
            ending_thoughts: sprint.ending_thoughts().map(str::to_owned),
            status: sprint.status().as_str().to_owned(),
            created_at: sprint.created_at(),
            updated_at: sprint.updated_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(sprints::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, entity, parent))?;
            Ok(())
        })
        .await
    }

    async fn find_sprint(
        &self,
        owner: &OwnerIdentity,
        id: SprintId,
    ) -> TrackerRepositoryResult<Option<Sprint>> {
        let owner_identity = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = sprints::table
                .filter(sprints::id.eq(id.into_inner()))
                .filter(sprints::owner_identity.eq(owner_identity))
                .select(SprintRow::as_select())
                .first::<SprintRow>(connection)
                .optional()?;
            row.map(row_to_sprint).transpose()
        })
        .await
    }

    async fn list_sprints(
        &self,
        owner: &OwnerIdentity,
        project_id: ProjectId,
    ) -> TrackerRepositoryResult<Vec<Sprint>> {
        let owner_identity = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = sprints::table
                .filter(sprints::project_id.eq(project_id.into_inner()))
                .filter(sprints::owner_identity.eq(owner_identity))
                .order((sprints::created_at.asc(), sprints::id.asc()))
                .select(SprintRow::as_select())
                .load::<SprintRow>(connection)?;
            rows.into_iter().map(row_to_sprint).collect()
        })
        .await
    }

    async fn update_sprint(&self, sprint: &Sprint) -> TrackerRepositoryResult<()> {
        let id = sprint.id();
        let changeset = SprintChangeset {
            title: sprint.title().as_str().to_owned(),
            ending_thoughts: sprint.ending_thoughts().map(str::to_owned),
            status: sprint.status().as_str().to_owned(),
            updated_at: sprint.updated_at(),
        };
        self.run_blocking(move |connection| {
            let affected = diesel::update(sprints::table.find(id.into_inner()))
                .set(&changeset)
                .execute(connection)?;
            require_affected(affected, id.into())
        })
        .await
    }

    async fn delete_sprint(&self, id: SprintId) -> TrackerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TrackerRepositoryError, _>(|tx| {
                let sprint_uuid = id.into_inner();
                let removed_tasks =
                    diesel::delete(tasks::table.filter(tasks::sprint_id.eq(sprint_uuid)))
                        .execute(tx)?;
                let removed = diesel::delete(sprints::table.find(sprint_uuid)).execute(tx)?;
                require_affected(removed, id.into())?;
                debug!(sprint_id = %id, removed_tasks, "cascaded sprint delete");
                Ok(())
            })
        })
        .await
    }

    async fn insert_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let entity = EntityRef::from(task.id());
        let parent = EntityRef::from(task.sprint_id());
        let new_row = NewTaskRow {
            id: task.id().into_inner(),
            sprint_id: task.sprint_id().into_inner(),
            owner_identity: task.owner().as_str().to_owned(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            started_at: task.started_at(),
            finished_at: task.finished_at(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, entity, parent))?;
            Ok(())
        })
        .await
    }

    async fn find_task(
        &self,
        owner: &OwnerIdentity,
        id: TaskId,
    ) -> TrackerRepositoryResult<Option<Task>> {
        let owner_identity = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner_identity.eq(owner_identity))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks(
        &self,
        owner: &OwnerIdentity,
        sprint_id: SprintId,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        let owner_identity = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::sprint_id.eq(sprint_id.into_inner()))
                .filter(tasks::owner_identity.eq(owner_identity))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let id = task.id();
        let changeset = TaskChangeset {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            started_at: task.started_at(),
            finished_at: task.finished_at(),
            updated_at: task.updated_at(),
        };
        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(id.into_inner()))
                .set(&changeset)
                .execute(connection)?;
            require_affected(affected, id.into())
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> TrackerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            require_affected(removed, id.into())
        })
        .await
    }
}

fn owner_from_row(value: String) -> TrackerRepositoryResult<OwnerIdentity> {
    OwnerIdentity::new(value).map_err(TrackerRepositoryError::invalid_persisted_data)
}

fn title_from_row(value: String) -> TrackerRepositoryResult<Title> {
    Title::new(value).map_err(TrackerRepositoryError::invalid_persisted_data)
}

fn row_to_project(row: ProjectRow) -> TrackerRepositoryResult<Project> {
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        owner: owner_from_row(row.owner_identity)?,
        title: title_from_row(row.title)?,
        description: row.description,
        image_url: row.image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_sprint(row: SprintRow) -> TrackerRepositoryResult<Sprint> {
    let schedule = SprintSchedule::new(row.start_date, row.end_date)
        .map_err(TrackerRepositoryError::invalid_persisted_data)?;
    let status = SprintStatus::try_from(row.status.as_str())
        .map_err(TrackerRepositoryError::invalid_persisted_data)?;
    Ok(Sprint::from_persisted(PersistedSprintData {
        id: SprintId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        owner: owner_from_row(row.owner_identity)?,
        title: title_from_row(row.title)?,
        schedule,
        starting_thoughts: row.starting_thoughts,
        ending_thoughts: row.ending_thoughts,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_task(row: TaskRow) -> TrackerRepositoryResult<Task> {
    let status = TaskStatus::try_from(row.status.as_str())
        .map_err(TrackerRepositoryError::invalid_persisted_data)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        sprint_id: SprintId::from_uuid(row.sprint_id),
        owner: owner_from_row(row.owner_identity)?,
        title: title_from_row(row.title)?,
        description: row.description,
        status,
        started_at: row.started_at,
        finished_at: row.finished_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
