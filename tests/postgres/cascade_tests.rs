//! `PostgreSQL` cascading deletes and ownership filters.

use super::helpers::{BoxError, PgContext, context, unique_context};
use rstest::rstest;
use sprintboard::tracker::{
    domain::{OwnerIdentity, RequestContext},
    ports::TrackerRepository,
    services::{CreateProjectRequest, CreateSprintRequest, CreateTaskRequest},
};

fn owner_of(ctx: &RequestContext) -> Result<&OwnerIdentity, BoxError> {
    ctx.identity().ok_or_else(|| "context has no identity".into())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_project_delete_cascades(
    #[future] context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let owner = unique_context("cascade")?;
    let project = ctx
        .service
        .create_project(&owner, CreateProjectRequest::new("Alpha", ""))
        .await?;
    let sprint = ctx
        .service
        .create_sprint(
            &owner,
            CreateSprintRequest::new(project.id(), "Sprint 1", "2026-04-06", "2026-04-17"),
        )
        .await?;
    let task = ctx
        .service
        .create_task(&owner, CreateTaskRequest::new(sprint.id(), "A"))
        .await?;

    ctx.service.delete_project(&owner, project.id()).await?;

    let identity = owner_of(&owner)?;
    assert!(ctx.repository.find_project(identity, project.id()).await?.is_none());
    assert!(ctx.repository.find_sprint(identity, sprint.id()).await?.is_none());
    assert!(ctx.repository.find_task(identity, task.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_sprint_delete_keeps_the_project(
    #[future] context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let owner = unique_context("sprint")?;
    let project = ctx
        .service
        .create_project(&owner, CreateProjectRequest::new("Alpha", ""))
        .await?;
    let sprint = ctx
        .service
        .create_sprint(
            &owner,
            CreateSprintRequest::new(project.id(), "Sprint 1", "2026-04-06", "2026-04-17"),
        )
        .await?;
    let task = ctx
        .service
        .create_task(&owner, CreateTaskRequest::new(sprint.id(), "A"))
        .await?;

    ctx.service.delete_sprint(&owner, sprint.id()).await?;

    let identity = owner_of(&owner)?;
    assert!(ctx.repository.find_task(identity, task.id()).await?.is_none());
    let details = ctx.service.get_project(&owner, project.id()).await?;
    assert!(details.sprints.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_foreign_owner_sees_nothing(
    #[future] context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let owner = unique_context("owner")?;
    let intruder = unique_context("intruder")?;
    let project = ctx
        .service
        .create_project(&owner, CreateProjectRequest::new("Alpha", ""))
        .await?;

    let lookup = ctx.service.get_project(&intruder, project.id()).await;
    assert!(matches!(lookup, Err(ref err) if err.is_not_found()));
    let delete = ctx.service.delete_project(&intruder, project.id()).await;
    assert!(matches!(delete, Err(ref err) if err.is_not_found()));
    assert!(ctx.service.list_projects(&intruder).await?.is_empty());

    ctx.service.get_project(&owner, project.id()).await?;
    Ok(())
}
