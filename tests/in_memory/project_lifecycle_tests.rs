//! In-memory integration tests for project, sprint, and task lifecycles.

use super::helpers::{TestService, add_tasks, context, project_with_sprint, service};
use eyre::{bail, ensure};
use rstest::rstest;
use sprintboard::tracker::{
    domain::{EntityRef, RequestContext, SprintStatus, TaskStatus},
    services::{
        CreateProjectRequest, TrackerServiceError, UpdateSprintRequest, UpdateTaskRequest,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_are_private_to_their_owner(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let v = context("v@example.com")?;

    let alpha = service
        .create_project(&u, CreateProjectRequest::new("Alpha", "Owned by U"))
        .await?;

    let listed = service.list_projects(&u).await?;
    ensure!(listed.len() == 1, "expected one project, found {}", listed.len());
    ensure!(listed.first().map(|p| p.title().as_str()) == Some("Alpha"));

    ensure!(service.list_projects(&v).await?.is_empty());
    match service.get_project(&v, alpha.id()).await {
        Err(TrackerServiceError::NotFound(EntityRef::Project(id))) if id == alpha.id() => Ok(()),
        other => bail!("expected NotFound for foreign project, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_are_listed_oldest_first(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    for title in ["First", "Second", "Third"] {
        service
            .create_project(&u, CreateProjectRequest::new(title, ""))
            .await?;
    }

    let titles: Vec<String> = service
        .list_projects(&u)
        .await?
        .iter()
        .map(|project| project.title().to_string())
        .collect();
    ensure!(titles == ["First", "Second", "Third"], "unexpected order {titles:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sprint_lifecycle_round_trip(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (project, sprint) = project_with_sprint(&service, &u, "Alpha").await?;

    ensure!(sprint.status() == SprintStatus::Planned);
    ensure!(sprint.project_id() == project.id());

    service
        .update_sprint(&u, sprint.id(), UpdateSprintRequest::new().with_status("IN_PROGRESS"))
        .await?;
    let closed = service
        .update_sprint(
            &u,
            sprint.id(),
            UpdateSprintRequest::new()
                .with_status("COMPLETED")
                .with_ending_thoughts("Shipped"),
        )
        .await?;

    let details = service.get_sprint(&u, sprint.id()).await?;
    ensure!(details.sprint == closed);
    ensure!(details.project_title.as_str() == "Alpha");
    ensure!(details.sprint.ending_thoughts() == Some("Shipped"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_progresses_through_the_board_statuses(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["Write docs"]).await?;
    let Some(task) = tasks.first() else {
        bail!("expected one created task");
    };
    ensure!(task.status() == TaskStatus::Todo);

    let started = service
        .update_task(&u, task.id(), UpdateTaskRequest::new().with_status("IN_PROGRESS"))
        .await?;
    let done = service
        .update_task(&u, task.id(), UpdateTaskRequest::new().with_status("DONE"))
        .await?;
    let reopened = service
        .update_task(&u, task.id(), UpdateTaskRequest::new().with_status("TODO"))
        .await?;

    ensure!(started.started_at().is_some());
    ensure!(done.started_at() == started.started_at());
    ensure!(done.finished_at().is_some());
    ensure!(reopened.status() == TaskStatus::Todo);
    ensure!(reopened.started_at() == started.started_at());
    ensure!(reopened.finished_at() == done.finished_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_requests_are_unauthenticated(service: TestService) -> eyre::Result<()> {
    let anonymous = RequestContext::anonymous();
    match service.list_projects(&anonymous).await {
        Err(TrackerServiceError::Unauthenticated) => Ok(()),
        other => bail!("expected Unauthenticated, got {other:?}"),
    }
}
