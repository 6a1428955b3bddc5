//! In-memory integration tests for cascading deletes.

use super::helpers::{TestService, add_tasks, context, project_with_sprint, service};
use eyre::ensure;
use rstest::rstest;
use sprintboard::tracker::services::{CreateSprintRequest, TrackerServiceError};

fn is_not_found<T>(result: &Result<T, TrackerServiceError>) -> bool {
    matches!(result, Err(error) if error.is_not_found())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_every_descendant(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (project, first) = project_with_sprint(&service, &u, "Alpha").await?;
    let second = service
        .create_sprint(
            &u,
            CreateSprintRequest::new(project.id(), "Sprint 2", "2026-04-20", "2026-05-01"),
        )
        .await?;
    let first_tasks = add_tasks(&service, &u, &first, &["A", "B"]).await?;
    let second_tasks = add_tasks(&service, &u, &second, &["C"]).await?;

    service.delete_project(&u, project.id()).await?;

    ensure!(is_not_found(&service.get_project(&u, project.id()).await));
    ensure!(is_not_found(&service.get_sprint(&u, first.id()).await));
    ensure!(is_not_found(&service.get_sprint(&u, second.id()).await));
    for task in first_tasks.iter().chain(&second_tasks) {
        ensure!(
            is_not_found(&service.get_task(&u, task.id()).await),
            "task {} survived the cascade",
            task.title()
        );
    }
    ensure!(service.list_projects(&u).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_sprint_keeps_siblings(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (project, doomed) = project_with_sprint(&service, &u, "Alpha").await?;
    let kept = service
        .create_sprint(
            &u,
            CreateSprintRequest::new(project.id(), "Sprint 2", "2026-04-20", "2026-05-01"),
        )
        .await?;
    let doomed_tasks = add_tasks(&service, &u, &doomed, &["A"]).await?;
    let kept_tasks = add_tasks(&service, &u, &kept, &["B"]).await?;

    service.delete_sprint(&u, doomed.id()).await?;

    for task in &doomed_tasks {
        ensure!(is_not_found(&service.get_task(&u, task.id()).await));
    }
    let remaining = service.get_sprint(&u, kept.id()).await?;
    ensure!(remaining.tasks == kept_tasks);
    let details = service.get_project(&u, project.id()).await?;
    ensure!(details.sprints.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_deletes_leave_data_intact(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let v = context("v@example.com")?;
    let (project, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["A"]).await?;

    ensure!(is_not_found(&service.delete_project(&v, project.id()).await));
    ensure!(is_not_found(&service.delete_sprint(&v, sprint.id()).await));
    for task in &tasks {
        ensure!(is_not_found(&service.delete_task(&v, task.id()).await));
    }

    let details = service.get_sprint(&u, sprint.id()).await?;
    ensure!(details.tasks == tasks);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_is_gone_and_cannot_be_deleted_twice(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["A", "B"]).await?;
    let (Some(first), Some(second)) = (tasks.first(), tasks.get(1)) else {
        eyre::bail!("expected two tasks");
    };

    service.delete_task(&u, first.id()).await?;

    ensure!(is_not_found(&service.delete_task(&u, first.id()).await));
    let details = service.get_sprint(&u, sprint.id()).await?;
    ensure!(details.tasks.as_slice() == std::slice::from_ref(second));
    Ok(())
}
