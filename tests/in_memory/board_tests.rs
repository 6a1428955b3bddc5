//! Board sessions driving the tracker service end to end.

use std::sync::Arc;

use super::helpers::{TestService, add_tasks, context, project_with_sprint, service};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use sprintboard::board::{
    adapters::ServiceTaskGateway,
    domain::{BoardError, Column, MoveOutcome, NotificationLevel},
    services::BoardSession,
};
use sprintboard::tracker::{
    adapters::memory::InMemoryTrackerRepository,
    domain::{RequestContext, SprintId, TaskStatus},
    services::UpdateTaskRequest,
};

type Gateway = ServiceTaskGateway<InMemoryTrackerRepository, DefaultClock>;

async fn open_board(
    service: &TestService,
    ctx: &RequestContext,
    sprint_id: SprintId,
) -> Result<BoardSession<Gateway, DefaultClock>, BoardError> {
    let gateway = Arc::new(ServiceTaskGateway::new(service.clone(), ctx.clone()));
    BoardSession::open(sprint_id, gateway, Arc::new(DefaultClock)).await
}

fn column_titles(session: &BoardSession<Gateway, DefaultClock>, column: Column) -> Vec<String> {
    session
        .columns()
        .tasks(column)
        .iter()
        .map(|task| task.title().to_string())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_groups_stored_tasks_by_status(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["A", "B", "C"]).await?;
    let Some(b) = tasks.get(1) else {
        bail!("expected three tasks");
    };
    service
        .update_task(&u, b.id(), UpdateTaskRequest::new().with_status("IN_PROGRESS"))
        .await?;

    let session = open_board(&service, &u, sprint.id()).await?;

    ensure!(column_titles(&session, Column::Todo) == ["A", "C"]);
    ensure!(column_titles(&session, Column::InProgress) == ["B"]);
    ensure!(column_titles(&session, Column::Done).is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_column_move_is_stored(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["A", "X"]).await?;
    let Some(a) = tasks.first() else {
        bail!("expected two tasks");
    };
    let mut session = open_board(&service, &u, sprint.id()).await?;

    let outcome = session.move_task(0, 0, Column::Todo, Column::Done).await?;

    ensure!(matches!(
        outcome,
        MoveOutcome::StatusChanged { task_id, from: TaskStatus::Todo, to: TaskStatus::Done }
            if task_id == a.id()
    ));
    ensure!(column_titles(&session, Column::Todo) == ["X"]);
    ensure!(column_titles(&session, Column::Done) == ["A"]);

    let stored = service.get_task(&u, a.id()).await?;
    ensure!(stored.status() == TaskStatus::Done);
    ensure!(stored.finished_at().is_some());
    ensure!(stored.started_at().is_none());

    let reopened = open_board(&service, &u, sprint.id()).await?;
    ensure!(column_titles(&reopened, Column::Done) == ["A"]);
    let Some(notice) = session.notifications().last() else {
        bail!("expected a notification");
    };
    ensure!(notice.level() == NotificationLevel::Success);
    ensure!(notice.message() == "Task moved to Done");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_within_a_column_is_not_stored(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    add_tasks(&service, &u, &sprint, &["A", "B", "C"]).await?;
    let mut session = open_board(&service, &u, sprint.id()).await?;

    let outcome = session.move_task(0, 2, Column::Todo, Column::Todo).await?;

    ensure!(outcome == MoveOutcome::Reordered);
    ensure!(column_titles(&session, Column::Todo) == ["B", "C", "A"]);
    ensure!(session.notifications().is_empty());

    let reopened = open_board(&service, &u, sprint.id()).await?;
    ensure!(column_titles(&reopened, Column::Todo) == ["A", "B", "C"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_of_a_task_deleted_elsewhere_reverts(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["A"]).await?;
    let Some(a) = tasks.first() else {
        bail!("expected one task");
    };
    let mut session = open_board(&service, &u, sprint.id()).await?;
    let before = session.columns().clone();
    service.delete_task(&u, a.id()).await?;

    let result = session.move_task(0, 0, Column::Todo, Column::InProgress).await;

    let task_id = match result {
        Err(BoardError::StatusUpdateFailed { task_id, .. }) => task_id,
        other => bail!("expected StatusUpdateFailed, got {other:?}"),
    };
    ensure!(task_id == a.id());
    ensure!(session.columns() == &before);
    let Some(notice) = session.notifications().last() else {
        bail!("expected a notification");
    };
    ensure!(notice.level() == NotificationLevel::Error);
    ensure!(notice.message() == "Error updating task status");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn added_task_lands_in_todo_and_is_stored(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let mut session = open_board(&service, &u, sprint.id()).await?;

    let created = session
        .add_task("Write release notes", Some("Cover the board".to_owned()))
        .await?;

    ensure!(created.status() == TaskStatus::Todo);
    ensure!(column_titles(&session, Column::Todo) == ["Write release notes"]);
    let stored = service.get_task(&u, created.id()).await?;
    ensure!(stored == created);
    ensure!(stored.description() == Some("Cover the board"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_delete_removes_the_stored_task(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;
    let tasks = add_tasks(&service, &u, &sprint, &["A", "B"]).await?;
    let Some(a) = tasks.first() else {
        bail!("expected two tasks");
    };
    let mut session = open_board(&service, &u, sprint.id()).await?;

    let removed = session.delete_task(a.id()).await?;

    ensure!(removed.as_ref().map(|task| task.id()) == Some(a.id()));
    ensure!(column_titles(&session, Column::Todo) == ["B"]);
    ensure!(service.get_task(&u, a.id()).await.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_sprint_cannot_be_opened(service: TestService) -> eyre::Result<()> {
    let u = context("u@example.com")?;
    let v = context("v@example.com")?;
    let (_, sprint) = project_with_sprint(&service, &u, "Alpha").await?;

    match open_board(&service, &v, sprint.id()).await {
        Err(BoardError::LoadFailed { sprint_id, .. }) if sprint_id == sprint.id() => Ok(()),
        Err(other) => bail!("expected LoadFailed, got {other:?}"),
        Ok(_) => bail!("foreign sprint opened"),
    }
}
