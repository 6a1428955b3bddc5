//! Given steps for sprint board BDD scenarios.

use super::world::{BoardWorld, run_async, split_titles};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use sprintboard::board::{domain::Column, services::BoardSession};
use sprintboard::tracker::services::{
    CreateProjectRequest, CreateSprintRequest, CreateTaskRequest, UpdateTaskRequest,
};
use std::sync::Arc;

#[given(r#"a sprint "{title}" in project "{project}""#)]
fn sprint_in_project(
    world: &mut BoardWorld,
    title: String,
    project: String,
) -> Result<(), eyre::Report> {
    let created_project = run_async(
        world
            .service
            .create_project(&world.ctx, CreateProjectRequest::new(project, "")),
    )
    .wrap_err("create project for board scenario")?;
    let sprint = run_async(world.service.create_sprint(
        &world.ctx,
        CreateSprintRequest::new(created_project.id(), title, "2026-04-06", "2026-04-17"),
    ))
    .wrap_err("create sprint for board scenario")?;
    world.sprint = Some(sprint);
    Ok(())
}

#[given(r#"the sprint has tasks "{titles}" in "{column}""#)]
fn sprint_has_tasks(
    world: &mut BoardWorld,
    titles: String,
    column: String,
) -> Result<(), eyre::Report> {
    let target = Column::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let sprint_id = world.sprint()?.id();

    for title in split_titles(&titles) {
        let task = run_async(
            world
                .service
                .create_task(&world.ctx, CreateTaskRequest::new(sprint_id, title.as_str())),
        )
        .wrap_err("create task for board scenario")?;
        if target != Column::Todo {
            run_async(world.service.update_task(
                &world.ctx,
                task.id(),
                UpdateTaskRequest::new().with_status(target.status().as_str()),
            ))
            .wrap_err("place task in its starting column")?;
        }
        world.task_ids.insert(title, task.id());
    }
    Ok(())
}

#[given("the board is open")]
fn board_is_open(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let sprint_id = world.sprint()?.id();
    let gateway = world.new_gateway();
    let board = run_async(BoardSession::open(
        sprint_id,
        Arc::clone(&gateway),
        Arc::new(mockable::DefaultClock),
    ))
    .wrap_err("open board for scenario")?;
    world.columns_before = Some(board.columns().clone());
    world.gateway = Some(gateway);
    world.board = Some(board);
    Ok(())
}

#[given("the tracker rejects status updates")]
fn tracker_rejects_status_updates(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world.gateway()?.reject_status_updates();
    Ok(())
}
