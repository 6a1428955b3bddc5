//! When steps for sprint board BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use sprintboard::board::domain::Column;

fn parse_column(value: &str) -> Result<Column, eyre::Report> {
    Column::try_from(value).map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))
}

#[when(r#"task {drag:usize} of "{source}" is dragged to position {hover:usize} of "{target}""#)]
fn drag_task(
    world: &mut BoardWorld,
    drag: usize,
    source: String,
    hover: usize,
    target: String,
) -> Result<(), eyre::Report> {
    let from = parse_column(&source)?;
    let to = parse_column(&target)?;
    let board = world.board_mut()?;
    let result = run_async(board.move_task(drag, hover, from, to));
    world.last_move_result = Some(result);
    Ok(())
}

#[when(r#"a task titled "{title}" is added"#)]
fn add_task(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let board = world.board_mut()?;
    let result = run_async(board.add_task(&title, None));
    if let Ok(ref created) = result {
        world.task_ids.insert(title, created.id());
    }
    world.last_add_result = Some(result);
    Ok(())
}
