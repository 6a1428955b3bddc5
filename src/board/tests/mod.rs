//! Unit tests for the board module.


use crate::tracker::domain::{OwnerIdentity, SprintId, Task, TaskStatus, Title};
use mockable::DefaultClock;

/// Builds a task in `status` for `sprint_id`, stamped as a real move would.
fn task_in(sprint_id: SprintId, title: &str, status: TaskStatus) -> Task {
    let clock = DefaultClock;
    let owner = OwnerIdentity::new("board@example.com").expect("valid identity");
    let mut task = Task::new(
        owner,
        sprint_id,
        Title::new(title).expect("valid title"),
        None,
        &clock,
    );
    if status != TaskStatus::Todo {
        task.transition_to(status, &clock);
    }
    task
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title().as_str()).collect()
}
