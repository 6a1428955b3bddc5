//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use sprintboard::tracker::{
    adapters::memory::InMemoryTrackerRepository,
    domain::{OwnerIdentity, Project, RequestContext, Sprint, Task},
    services::{CreateProjectRequest, CreateSprintRequest, CreateTaskRequest, TrackerService},
};

/// Service type backed by the in-memory repository.
pub type TestService = TrackerService<InMemoryTrackerRepository, DefaultClock>;

/// Provides a service over a fresh in-memory repository.
#[fixture]
pub fn service() -> TestService {
    TrackerService::new(
        Arc::new(InMemoryTrackerRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Builds an authenticated context for `identity`.
///
/// # Errors
///
/// Returns an error if `identity` is blank.
pub fn context(identity: &str) -> Result<RequestContext, eyre::Report> {
    Ok(RequestContext::authenticated(OwnerIdentity::new(identity)?))
}

/// Creates a project with one sprint for the caller.
///
/// # Errors
///
/// Returns an error if either record cannot be created.
pub async fn project_with_sprint(
    service: &TestService,
    ctx: &RequestContext,
    project_title: &str,
) -> Result<(Project, Sprint), eyre::Report> {
    let project = service
        .create_project(ctx, CreateProjectRequest::new(project_title, ""))
        .await?;
    let sprint = service
        .create_sprint(
            ctx,
            CreateSprintRequest::new(project.id(), "Sprint 1", "2026-04-06", "2026-04-17")
                .with_starting_thoughts("Get the board working"),
        )
        .await?;
    Ok((project, sprint))
}

/// Adds tasks with the given titles to `sprint`, in order.
///
/// # Errors
///
/// Returns an error if any task cannot be created.
pub async fn add_tasks(
    service: &TestService,
    ctx: &RequestContext,
    sprint: &Sprint,
    titles: &[&str],
) -> Result<Vec<Task>, eyre::Report> {
    let mut tasks = Vec::with_capacity(titles.len());
    for title in titles {
        tasks.push(
            service
                .create_task(ctx, CreateTaskRequest::new(sprint.id(), *title))
                .await?,
        );
    }
    Ok(tasks)
}
