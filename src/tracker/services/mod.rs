//! Application services for ownership-scoped project tracking.

mod requests;
mod tracker;

pub use requests::{
    CreateProjectRequest, CreateSprintRequest, CreateTaskRequest, UpdateProjectRequest,
    UpdateSprintRequest, UpdateTaskRequest,
};
pub use tracker::{
    ProjectDetails, SprintDetails, TrackerService, TrackerServiceError, TrackerServiceResult,
};
