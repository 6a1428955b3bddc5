//! Domain model for ownership-scoped project tracking.
//!
//! Projects own sprints and sprints own tasks. Every record carries the
//! identity of the actor that created it; infrastructure concerns stay
//! outside this boundary.

mod error;
mod identity;
mod ids;
mod project;
mod sprint;
mod task;
mod text;

pub use error::{ParseSprintStatusError, ParseTaskStatusError, TrackerDomainError};
pub use identity::{OwnerIdentity, RequestContext};
pub use ids::{EntityRef, ProjectId, SprintId, TaskId};
pub use project::{PersistedProjectData, Project, ProjectChanges};
pub use sprint::{
    PersistedSprintData, Sprint, SprintChanges, SprintPlan, SprintSchedule, SprintStatus,
};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskStatus};
pub use text::{Title, parse_calendar_date};
