//! Task gateway backed by an in-process [`TrackerService`].

use crate::board::ports::{TaskGateway, TaskGatewayError, TaskGatewayResult, TaskStatusChange};
use crate::tracker::{
    domain::{RequestContext, SprintId, Task, TaskId},
    ports::TrackerRepository,
    services::{CreateTaskRequest, TrackerService, TrackerServiceError, UpdateTaskRequest},
};
use async_trait::async_trait;
use mockable::Clock;

/// Routes board operations through the tracker service on behalf of one
/// request context.
pub struct ServiceTaskGateway<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    service: TrackerService<R, C>,
    ctx: RequestContext,
}

impl<R, C> ServiceTaskGateway<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a gateway acting as the identity in `ctx`.
    #[must_use]
    pub const fn new(service: TrackerService<R, C>, ctx: RequestContext) -> Self {
        Self { service, ctx }
    }
}

impl From<TrackerServiceError> for TaskGatewayError {
    fn from(err: TrackerServiceError) -> Self {
        match err {
            TrackerServiceError::NotFound(entity) => Self::NotFound(entity),
            other => Self::backend(other),
        }
    }
}

#[async_trait]
impl<R, C> TaskGateway for ServiceTaskGateway<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    async fn load_sprint_tasks(&self, sprint_id: SprintId) -> TaskGatewayResult<Vec<Task>> {
        let details = self.service.get_sprint(&self.ctx, sprint_id).await?;
        Ok(details.tasks)
    }

    async fn update_task_status(&self, change: TaskStatusChange) -> TaskGatewayResult<Task> {
        let mut request = UpdateTaskRequest::new().with_status(change.status.as_str());
        if let Some(started_at) = change.started_at {
            request = request.with_started_at(started_at);
        }
        if let Some(finished_at) = change.finished_at {
            request = request.with_finished_at(finished_at);
        }
        Ok(self
            .service
            .update_task(&self.ctx, change.task_id, request)
            .await?)
    }

    async fn create_task(
        &self,
        sprint_id: SprintId,
        title: String,
        description: Option<String>,
    ) -> TaskGatewayResult<Task> {
        let mut request = CreateTaskRequest::new(sprint_id, title);
        if let Some(text) = description {
            request = request.with_description(text);
        }
        Ok(self.service.create_task(&self.ctx, request).await?)
    }

    async fn delete_task(&self, task_id: TaskId) -> TaskGatewayResult<()> {
        Ok(self.service.delete_task(&self.ctx, task_id).await?)
    }
}
