use serde::{Deserialize, Serialize};
use tracing::info;

use blocks_core::{DomainResult, UseCase};

use crate::ports::TaskRepository;
use crate::task::{TaskId, TaskStatus};

use super::not_found;

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeTaskStatusRequest {
    pub task_id: String,
    /// Target status name (`in_progress`, `completed`, `cancelled`).
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeTaskStatusResponse {
    pub task_id: TaskId,
    pub previous_status: TaskStatus,
    pub status: TaskStatus,
}

/// Moves a task along its status machine.
pub struct ChangeTaskStatusService<T> {
    tasks: T,
}

impl<T: TaskRepository> ChangeTaskStatusService<T> {
    pub fn new(tasks: T) -> Self {
        Self { tasks }
    }
}

impl<T: TaskRepository> UseCase<ChangeTaskStatusRequest, DomainResult<ChangeTaskStatusResponse>>
    for ChangeTaskStatusService<T>
{
    fn execute(&self, request: ChangeTaskStatusRequest) -> DomainResult<ChangeTaskStatusResponse> {
        let task_id: TaskId = request.task_id.parse()?;
        let next = TaskStatus::parse(&request.status)?;

        let mut task = self
            .tasks
            .find_by_id(&task_id)?
            .ok_or_else(|| not_found("Task", task_id))?;

        let previous_status = task.status();
        task.transition_to(next)?;
        self.tasks.save(&mut task)?;

        info!(%task_id, from = %previous_status, to = %next, "task status changed");
        Ok(ChangeTaskStatusResponse {
            task_id,
            previous_status,
            status: next,
        })
    }
}
