use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use blocks_core::{DomainError, DomainResult, Entity, UseCase};

use crate::ports::{TaskRepository, UserRepository};
use crate::task::{Task, TaskId, TaskStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to `medium`.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Email of a registered user.
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskResponse {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// Creates a pending task, optionally assigned to an existing user.
pub struct CreateTaskService<T, U> {
    tasks: T,
    users: U,
}

impl<T, U> CreateTaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    pub fn new(tasks: T, users: U) -> Self {
        Self { tasks, users }
    }
}

impl<T, U> UseCase<CreateTaskRequest, DomainResult<CreateTaskResponse>> for CreateTaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    fn execute(&self, request: CreateTaskRequest) -> DomainResult<CreateTaskResponse> {
        let mut task = Task::create(
            &request.title,
            &request.description,
            request.priority.as_deref(),
            request.due_date,
            request.assigned_to.as_deref(),
        )?;

        if let Some(assignee) = task.assigned_to() {
            if self.users.find_by_email(assignee)?.is_none() {
                return Err(DomainError::rule_violation(format!(
                    "Cannot assign a task to unknown user '{assignee}'."
                ))
                .with_code("UNKNOWN_ASSIGNEE")
                .with_detail("assigned_to", assignee.as_str()));
            }
        }

        self.tasks.save(&mut task)?;

        info!(task_id = %task.id(), priority = %task.priority(), "task created");
        Ok(CreateTaskResponse {
            task_id: *task.id(),
            status: task.status(),
        })
    }
}
