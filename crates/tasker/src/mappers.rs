//! Aggregate → read-model views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use blocks_core::{AggregateRoot, Entity, Mapper};

use crate::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::user::{User, UserId};
use crate::value_objects::UserRole;

/// What a client may see of a user (never the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub version: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UserViewMapper;

impl Mapper<&User, UserView> for UserViewMapper {
    fn map(&self, user: &User) -> UserView {
        UserView {
            id: *user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            role: user.role(),
            version: user.version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub version: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TaskViewMapper;

impl Mapper<&Task, TaskView> for TaskViewMapper {
    fn map(&self, task: &Task) -> TaskView {
        TaskView {
            id: *task.id(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            priority: task.priority(),
            status: task.status(),
            due_date: task.due_date(),
            assigned_to: task.assigned_to().map(|e| e.to_string()),
            version: task.version(),
        }
    }
}
