//! Task aggregate and its status machine.
//!
//! ```text
//! pending ──start──▶ in_progress ──complete──▶ completed
//!    │
//!    └──cancel──▶ cancelled
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use blocks_core::{
    AggregateBase, AggregateRoot, Context, DomainError, DomainResult, Entity, aggregate_root,
    define_id,
};
use blocks_messages::{Event, Message, MessageMetadata, Payload, message_identity};

use crate::value_objects::{Email, TaskTitle, collect};

define_id!(TaskId, "TaskId");

// ─────────────────────────────────────────────────────────────────────────────
// Status & Priority
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn parse(raw: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| {
                DomainError::validation("Invalid status.").with_detail(
                    "status",
                    vec![format!(
                        "Invalid status: {raw}. Valid statuses are: pending, in_progress, completed, cancelled"
                    )],
                )
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::Pending, TaskStatus::Cancelled)
                | (TaskStatus::InProgress, TaskStatus::Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

impl core::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(DomainError::validation("Invalid priority.").with_detail(
                "priority",
                vec![format!(
                    "Invalid priority: {other}. Valid priorities are: low, medium, high"
                )],
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl core::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TaskCreated {
    metadata: MessageMetadata,
    pub task_id: TaskId,
    pub title: TaskTitle,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Email>,
}

impl Message for TaskCreated {
    fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("task_id".to_string(), json!(self.task_id));
        payload.insert("title".to_string(), json!(self.title.as_str()));
        payload.insert("priority".to_string(), json!(self.priority.as_str()));
        payload.insert(
            "due_date".to_string(),
            self.due_date
                .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, false)))
                .unwrap_or(Value::Null),
        );
        payload.insert(
            "assigned_to".to_string(),
            self.assigned_to
                .as_ref()
                .map(|e| Value::String(e.as_str().to_string()))
                .unwrap_or(Value::Null),
        );
        payload
    }
}

impl Event for TaskCreated {}

message_identity!(TaskCreated);

#[derive(Debug, Clone)]
pub struct TaskStatusChanged {
    metadata: MessageMetadata,
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl Message for TaskStatusChanged {
    fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("task_id".to_string(), json!(self.task_id));
        payload.insert("from".to_string(), json!(self.from.as_str()));
        payload.insert("to".to_string(), json!(self.to.as_str()));
        payload
    }
}

impl Event for TaskStatusChanged {}

message_identity!(TaskStatusChanged);

/// All task events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Created(TaskCreated),
    StatusChanged(TaskStatusChanged),
}

impl Message for TaskEvent {
    fn metadata(&self) -> &MessageMetadata {
        match self {
            TaskEvent::Created(e) => e.metadata(),
            TaskEvent::StatusChanged(e) => e.metadata(),
        }
    }

    fn payload(&self) -> Payload {
        match self {
            TaskEvent::Created(e) => e.payload(),
            TaskEvent::StatusChanged(e) => e.payload(),
        }
    }

    fn message_type(&self) -> &'static str {
        match self {
            TaskEvent::Created(e) => e.message_type(),
            TaskEvent::StatusChanged(e) => e.message_type(),
        }
    }
}

impl Event for TaskEvent {}

// ─────────────────────────────────────────────────────────────────────────────
// Task Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Task aggregate.
///
/// # Invariants
/// - A task starts `pending`.
/// - Status only moves along the edges of the status machine; terminal states are final.
#[derive(Debug, Clone)]
pub struct Task {
    base: AggregateBase<TaskId, TaskEvent>,
    title: TaskTitle,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    assigned_to: Option<Email>,
}

aggregate_root!(Task, id = TaskId, event = TaskEvent, base = base);

impl Task {
    /// Create a pending task, reporting every invalid field at once.
    pub fn create(
        title: &str,
        description: &str,
        priority: Option<&str>,
        due_date: Option<DateTime<Utc>>,
        assigned_to: Option<&str>,
    ) -> DomainResult<Self> {
        let mut errors = Context::new();
        let title = collect(TaskTitle::parse(title), &mut errors);
        let priority = collect(
            priority.map_or(Ok(TaskPriority::default()), TaskPriority::parse),
            &mut errors,
        );
        let assigned_to = collect(assigned_to.map(Email::parse).transpose(), &mut errors);

        let (Some(title), Some(priority), Some(assigned_to)) = (title, priority, assigned_to)
        else {
            return Err(
                DomainError::validation("Task creation failed due to validation errors.")
                    .with_context(errors),
            );
        };

        let mut task = Self {
            base: AggregateBase::new(TaskId::new()),
            title,
            description: description.trim().to_string(),
            priority,
            status: TaskStatus::Pending,
            due_date,
            assigned_to,
        };
        let event = TaskCreated {
            metadata: MessageMetadata::new(),
            task_id: *task.id(),
            title: task.title.clone(),
            priority,
            due_date,
            assigned_to: task.assigned_to.clone(),
        };
        task.record_event(TaskEvent::Created(event));
        Ok(task)
    }

    /// Rebuild a task from storage, at its stored version and with no pending events.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: TaskId,
        version: u64,
        title: TaskTitle,
        description: String,
        priority: TaskPriority,
        status: TaskStatus,
        due_date: Option<DateTime<Utc>>,
        assigned_to: Option<Email>,
    ) -> Self {
        Self {
            base: AggregateBase::with_version(id, version),
            title,
            description,
            priority,
            status,
            due_date,
            assigned_to,
        }
    }

    pub fn title(&self) -> &TaskTitle {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn assigned_to(&self) -> Option<&Email> {
        self.assigned_to.as_ref()
    }

    pub fn start(&mut self) -> DomainResult<()> {
        self.transition_to(TaskStatus::InProgress)
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition_to(TaskStatus::Completed)
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition_to(TaskStatus::Cancelled)
    }

    /// Move to `next` if the status machine allows it.
    pub fn transition_to(&mut self, next: TaskStatus) -> DomainResult<()> {
        let from = self.status;
        if !from.can_transition_to(next) {
            return Err(DomainError::rule_violation(format!(
                "Cannot move task from '{from}' to '{next}'."
            ))
            .with_code("INVALID_STATUS_TRANSITION")
            .with_detail("from", from.as_str())
            .with_detail("to", next.as_str()));
        }

        self.status = next;
        let event = TaskStatusChanged {
            metadata: MessageMetadata::new(),
            task_id: *self.id(),
            from,
            to: next,
        };
        self.record_event(TaskEvent::StatusChanged(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn pending() -> Task {
        Task::create("Write docs", "  kernel guide ", Some("high"), None, None).unwrap()
    }

    #[test]
    fn create_starts_pending_with_one_event() {
        let task = pending();
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.priority(), TaskPriority::High);
        assert_eq!(task.description(), "kernel guide");
        assert_eq!(task.version(), 0);

        let events = task.uncommitted_changes();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message_type(), "TaskCreated");
        assert_eq!(events[0].payload()["assigned_to"], Value::Null);
    }

    #[test]
    fn create_defaults_priority_and_normalizes_assignee() {
        let due = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let task = Task::create("Review", "", None, Some(due), Some("Grace@Example.com")).unwrap();
        assert_eq!(task.priority(), TaskPriority::Medium);
        assert_eq!(task.assigned_to().map(Email::as_str), Some("grace@example.com"));

        let payload = task.uncommitted_changes()[0].payload();
        assert_eq!(payload["due_date"], json!("2024-01-01T12:00:00+00:00"));
    }

    #[test]
    fn create_collects_field_errors() {
        let err = Task::create(" ", "", Some("urgent"), None, Some("nobody")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.message(), "Task creation failed due to validation errors.");
        assert_eq!(err.context().len(), 3);
        for field in ["title", "priority", "email"] {
            assert!(err.context().contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn happy_path_through_the_status_machine() {
        let mut task = pending();
        task.start().unwrap();
        task.complete().unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert!(task.status().is_terminal());

        let kinds: Vec<&str> = task
            .uncommitted_changes()
            .iter()
            .map(|e| e.message_type())
            .collect();
        assert_eq!(kinds, vec!["TaskCreated", "TaskStatusChanged", "TaskStatusChanged"]);
    }

    #[test]
    fn illegal_transition_is_a_rule_violation_and_records_nothing() {
        let mut task = pending();
        task.mark_changes_as_committed();

        let err = task.complete().unwrap_err();
        assert!(err.is_rule_violation());
        assert_eq!(err.code(), Some("INVALID_STATUS_TRANSITION"));
        assert_eq!(err.message(), "Cannot move task from 'pending' to 'completed'.");
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(!task.has_uncommitted_changes());
    }

    #[test]
    fn cancelled_tasks_cannot_restart() {
        let mut task = pending();
        task.cancel().unwrap();
        assert!(task.start().is_err());
        assert!(task.cancel().is_err());
    }

    #[test]
    fn statuses_parse_from_their_names() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(TaskStatus::parse("done").unwrap_err().is_validation());
    }

    fn any_status() -> impl Strategy<Value = TaskStatus> {
        prop::sample::select(TaskStatus::ALL.to_vec())
    }

    proptest! {
        /// Property: a refused transition leaves status and ledger exactly as they were.
        #[test]
        fn refused_transitions_change_nothing(path in prop::collection::vec(any_status(), 0..12)) {
            let mut task = pending();
            for next in path {
                let before_status = task.status();
                let before_events = task.uncommitted_changes().len();
                match task.transition_to(next) {
                    Ok(()) => {
                        prop_assert!(before_status.can_transition_to(next));
                        prop_assert_eq!(task.status(), next);
                        prop_assert_eq!(task.uncommitted_changes().len(), before_events + 1);
                    }
                    Err(err) => {
                        prop_assert!(err.is_rule_violation());
                        prop_assert_eq!(task.status(), before_status);
                        prop_assert_eq!(task.uncommitted_changes().len(), before_events);
                    }
                }
            }
        }
    }
}
