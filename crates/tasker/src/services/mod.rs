//! Application services (one per use case).
//!
//! Each service implements [`UseCase`](blocks_core::UseCase) with a plain request
//! struct in and `DomainResult<Response>` out. Repository failures are folded into
//! the domain taxonomy on the way out, so callers only ever see a `DomainError`.

mod change_task_status;
mod change_user_role;
mod create_task;
mod register_user;

pub use change_task_status::{
    ChangeTaskStatusRequest, ChangeTaskStatusResponse, ChangeTaskStatusService,
};
pub use change_user_role::{ChangeUserRoleRequest, ChangeUserRoleResponse, ChangeUserRoleService};
pub use create_task::{CreateTaskRequest, CreateTaskResponse, CreateTaskService};
pub use register_user::{RegisterUserRequest, RegisterUserResponse, RegisterUserService};

use blocks_core::DomainError;

/// Lookup miss, reported as a rule violation with code `NOT_FOUND`.
pub(crate) fn not_found(what: &str, id: impl core::fmt::Display) -> DomainError {
    DomainError::rule_violation(format!("{what} not found."))
        .with_code("NOT_FOUND")
        .with_detail("id", id.to_string())
}
