//! Task-tracking example domain built on the kernel.
//!
//! Users register with validated credentials and change roles; tasks move
//! through a small status machine. Application services tie the aggregates to
//! the repository ports and report failures as [`DomainError`](blocks_core::DomainError)
//! values that [`ResponseStatus`] maps to transport status codes.

pub mod mappers;
pub mod ports;
pub mod repositories;
pub mod services;
pub mod status;
pub mod task;
pub mod user;
pub mod value_objects;

pub use mappers::{TaskView, TaskViewMapper, UserView, UserViewMapper};
pub use ports::{PasswordHasher, TaskRepository, UserRepository};
pub use repositories::{in_memory_tasks, in_memory_users};
pub use services::{
    ChangeTaskStatusRequest, ChangeTaskStatusResponse, ChangeTaskStatusService,
    ChangeUserRoleRequest, ChangeUserRoleResponse, ChangeUserRoleService, CreateTaskRequest,
    CreateTaskResponse, CreateTaskService, RegisterUserRequest, RegisterUserResponse,
    RegisterUserService,
};
pub use status::{ErrorBody, ResponseStatus};
pub use task::{Task, TaskCreated, TaskEvent, TaskId, TaskPriority, TaskStatus, TaskStatusChanged};
pub use user::{User, UserEvent, UserId, UserRegistered, UserRoleChanged};
pub use value_objects::{Email, Password, PasswordHash, TaskTitle, UserName, UserRole};
