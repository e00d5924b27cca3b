//! Outbound ports of the tasker domain.

use blocks_core::{DomainResult, Repository, RepositoryError};

use crate::task::Task;
use crate::user::User;
use crate::value_objects::{Email, Password, PasswordHash};

/// One-way password hashing. Implementations live outside the domain.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &Password) -> DomainResult<PasswordHash>;

    fn verify(&self, password: &Password, hash: &PasswordHash) -> bool;
}

/// User persistence, plus the lookup registration needs.
pub trait UserRepository: Repository<User> {
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
}

/// Task persistence, plus the lookup an assignee's task list needs.
pub trait TaskRepository: Repository<Task> {
    fn find_by_assignee(&self, email: &Email) -> Result<Vec<Task>, RepositoryError>;
}
