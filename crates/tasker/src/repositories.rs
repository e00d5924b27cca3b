//! In-memory bindings of the tasker repository ports.

use blocks_core::RepositoryError;
use blocks_infra::{InMemoryRepository, PublishingRepository};
use blocks_messages::{EventPublisher, MessageEnvelope};

use crate::ports::{TaskRepository, UserRepository};
use crate::task::Task;
use crate::user::User;
use crate::value_objects::Email;

/// Users keyed by id, with email as a unique key.
pub fn in_memory_users() -> InMemoryRepository<User> {
    InMemoryRepository::new().with_unique_key("email", |user: &User| user.email().to_string())
}

pub fn in_memory_tasks() -> InMemoryRepository<Task> {
    InMemoryRepository::new()
}

impl UserRepository for InMemoryRepository<User> {
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.find_first(|user| user.email() == email)
    }
}

impl TaskRepository for InMemoryRepository<Task> {
    fn find_by_assignee(&self, email: &Email) -> Result<Vec<Task>, RepositoryError> {
        self.find_matching(|task| task.assigned_to() == Some(email))
    }
}

impl<R, P> UserRepository for PublishingRepository<R, P>
where
    R: UserRepository,
    P: EventPublisher<MessageEnvelope>,
{
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.inner().find_by_email(email)
    }
}

impl<R, P> TaskRepository for PublishingRepository<R, P>
where
    R: TaskRepository,
    P: EventPublisher<MessageEnvelope>,
{
    fn find_by_assignee(&self, email: &Email) -> Result<Vec<Task>, RepositoryError> {
        self.inner().find_by_assignee(email)
    }
}

impl<R: UserRepository + ?Sized> UserRepository for std::sync::Arc<R> {
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        (**self).find_by_email(email)
    }
}

impl<R: TaskRepository + ?Sized> TaskRepository for std::sync::Arc<R> {
    fn find_by_assignee(&self, email: &Email) -> Result<Vec<Task>, RepositoryError> {
        (**self).find_by_assignee(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use crate::user::tests::ada;
    use blocks_core::{ReadOnlyRepository, WriteOnlyRepository};

    #[test]
    fn users_are_found_by_normalized_email() {
        let users = in_memory_users();
        let mut user = ada();
        users.save(&mut user).unwrap();

        let email = Email::parse("ADA@example.com").unwrap();
        let found = users.find_by_email(&email).unwrap().unwrap();
        assert_eq!(found, user);
        assert_eq!(users.find_all().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_email_is_refused_by_storage() {
        let users = in_memory_users();
        users.save(&mut ada()).unwrap();
        let err = users.save(&mut ada()).unwrap_err();
        assert!(err.into_domain_error().is_rule_violation());
    }

    #[test]
    fn tasks_are_found_by_assignee() {
        let tasks = in_memory_tasks();
        let mut mine = Task::create("Mine", "", None, None, Some("ada@example.com")).unwrap();
        let mut theirs = Task::create("Theirs", "", None, None, Some("alan@example.com")).unwrap();
        let mut nobody = Task::create("Unassigned", "", None, None, None).unwrap();
        for task in [&mut mine, &mut theirs, &mut nobody] {
            tasks.save(task).unwrap();
        }

        let ada = Email::parse("ada@example.com").unwrap();
        let found = tasks.find_by_assignee(&ada).unwrap();
        assert_eq!(found, vec![mine]);
    }
}
