use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use blocks_core::{AsyncUseCase, DomainError, DomainResult, Entity, UseCase};

use crate::ports::{PasswordHasher, UserRepository};
use crate::user::{User, UserId};

#[derive(Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `engineer`.
    #[serde(default)]
    pub role: Option<String>,
}

impl core::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterUserResponse {
    pub user_id: UserId,
}

/// Registers a user with a unique email.
pub struct RegisterUserService<R, H> {
    users: R,
    hasher: H,
}

impl<R, H> RegisterUserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    pub fn new(users: R, hasher: H) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> UseCase<RegisterUserRequest, DomainResult<RegisterUserResponse>>
    for RegisterUserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    fn execute(&self, request: RegisterUserRequest) -> DomainResult<RegisterUserResponse> {
        debug!(?request, "registering user");

        let mut user = User::register(
            &request.name,
            &request.email,
            &request.password,
            request.role.as_deref(),
            &self.hasher,
        )
        .inspect_err(|err| warn!(error = %err, "user registration rejected"))?;

        if self.users.find_by_email(user.email())?.is_some() {
            return Err(DomainError::rule_violation(format!(
                "User with email '{}' already exists.",
                user.email()
            ))
            .with_code("EMAIL_ALREADY_EXISTS")
            .with_detail("email", user.email().as_str()));
        }

        self.users.save(&mut user)?;

        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(RegisterUserResponse { user_id: *user.id() })
    }
}

#[async_trait]
impl<R, H> AsyncUseCase<RegisterUserRequest, DomainResult<RegisterUserResponse>>
    for RegisterUserService<R, H>
where
    R: UserRepository + Send + Sync,
    H: PasswordHasher,
{
    async fn execute(&self, request: RegisterUserRequest) -> DomainResult<RegisterUserResponse> {
        UseCase::execute(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory_users;
    use crate::user::tests::ReversingHasher;
    use crate::value_objects::{Email, UserRole};
    use blocks_core::{AggregateRoot, ReadOnlyRepository};
    use std::sync::Arc;

    fn request(email: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: "Secr3t!pass".to_string(),
            role: None,
        }
    }

    #[test]
    fn registers_and_persists_a_committed_user() {
        let users = Arc::new(in_memory_users());
        let service = RegisterUserService::new(users.clone(), ReversingHasher);

        let response = UseCase::execute(&service, request("ada@example.com")).unwrap();

        let stored = users.find_by_id(&response.user_id).unwrap().unwrap();
        assert_eq!(stored.version(), 1);
        assert!(!stored.has_uncommitted_changes());
        assert_eq!(stored.role(), UserRole::Engineer);
        assert_eq!(stored.password().as_str(), "ssap!t3rceS");
    }

    #[test]
    fn duplicate_email_is_a_rule_violation() {
        let users = Arc::new(in_memory_users());
        let service = RegisterUserService::new(users.clone(), ReversingHasher);
        UseCase::execute(&service, request("ada@example.com")).unwrap();

        let err = UseCase::execute(&service, request("Ada@Example.com")).unwrap_err();
        assert!(err.is_rule_violation());
        assert_eq!(err.code(), Some("EMAIL_ALREADY_EXISTS"));
        assert_eq!(err.message(), "User with email 'ada@example.com' already exists.");
        assert_eq!(users.len().unwrap(), 1);
    }

    #[test]
    fn invalid_input_is_a_validation_error_and_saves_nothing() {
        let users = Arc::new(in_memory_users());
        let service = RegisterUserService::new(users.clone(), ReversingHasher);

        let mut bad = request("not-an-email");
        bad.password = "weak".to_string();
        let err = UseCase::execute(&service, bad).unwrap_err();
        assert!(err.is_validation());
        assert!(err.context().contains_key("email"));
        assert!(err.context().contains_key("password"));
        assert!(users.is_empty().unwrap());
    }

    #[test]
    fn request_debug_hides_the_password() {
        let rendered = format!("{:?}", request("ada@example.com"));
        assert!(!rendered.contains("Secr3t"));
        assert!(rendered.contains("***"));
    }

    #[tokio::test]
    async fn async_entry_point_behaves_the_same() {
        let users = Arc::new(in_memory_users());
        let service = RegisterUserService::new(users.clone(), ReversingHasher);

        let response = AsyncUseCase::execute(&service, request("grace@example.com"))
            .await
            .unwrap();
        let email = Email::parse("grace@example.com").unwrap();
        let stored = users.find_by_email(&email).unwrap().unwrap();
        assert_eq!(*stored.id(), response.user_id);
    }
}
