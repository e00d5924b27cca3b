//! User aggregate: registration and role management.

use serde_json::json;

use blocks_core::{
    AggregateBase, AggregateRoot, Context, DomainError, DomainResult, Entity, aggregate_root,
    define_id,
};
use blocks_messages::{Event, Message, MessageMetadata, Payload, message_identity};

use crate::ports::PasswordHasher;
use crate::value_objects::{Email, Password, PasswordHash, UserName, UserRole, collect};

define_id!(UserId, "UserId");

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// A user account was created.
#[derive(Debug, Clone)]
pub struct UserRegistered {
    metadata: MessageMetadata,
    pub user_id: UserId,
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
}

impl Message for UserRegistered {
    fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("user_id".to_string(), json!(self.user_id));
        payload.insert("name".to_string(), json!(self.name.as_str()));
        payload.insert("email".to_string(), json!(self.email.as_str()));
        payload.insert("role".to_string(), json!(self.role.as_str()));
        payload
    }
}

impl Event for UserRegistered {}

message_identity!(UserRegistered);

/// A user's role was changed.
#[derive(Debug, Clone)]
pub struct UserRoleChanged {
    metadata: MessageMetadata,
    pub user_id: UserId,
    pub previous_role: UserRole,
    pub new_role: UserRole,
}

impl Message for UserRoleChanged {
    fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("user_id".to_string(), json!(self.user_id));
        payload.insert("previous_role".to_string(), json!(self.previous_role.as_str()));
        payload.insert("new_role".to_string(), json!(self.new_role.as_str()));
        payload
    }
}

impl Event for UserRoleChanged {}

message_identity!(UserRoleChanged);

/// All user events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    Registered(UserRegistered),
    RoleChanged(UserRoleChanged),
}

impl Message for UserEvent {
    fn metadata(&self) -> &MessageMetadata {
        match self {
            UserEvent::Registered(e) => e.metadata(),
            UserEvent::RoleChanged(e) => e.metadata(),
        }
    }

    fn payload(&self) -> Payload {
        match self {
            UserEvent::Registered(e) => e.payload(),
            UserEvent::RoleChanged(e) => e.payload(),
        }
    }

    fn message_type(&self) -> &'static str {
        match self {
            UserEvent::Registered(e) => e.message_type(),
            UserEvent::RoleChanged(e) => e.message_type(),
        }
    }
}

impl Event for UserEvent {}

// ─────────────────────────────────────────────────────────────────────────────
// User Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// User aggregate.
///
/// # Invariants
/// - Name, email and password satisfied their rules when the user was registered.
/// - Only the password hash is kept.
/// - A role change always changes the role.
#[derive(Debug, Clone)]
pub struct User {
    base: AggregateBase<UserId, UserEvent>,
    name: UserName,
    email: Email,
    password: PasswordHash,
    role: UserRole,
}

aggregate_root!(User, id = UserId, event = UserEvent, base = base);

impl User {
    /// Validates every field, hashes the password and records `UserRegistered`.
    ///
    /// All field failures are reported together in one `Validation` error whose
    /// context maps each failing field to its messages. The hasher is only called
    /// once everything is valid.
    pub fn register<H>(
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
        hasher: &H,
    ) -> DomainResult<Self>
    where
        H: PasswordHasher + ?Sized,
    {
        let mut errors = Context::new();
        let name = collect(UserName::parse(name), &mut errors);
        let email = collect(Email::parse(email), &mut errors);
        let password = collect(Password::parse(password), &mut errors);
        let role = collect(role.map_or(Ok(UserRole::default()), UserRole::parse), &mut errors);

        let (Some(name), Some(email), Some(password), Some(role)) = (name, email, password, role)
        else {
            return Err(
                DomainError::validation("User creation failed due to validation errors.")
                    .with_context(errors),
            );
        };

        let hash = hasher.hash(&password)?;
        let mut user = Self {
            base: AggregateBase::new(UserId::new()),
            name,
            email,
            password: hash,
            role,
        };
        let event = UserRegistered {
            metadata: MessageMetadata::new(),
            user_id: *user.id(),
            name: user.name.clone(),
            email: user.email.clone(),
            role,
        };
        user.record_event(UserEvent::Registered(event));
        Ok(user)
    }

    /// Rebuild a user from storage, at its stored version and with no pending events.
    pub fn restore(
        id: UserId,
        version: u64,
        name: UserName,
        email: Email,
        password: PasswordHash,
        role: UserRole,
    ) -> Self {
        Self {
            base: AggregateBase::with_version(id, version),
            name,
            email,
            password,
            role,
        }
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Switch to `new_role`; asking for the current role is a rule violation.
    pub fn change_role(&mut self, new_role: UserRole) -> DomainResult<()> {
        if new_role == self.role {
            return Err(DomainError::rule_violation(format!(
                "User already has the role '{new_role}'."
            ))
            .with_code("ROLE_ALREADY_SET")
            .with_detail("role", new_role.as_str()));
        }

        let previous_role = std::mem::replace(&mut self.role, new_role);
        let event = UserRoleChanged {
            metadata: MessageMetadata::new(),
            user_id: *self.id(),
            previous_role,
            new_role,
        };
        self.record_event(UserEvent::RoleChanged(event));
        Ok(())
    }
}
