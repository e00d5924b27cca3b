//! Validated value objects for the tasker domain.
//!
//! Every constructor reports all violated rules for its field at once, as a
//! `Validation` error whose context maps the field name to the list of messages:
//!
//! ```text
//! Invalid password. | Context: {"password":["must contain at least one digit."]}
//! ```

use serde::{Deserialize, Serialize};

use blocks_core::{Context, DomainError, DomainResult, ValueObject, value_object};

const PASSWORD_SPECIALS: &str = r##"!@#$%^&*(),.?":{}|<>_-+=~`[]\;/'"##;
const TITLE_MAX_CHARS: usize = 200;

fn reject(field: &'static str, violations: Vec<String>) -> DomainError {
    DomainError::validation(format!("Invalid {}.", field.replace('_', " ")))
        .with_detail(field, violations)
}

fn check(field: &'static str, violations: Vec<String>) -> DomainResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(reject(field, violations))
    }
}

/// Folds a field failure into `context` so a factory can report every field at once.
pub(crate) fn collect<T>(result: DomainResult<T>, context: &mut Context) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            context.extend(err.context().clone());
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Email
// ─────────────────────────────────────────────────────────────────────────────

/// Lower-cased email address with a domain part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let mut violations = Vec::new();

        if trimmed.is_empty() {
            violations.push("cannot be empty.".to_string());
        }
        let domain = trimmed.rsplit('@').next().unwrap_or_default();
        if !trimmed.contains('@') || !domain.contains('.') {
            violations.push("must be a valid email format.".to_string());
        }

        check("email", violations)?;
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Email {
    type Components = (String,);

    fn equality_components(&self) -> Self::Components {
        (self.0.clone(),)
    }
}

value_object!(Email);

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Name
// ─────────────────────────────────────────────────────────────────────────────

/// Display name: at least three characters, letters and spaces only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let mut violations = Vec::new();

        if trimmed.is_empty() {
            violations.push("cannot be empty.".to_string());
        }
        if trimmed.chars().count() < 3 {
            violations.push("must be at least 3 characters long.".to_string());
        }
        if !trimmed.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
            violations.push("must contain only alphabetic characters.".to_string());
        }

        check("name", violations)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for UserName {
    type Components = (String,);

    fn equality_components(&self) -> Self::Components {
        (self.0.clone(),)
    }
}

value_object!(UserName);

impl core::fmt::Display for UserName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Password
// ─────────────────────────────────────────────────────────────────────────────

/// Plain-text password that passed the strength rules.
///
/// Only lives long enough to be hashed; `Debug` and `describe` never print it.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let mut violations = Vec::new();

        if raw.trim().is_empty() {
            violations.push("cannot be empty.".to_string());
        }
        if raw.chars().any(char::is_whitespace) {
            violations.push("must not contain whitespace.".to_string());
        }
        if raw.chars().count() < 8 {
            violations.push("must be at least 8 characters long.".to_string());
        }
        if !raw.chars().any(|c| c.is_ascii_digit()) {
            violations.push("must contain at least one digit.".to_string());
        }
        if !raw.chars().any(char::is_lowercase) || !raw.chars().any(char::is_uppercase) {
            violations.push("must contain both uppercase and lowercase letters.".to_string());
        }
        if !raw.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
            violations.push("must contain at least one special character.".to_string());
        }

        check("password", violations)?;
        Ok(Self(raw.to_string()))
    }

    /// The secret itself, for hashers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl ValueObject for Password {
    type Components = (String,);

    fn equality_components(&self) -> Self::Components {
        (self.0.clone(),)
    }

    fn describe(&self) -> String {
        "Password(***)".to_string()
    }
}

value_object!(Password);

/// Output of a [`PasswordHasher`](crate::ports::PasswordHasher). Opaque to the domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for PasswordHash {
    type Components = (String,);

    fn equality_components(&self) -> Self::Components {
        (self.0.clone(),)
    }
}

value_object!(PasswordHash);

// ─────────────────────────────────────────────────────────────────────────────
// User Role
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Engineer,
    Designer,
    Manager,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Engineer,
        UserRole::Designer,
        UserRole::Manager,
    ];

    pub fn parse(raw: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == raw)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|r| r.as_str()).collect();
                reject(
                    "role",
                    vec![format!(
                        "Invalid role: {raw}. Valid roles are: {}",
                        valid.join(", ")
                    )],
                )
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Engineer => "engineer",
            UserRole::Designer => "designer",
            UserRole::Manager => "manager",
        }
    }
}

impl core::fmt::Display for UserRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task Title
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let mut violations = Vec::new();

        if trimmed.is_empty() {
            violations.push("cannot be empty.".to_string());
        }
        if trimmed.chars().count() > TITLE_MAX_CHARS {
            violations.push(format!("must be at most {TITLE_MAX_CHARS} characters long."));
        }

        check("title", violations)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for TaskTitle {
    type Components = (String,);

    fn equality_components(&self) -> Self::Components {
        (self.0.clone(),)
    }
}

value_object!(TaskTitle);

impl core::fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn email_is_normalized() {
        let email = Email::parse("  Ada@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
        assert_eq!(email, Email::parse("ada@example.com").unwrap());
    }

    #[test]
    fn email_needs_a_dotted_domain() {
        for raw in ["ada.example.com", "ada@localhost", "ada@"] {
            let err = Email::parse(raw).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.context()["email"], json!(["must be a valid email format."]));
        }
    }

    #[test]
    fn empty_email_reports_every_rule() {
        let err = Email::parse("").unwrap_err();
        assert_eq!(
            err.context()["email"],
            json!(["cannot be empty.", "must be a valid email format."])
        );
    }

    #[test]
    fn name_rules() {
        assert_eq!(UserName::parse("Ada Lovelace").unwrap().as_str(), "Ada Lovelace");

        let err = UserName::parse("R2").unwrap_err();
        assert_eq!(
            err.context()["name"],
            json!([
                "must be at least 3 characters long.",
                "must contain only alphabetic characters."
            ])
        );
    }

    #[test]
    fn password_rules_are_all_reported() {
        let err = Password::parse("short").unwrap_err();
        assert_eq!(err.message(), "Invalid password.");
        assert_eq!(
            err.context()["password"],
            json!([
                "must be at least 8 characters long.",
                "must contain at least one digit.",
                "must contain both uppercase and lowercase letters.",
                "must contain at least one special character."
            ])
        );

        let err = Password::parse("Secret 123!").unwrap_err();
        assert_eq!(err.context()["password"], json!(["must not contain whitespace."]));

        assert!(Password::parse("Secr3t!pass").is_ok());
    }

    #[test]
    fn password_never_prints_itself() {
        let password = Password::parse("Secr3t!pass").unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
        assert_eq!(password.describe(), "Password(***)");
        assert_eq!(password.expose(), "Secr3t!pass");
    }

    #[test]
    fn roles_parse_exactly() {
        assert_eq!(UserRole::parse("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::default(), UserRole::Engineer);

        let err = UserRole::parse("wizard").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.context()["role"],
            json!(["Invalid role: wizard. Valid roles are: admin, engineer, designer, manager"])
        );
    }

    #[test]
    fn title_rules() {
        assert_eq!(TaskTitle::parse("  Ship it ").unwrap().as_str(), "Ship it");
        assert!(TaskTitle::parse("   ").is_err());
        let err = TaskTitle::parse(&"x".repeat(201)).unwrap_err();
        assert_eq!(err.context()["title"], json!(["must be at most 200 characters long."]));
    }

    #[test]
    fn different_value_types_never_compare_equal() {
        let name = UserName::parse("Grace").unwrap();
        let title = TaskTitle::parse("Grace").unwrap();
        assert!(name.equals_any(&name.clone()));
        assert!(!name.equals_any(&title));
        assert_eq!(name.describe(), "UserName(\"Grace\")");
    }

    #[test]
    fn collect_merges_field_errors() {
        let mut context = Context::new();
        let name = collect(UserName::parse("x"), &mut context);
        let email = collect(Email::parse("ada@example.com"), &mut context);
        assert!(name.is_none());
        assert!(email.is_some());
        assert_eq!(context.len(), 1);
        assert!(context.contains_key("name"));
    }

    proptest! {
        #[test]
        fn well_formed_emails_parse(local in "[a-z]{1,8}", host in "[a-z]{1,8}", tld in "[a-z]{2,3}") {
            let raw = format!("{local}@{host}.{tld}");
            let email = Email::parse(&raw).unwrap();
            prop_assert_eq!(email.as_str(), raw.as_str());
        }

        #[test]
        fn alphabetic_names_of_three_or_more_parse(name in "[A-Za-z]{3,24}") {
            prop_assert!(UserName::parse(&name).is_ok());
        }

        #[test]
        fn passwords_without_a_digit_are_rejected(body in "[A-Za-z!]{8,16}") {
            let err = Password::parse(&body).unwrap_err();
            let violations = err.context()["password"].as_array().unwrap().clone();
            prop_assert!(violations.contains(&json!("must contain at least one digit.")));
        }
    }
}
