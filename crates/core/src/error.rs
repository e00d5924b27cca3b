//! Domain error model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Structured details attached to a [`DomainError`] (field name -> detail).
pub type Context = Map<String, Value>;

/// Taxonomic kind of a domain failure.
///
/// The kind is the only thing a transport layer needs to pick a response
/// status deterministically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainErrorKind {
    /// Failure with no finer classification.
    General,
    /// Input violates a context-free rule (format, range, required field).
    /// Recoverable by supplying corrected input.
    Validation,
    /// Well-formed input that conflicts with current state or a cross-entity
    /// constraint (duplicate key, illegal transition, unchanged role).
    RuleViolation,
}

impl core::fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DomainErrorKind::General => write!(f, "general"),
            DomainErrorKind::Validation => write!(f, "validation"),
            DomainErrorKind::RuleViolation => write!(f, "rule_violation"),
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Infrastructure
/// concerns belong elsewhere. The context is always a mapping (possibly empty);
/// it is rendered after the message only when it has entries:
///
/// ```text
/// User creation failed. | Context: {"email":["must be a valid email format."]}
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}{}", render_context(.context))]
pub struct DomainError {
    kind: DomainErrorKind,
    message: String,
    #[serde(default)]
    context: Context,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

/// A context was supplied that is not a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("context must be a mapping of field names to details, got {found}")]
pub struct ContextTypeError {
    found: &'static str,
}

impl ContextTypeError {
    /// JSON type name of the rejected context.
    pub fn found(&self) -> &'static str {
        self.found
    }
}

fn render_context(context: &Context) -> String {
    if context.is_empty() {
        return String::new();
    }
    let rendered = serde_json::to_string(context).unwrap_or_default();
    format!(" | Context: {rendered}")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl DomainError {
    pub fn of_kind(kind: DomainErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Context::new(),
            code: None,
        }
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self::of_kind(DomainErrorKind::General, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::of_kind(DomainErrorKind::Validation, message)
    }

    pub fn rule_violation(message: impl Into<String>) -> Self {
        Self::of_kind(DomainErrorKind::RuleViolation, message)
    }

    /// Replace the context with an already-typed mapping.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Replace the context with an untyped JSON value.
    ///
    /// Fails fast when the value is not an object; `null` is treated as
    /// "no context" and yields an empty mapping.
    pub fn try_with_context(mut self, context: Value) -> Result<Self, ContextTypeError> {
        match context {
            Value::Object(map) => {
                self.context = map;
                Ok(self)
            }
            Value::Null => {
                self.context = Context::new();
                Ok(self)
            }
            other => Err(ContextTypeError {
                found: json_type_name(&other),
            }),
        }
    }

    /// Add (or overwrite) a single context entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attach a stable, machine-readable code (e.g. `ROLE_ALREADY_SET`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn kind(&self) -> DomainErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_validation(&self) -> bool {
        self.kind == DomainErrorKind::Validation
    }

    pub fn is_rule_violation(&self) -> bool {
        self.kind == DomainErrorKind::RuleViolation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_defaults_to_empty_mapping() {
        let err = DomainError::validation("Test message");
        assert_eq!(err.message(), "Test message");
        assert!(err.context().is_empty());
        assert_eq!(err.kind(), DomainErrorKind::Validation);
    }

    #[test]
    fn display_without_context_is_message_only() {
        let err = DomainError::new("Something went wrong");
        assert_eq!(err.to_string(), "Something went wrong");
    }

    #[test]
    fn display_appends_non_empty_context() {
        let err = DomainError::rule_violation("Test message").with_detail("key", "value");
        assert_eq!(err.to_string(), "Test message | Context: {\"key\":\"value\"}");
    }

    #[test]
    fn object_context_is_accepted() {
        let err = DomainError::rule_violation("Test exception")
            .try_with_context(json!({ "error": "details" }))
            .unwrap();
        assert_eq!(err.context().get("error"), Some(&json!("details")));
    }

    #[test]
    fn null_context_becomes_empty_mapping() {
        let err = DomainError::validation("x")
            .with_detail("stale", 1)
            .try_with_context(Value::Null)
            .unwrap();
        assert!(err.context().is_empty());
    }

    #[test]
    fn non_mapping_context_is_rejected() {
        for (value, found) in [
            (json!("not a dict"), "string"),
            (json!(["a", "b"]), "array"),
            (json!(3), "number"),
            (json!(true), "boolean"),
        ] {
            let err = DomainError::validation("x").try_with_context(value).unwrap_err();
            assert_eq!(err.found(), found);
        }
    }

    #[test]
    fn kinds_are_distinguishable() {
        let weak_password = DomainError::validation("bad password too short");
        let duplicate = DomainError::rule_violation("email already exists");
        assert!(weak_password.is_validation());
        assert!(!weak_password.is_rule_violation());
        assert!(duplicate.is_rule_violation());
        assert_ne!(weak_password.kind(), duplicate.kind());
    }

    #[test]
    fn code_is_optional() {
        let err = DomainError::rule_violation("User already has the role 'admin'.");
        assert_eq!(err.code(), None);
        let err = err.with_code("ROLE_ALREADY_SET");
        assert_eq!(err.code(), Some("ROLE_ALREADY_SET"));
    }

    #[test]
    fn serializes_with_kind_and_context() {
        let err = DomainError::validation("invalid").with_detail("name", json!(["cannot be empty."]));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], json!("validation"));
        assert_eq!(value["context"]["name"], json!(["cannot be empty."]));
        assert!(value.get("code").is_none());
        let back: DomainError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }
}
