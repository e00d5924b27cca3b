//! Deterministic mapping from domain failures to transport status codes.

use serde::Serialize;

use blocks_core::{Context, DomainError, DomainErrorKind};

/// Response status chosen for a [`DomainError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// 400: failure with no finer classification.
    BadRequest,
    /// 404: a rule violation carrying the `NOT_FOUND` code.
    NotFound,
    /// 409: input conflicts with current state.
    Conflict,
    /// 422: input failed validation.
    UnprocessableEntity,
}

impl ResponseStatus {
    /// Pick the status from the error kind alone (plus the `NOT_FOUND` code).
    pub fn for_error(err: &DomainError) -> Self {
        match err.kind() {
            DomainErrorKind::Validation => ResponseStatus::UnprocessableEntity,
            DomainErrorKind::RuleViolation if err.code() == Some("NOT_FOUND") => {
                ResponseStatus::NotFound
            }
            DomainErrorKind::RuleViolation => ResponseStatus::Conflict,
            DomainErrorKind::General => ResponseStatus::BadRequest,
        }
    }

    pub fn code(self) -> u16 {
        match self {
            ResponseStatus::BadRequest => 400,
            ResponseStatus::NotFound => 404,
            ResponseStatus::Conflict => 409,
            ResponseStatus::UnprocessableEntity => 422,
        }
    }
}

/// JSON error body: `{"error": kind, "message": ..., "code": ..., "context": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: DomainErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Context::is_empty")]
    pub context: Context,
}

impl ErrorBody {
    /// Status and body for `err`.
    pub fn from_error(err: &DomainError) -> (ResponseStatus, Self) {
        let body = Self {
            error: err.kind(),
            message: err.message().to_string(),
            code: err.code().map(str::to_string),
            context: err.context().clone(),
        };
        (ResponseStatus::for_error(err), body)
    }
}
