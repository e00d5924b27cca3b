//! Checked access to the two sides of a `Result`.
//!
//! `Result<T, E>` is the outcome type for every validating domain operation:
//! expected failures travel as `Err(DomainError)`, never as panics. Reaching for
//! the side that is not there is a programming error and is reported as
//! [`ResultAccessError`] instead of a silent `None`.

use thiserror::Error;

/// Raised when the absent side of a result is accessed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ResultAccessError {
    #[error("cannot access error from an Ok result")]
    ErrorOfOk,

    #[error("cannot access value from an Err result")]
    ValueOfErr,
}

/// Named accessors over `Ok` / `Err`.
pub trait ResultAccess<T, E> {
    /// Borrow the success value.
    fn value(&self) -> Result<&T, ResultAccessError>;

    /// Borrow the failure value.
    fn error(&self) -> Result<&E, ResultAccessError>;

    fn into_value(self) -> Result<T, ResultAccessError>;

    fn into_error(self) -> Result<E, ResultAccessError>;
}

impl<T, E> ResultAccess<T, E> for Result<T, E> {
    fn value(&self) -> Result<&T, ResultAccessError> {
        match self {
            Ok(value) => Ok(value),
            Err(_) => Err(ResultAccessError::ValueOfErr),
        }
    }

    fn error(&self) -> Result<&E, ResultAccessError> {
        match self {
            Ok(_) => Err(ResultAccessError::ErrorOfOk),
            Err(error) => Ok(error),
        }
    }

    fn into_value(self) -> Result<T, ResultAccessError> {
        self.map_err(|_| ResultAccessError::ValueOfErr)
    }

    fn into_error(self) -> Result<E, ResultAccessError> {
        match self {
            Ok(_) => Err(ResultAccessError::ErrorOfOk),
            Err(error) => Ok(error),
        }
    }
}
