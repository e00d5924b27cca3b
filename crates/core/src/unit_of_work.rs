//! Unit-of-work port: one atomic commit/rollback boundary over many writes.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::DomainError;
use crate::repository::RepositoryError;

/// Unit-of-work failure.
#[derive(Debug, Error)]
pub enum UnitOfWorkError {
    /// A staged operation failed; nothing from this unit of work was persisted.
    #[error("commit failed at operation {index}: {source}")]
    CommitFailed {
        index: usize,
        #[source]
        source: RepositoryError,
    },

    /// Participants could not be snapshotted; no staged operation ran.
    #[error("commit could not start: {0}")]
    SnapshotFailed(#[source] RepositoryError),

    /// Operation `index` failed and some participants could not be restored
    /// afterwards. Storage may hold part of the unit of work.
    #[error(
        "commit failed at operation {index} ({source}) and {} participant(s) could not be restored",
        .restore_errors.len()
    )]
    RollbackFailed {
        index: usize,
        #[source]
        source: RepositoryError,
        restore_errors: Vec<String>,
    },
}

impl UnitOfWorkError {
    pub fn into_domain_error(self) -> DomainError {
        match self {
            UnitOfWorkError::CommitFailed { source, .. } => source.into_domain_error(),
            UnitOfWorkError::SnapshotFailed(source) => source.into_domain_error(),
            UnitOfWorkError::RollbackFailed {
                index,
                source,
                restore_errors,
            } => DomainError::new(format!("rollback after failed operation {index} was incomplete"))
                .with_code("ROLLBACK_FAILED")
                .with_detail("commit_error", source.to_string())
                .with_detail("restore_errors", restore_errors),
        }
    }
}

/// Coordinates persistence of every aggregate registered in one business transaction.
///
/// - `commit` is all-or-nothing: when it fails, underlying storage is unchanged.
/// - `rollback` discards pending work and is always safe to call, including after
///   a failed `commit` and on an empty unit of work.
pub trait UnitOfWork {
    fn commit(&mut self) -> Result<(), UnitOfWorkError>;

    fn rollback(&mut self) -> Result<(), UnitOfWorkError>;
}

/// Async unit of work, for I/O-bound transaction coordinators.
#[async_trait]
pub trait AsyncUnitOfWork: Send {
    async fn commit(&mut self) -> Result<(), UnitOfWorkError>;

    async fn rollback(&mut self) -> Result<(), UnitOfWorkError>;
}
