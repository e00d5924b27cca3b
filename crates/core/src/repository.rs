//! Repository ports: how aggregates are loaded and persisted.
//!
//! Application services depend on these traits; infrastructure implements them for
//! a concrete storage technology (SQL, document store, in-memory). Reads and writes
//! are split so a service can ask for exactly the capability it needs;
//! [`Repository`] is the union of both and is implemented automatically.
//!
//! ## Optimistic concurrency
//!
//! The aggregate's `persisted_version()` (the version it was loaded or last
//! committed at) is the compare-and-swap token. An implementation of
//! [`WriteOnlyRepository::save`] must reject the write with
//! [`RepositoryError::Concurrency`] when the stored version has moved since the
//! aggregate was loaded, and on success must call
//! [`AggregateRoot::mark_changes_as_committed`] on the saved aggregate.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::aggregate::AggregateRoot;
use crate::error::{DomainError, DomainErrorKind};

/// Repository operation error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A business-level conflict detected by storage (e.g. a unique key is taken).
    #[error("{0}")]
    RuleViolation(DomainError),

    /// The stored version no longer matches the version the aggregate was loaded at.
    #[error("optimistic concurrency check failed (expected version {expected}, stored version {actual})")]
    Concurrency { expected: u64, actual: u64 },

    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Publication failed after a successful save; the unsent events are kept
    /// for a later retry (at-least-once, so a retry may duplicate).
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Conflicts are recoverable by the caller choosing a different action.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RepositoryError::RuleViolation(_) | RepositoryError::Concurrency { .. }
        )
    }

    /// Collapse into the domain taxonomy: conflicts become rule violations,
    /// storage failures stay general.
    pub fn into_domain_error(self) -> DomainError {
        match self {
            RepositoryError::RuleViolation(err) => err,
            RepositoryError::Concurrency { expected, actual } => DomainError::of_kind(
                DomainErrorKind::RuleViolation,
                "the aggregate was modified concurrently",
            )
            .with_code("CONCURRENT_MODIFICATION")
            .with_detail("expected_version", expected)
            .with_detail("actual_version", actual),
            RepositoryError::Storage(message) => {
                DomainError::new(message).with_code("STORAGE_FAILURE")
            }
            RepositoryError::Publish(message) => {
                DomainError::new(message).with_code("PUBLISH_FAILURE")
            }
        }
    }
}

impl From<RepositoryError> for DomainError {
    fn from(value: RepositoryError) -> Self {
        value.into_domain_error()
    }
}

/// Read side of a repository.
pub trait ReadOnlyRepository<A: AggregateRoot> {
    /// Absent is not an error: `Ok(None)` means "not found".
    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError>;

    /// Full scan. No pagination contract.
    fn find_all(&self) -> Result<Vec<A>, RepositoryError>;
}

/// Write side of a repository.
pub trait WriteOnlyRepository<A: AggregateRoot> {
    /// Create-or-update. Commits the aggregate's ledger on success.
    fn save(&self, aggregate: &mut A) -> Result<(), RepositoryError>;

    /// Idempotent: deleting a missing id is `Ok(())`.
    fn delete_by_id(&self, id: &A::Id) -> Result<(), RepositoryError>;

    fn delete(&self, aggregate: &A) -> Result<(), RepositoryError> {
        self.delete_by_id(aggregate.id())
    }
}

/// Full repository (read + write).
pub trait Repository<A: AggregateRoot>: ReadOnlyRepository<A> + WriteOnlyRepository<A> {}

impl<A, R> Repository<A> for R
where
    A: AggregateRoot,
    R: ReadOnlyRepository<A> + WriteOnlyRepository<A> + ?Sized,
{
}

impl<A, R> ReadOnlyRepository<A> for Arc<R>
where
    A: AggregateRoot,
    R: ReadOnlyRepository<A> + ?Sized,
{
    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<A>, RepositoryError> {
        (**self).find_all()
    }
}

impl<A, R> WriteOnlyRepository<A> for Arc<R>
where
    A: AggregateRoot,
    R: WriteOnlyRepository<A> + ?Sized,
{
    fn save(&self, aggregate: &mut A) -> Result<(), RepositoryError> {
        (**self).save(aggregate)
    }

    fn delete_by_id(&self, id: &A::Id) -> Result<(), RepositoryError> {
        (**self).delete_by_id(id)
    }
}

/// Async read side, for I/O-bound backends.
#[async_trait]
pub trait AsyncReadOnlyRepository<A>: Send + Sync
where
    A: AggregateRoot + Send + 'static,
    A::Id: Sync,
{
    async fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<A>, RepositoryError>;
}

/// Async write side, for I/O-bound backends.
#[async_trait]
pub trait AsyncWriteOnlyRepository<A>: Send + Sync
where
    A: AggregateRoot + Send + Sync + 'static,
    A::Id: Sync,
{
    async fn save(&self, aggregate: &mut A) -> Result<(), RepositoryError>;

    async fn delete_by_id(&self, id: &A::Id) -> Result<(), RepositoryError>;

    async fn delete(&self, aggregate: &A) -> Result<(), RepositoryError> {
        self.delete_by_id(aggregate.id()).await
    }
}

/// Full async repository (read + write).
pub trait AsyncRepository<A>: AsyncReadOnlyRepository<A> + AsyncWriteOnlyRepository<A>
where
    A: AggregateRoot + Send + Sync + 'static,
    A::Id: Sync,
{
}

impl<A, R> AsyncRepository<A> for R
where
    A: AggregateRoot + Send + Sync + 'static,
    A::Id: Sync,
    R: AsyncReadOnlyRepository<A> + AsyncWriteOnlyRepository<A> + ?Sized,
{
}
