use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use blocks_core::{
    AggregateRoot, DomainError, ReadOnlyRepository, RepositoryError, WriteOnlyRepository,
    short_type_name,
};
use tracing::{debug, warn};

use super::{Snapshot, Transactional};

type KeyFn<A> = Box<dyn Fn(&A) -> String + Send + Sync>;

struct UniqueKey<A> {
    name: &'static str,
    extract: KeyFn<A>,
}

/// In-memory aggregate repository.
///
/// Intended for tests/dev. Rows are committed snapshots: the aggregate is stored
/// after its ledger has been committed, so loading never yields pending events.
///
/// `save` is a compare-and-swap on [`AggregateRoot::persisted_version`]: the
/// version the aggregate was loaded or last committed at must equal the stored
/// version, with a missing row counting as 0. Versions bumped during a mutation
/// (`increment_version`) do not take part in the check. A brand-new aggregate is
/// accepted; a copy of a deleted aggregate is rejected as stale.
pub struct InMemoryRepository<A: AggregateRoot> {
    rows: RwLock<HashMap<A::Id, A>>,
    unique_keys: Vec<UniqueKey<A>>,
}

impl<A: AggregateRoot> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            unique_keys: Vec::new(),
        }
    }
}

impl<A: AggregateRoot> core::fmt::Debug for InMemoryRepository<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let keys: Vec<&str> = self.unique_keys.iter().map(|k| k.name).collect();
        f.debug_struct("InMemoryRepository")
            .field("aggregate_type", &short_type_name::<A>())
            .field("unique_keys", &keys)
            .finish_non_exhaustive()
    }
}

impl<A> InMemoryRepository<A>
where
    A: AggregateRoot + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject saves where another aggregate already has the same value for `extract`.
    ///
    /// ```ignore
    /// let users = InMemoryRepository::<User>::new()
    ///     .with_unique_key("email", |u| u.email().to_string());
    /// ```
    pub fn with_unique_key<F>(mut self, name: &'static str, extract: F) -> Self
    where
        F: Fn(&A) -> String + Send + Sync + 'static,
    {
        self.unique_keys.push(UniqueKey {
            name,
            extract: Box::new(extract),
        });
        self
    }

    /// Number of stored aggregates.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.read_rows()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    /// First stored aggregate matching `predicate`.
    ///
    /// Domain-specific finders (by email, by owner) are built on this.
    pub fn find_first<P>(&self, predicate: P) -> Result<Option<A>, RepositoryError>
    where
        P: Fn(&A) -> bool,
    {
        Ok(self.read_rows()?.values().find(|a| predicate(a)).cloned())
    }

    /// Every stored aggregate matching `predicate`.
    pub fn find_matching<P>(&self, predicate: P) -> Result<Vec<A>, RepositoryError>
    where
        P: Fn(&A) -> bool,
    {
        Ok(self
            .read_rows()?
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect())
    }

    fn read_rows(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<A::Id, A>>, RepositoryError> {
        self.rows
            .read()
            .map_err(|_| RepositoryError::storage("lock poisoned"))
    }

    fn write_rows(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<A::Id, A>>, RepositoryError> {
        self.rows
            .write()
            .map_err(|_| RepositoryError::storage("lock poisoned"))
    }

    fn check_unique_keys(
        &self,
        rows: &HashMap<A::Id, A>,
        aggregate: &A,
    ) -> Result<(), RepositoryError> {
        for key in &self.unique_keys {
            let value = (key.extract)(aggregate);
            let taken = rows
                .values()
                .any(|other| other.id() != aggregate.id() && (key.extract)(other) == value);
            if taken {
                return Err(RepositoryError::RuleViolation(
                    DomainError::rule_violation(format!(
                        "{} '{}' is already taken",
                        key.name, value
                    ))
                    .with_code("DUPLICATE_KEY")
                    .with_detail("key", key.name)
                    .with_detail("value", value),
                ));
            }
        }
        Ok(())
    }
}

impl<A> ReadOnlyRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone,
{
    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        Ok(self.read_rows()?.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<A>, RepositoryError> {
        Ok(self.read_rows()?.values().cloned().collect())
    }
}

impl<A> WriteOnlyRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone,
{
    fn save(&self, aggregate: &mut A) -> Result<(), RepositoryError> {
        let aggregate_type = short_type_name::<A>();
        let mut rows = self.write_rows()?;

        // A missing row counts as version 0, so a copy saved before the row
        // was deleted cannot bring it back.
        let expected = aggregate.persisted_version();
        let actual = rows.get(aggregate.id()).map_or(0, |stored| stored.version());
        if expected != actual {
            warn!(
                aggregate_type,
                id = ?aggregate.id(),
                expected,
                actual,
                "stale aggregate rejected"
            );
            return Err(RepositoryError::Concurrency { expected, actual });
        }

        self.check_unique_keys(&rows, aggregate)?;

        // Storage is updated and the caller's ledger committed under the same lock.
        let events = aggregate.uncommitted_changes().len();
        aggregate.mark_changes_as_committed();
        rows.insert(aggregate.id().clone(), aggregate.clone());

        debug!(
            aggregate_type,
            id = ?aggregate.id(),
            version = aggregate.version(),
            events,
            "aggregate saved"
        );
        Ok(())
    }

    fn delete_by_id(&self, id: &A::Id) -> Result<(), RepositoryError> {
        let removed = self.write_rows()?.remove(id).is_some();
        debug!(
            aggregate_type = short_type_name::<A>(),
            id = ?id,
            removed,
            "aggregate deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl<A> blocks_core::AsyncReadOnlyRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + Send + Sync + 'static,
    A::Id: Send + Sync,
{
    async fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        ReadOnlyRepository::find_by_id(self, id)
    }

    async fn find_all(&self) -> Result<Vec<A>, RepositoryError> {
        ReadOnlyRepository::find_all(self)
    }
}

#[async_trait]
impl<A> blocks_core::AsyncWriteOnlyRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + Send + Sync + 'static,
    A::Id: Send + Sync,
{
    async fn save(&self, aggregate: &mut A) -> Result<(), RepositoryError> {
        WriteOnlyRepository::save(self, aggregate)
    }

    async fn delete_by_id(&self, id: &A::Id) -> Result<(), RepositoryError> {
        WriteOnlyRepository::delete_by_id(self, id)
    }
}

impl<A> Transactional for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + Send + Sync + 'static,
    A::Id: Send + Sync + 'static,
{
    fn snapshot(&self) -> Result<Snapshot, RepositoryError> {
        Ok(Snapshot::new(self.read_rows()?.clone()))
    }

    fn restore(&self, snapshot: Snapshot) -> Result<(), RepositoryError> {
        let rows = snapshot.downcast::<HashMap<A::Id, A>>()?;
        *self.write_rows()? = rows;
        Ok(())
    }
}
