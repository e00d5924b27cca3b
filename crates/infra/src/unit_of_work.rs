//! In-memory unit of work over [`Transactional`] repositories.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use blocks_core::{
    AggregateRoot, AsyncUnitOfWork, RepositoryError, UnitOfWork, UnitOfWorkError,
    WriteOnlyRepository,
};
use tracing::{debug, info, warn};

use crate::repository::{Snapshot, Transactional};

/// One deferred repository write.
trait StagedOperation: Send {
    fn apply(&mut self) -> Result<(), RepositoryError>;
}

struct StagedSave<R, A> {
    repository: Arc<R>,
    aggregate: A,
}

impl<R, A> StagedOperation for StagedSave<R, A>
where
    R: WriteOnlyRepository<A> + Send + Sync,
    A: AggregateRoot + Send,
{
    fn apply(&mut self) -> Result<(), RepositoryError> {
        self.repository.save(&mut self.aggregate)
    }
}

struct StagedDelete<R, A: AggregateRoot> {
    repository: Arc<R>,
    id: A::Id,
    _aggregate: PhantomData<fn() -> A>,
}

impl<R, A> StagedOperation for StagedDelete<R, A>
where
    R: WriteOnlyRepository<A> + Send + Sync,
    A: AggregateRoot,
    A::Id: Send,
{
    fn apply(&mut self) -> Result<(), RepositoryError> {
        self.repository.delete_by_id(&self.id)
    }
}

/// Stages saves and deletes across repositories and applies them all-or-nothing.
///
/// `commit` snapshots every participating repository, applies the staged
/// operations in registration order and, if any of them fails, restores every
/// snapshot before reporting the failure. Assumes it is the only writer to its
/// participants while a commit is in flight.
///
/// ```ignore
/// let mut uow = InMemoryUnitOfWork::new();
/// uow.register_save(&users, user);
/// uow.register_save(&tasks, task);
/// uow.commit()?;
/// ```
#[derive(Default)]
pub struct InMemoryUnitOfWork {
    participants: Vec<Arc<dyn Transactional>>,
    staged: Vec<Box<dyn StagedOperation>>,
}

impl core::fmt::Debug for InMemoryUnitOfWork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryUnitOfWork")
            .field("participants", &self.participants.len())
            .field("staged", &self.staged.len())
            .finish()
    }
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `aggregate` to be saved into `repository` on commit.
    pub fn register_save<R, A>(&mut self, repository: &Arc<R>, aggregate: A)
    where
        R: WriteOnlyRepository<A> + Transactional + 'static,
        A: AggregateRoot + Send + 'static,
    {
        self.enlist(repository);
        self.staged.push(Box::new(StagedSave {
            repository: Arc::clone(repository),
            aggregate,
        }));
    }

    /// Stage the removal of `aggregate` from `repository` on commit.
    pub fn register_delete<R, A>(&mut self, repository: &Arc<R>, aggregate: &A)
    where
        R: WriteOnlyRepository<A> + Transactional + 'static,
        A: AggregateRoot + 'static,
        A::Id: Send,
    {
        self.enlist(repository);
        self.staged.push(Box::new(StagedDelete::<R, A> {
            repository: Arc::clone(repository),
            id: aggregate.id().clone(),
            _aggregate: PhantomData,
        }));
    }

    /// Number of operations waiting for `commit`.
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    fn enlist<R: Transactional + 'static>(&mut self, repository: &Arc<R>) {
        let candidate = Arc::as_ptr(repository) as *const ();
        let known = self
            .participants
            .iter()
            .any(|p| Arc::as_ptr(p) as *const () == candidate);
        if !known {
            let participant: Arc<dyn Transactional> = repository.clone();
            self.participants.push(participant);
        }
    }

    /// Restore every participant, carrying on past failures so each one gets
    /// its snapshot back. Returns the messages of the restores that failed.
    fn restore_all(&self, snapshots: Vec<Snapshot>) -> Vec<String> {
        self.participants
            .iter()
            .zip(snapshots)
            .filter_map(|(participant, snapshot)| participant.restore(snapshot).err())
            .map(|err| err.to_string())
            .collect()
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    fn commit(&mut self) -> Result<(), UnitOfWorkError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut snapshots = Vec::with_capacity(self.participants.len());
        for participant in &self.participants {
            let snapshot = participant
                .snapshot()
                .map_err(UnitOfWorkError::SnapshotFailed)?;
            snapshots.push(snapshot);
        }

        let staged = std::mem::take(&mut self.staged);
        let total = staged.len();
        for (index, mut operation) in staged.into_iter().enumerate() {
            if let Err(source) = operation.apply() {
                warn!(index, total, error = %source, "unit of work failed, restoring participants");
                let restore_errors = self.restore_all(snapshots);
                if !restore_errors.is_empty() {
                    warn!(index, failed = restore_errors.len(), "participants left unrestored");
                    return Err(UnitOfWorkError::RollbackFailed {
                        index,
                        source,
                        restore_errors,
                    });
                }
                return Err(UnitOfWorkError::CommitFailed { index, source });
            }
        }

        info!(operations = total, participants = self.participants.len(), "unit of work committed");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), UnitOfWorkError> {
        let discarded = self.staged.len();
        self.staged.clear();
        debug!(discarded, "unit of work rolled back");
        Ok(())
    }
}

#[async_trait]
impl AsyncUnitOfWork for InMemoryUnitOfWork {
    async fn commit(&mut self) -> Result<(), UnitOfWorkError> {
        UnitOfWork::commit(self)
    }

    async fn rollback(&mut self) -> Result<(), UnitOfWorkError> {
        UnitOfWork::rollback(self)
    }
}
