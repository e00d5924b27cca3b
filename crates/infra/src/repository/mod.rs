//! Repository adapters.
//!
//! [`InMemoryRepository`] is a complete `Repository` implementation backed by a
//! map; [`PublishingRepository`] decorates any repository so that the events an
//! aggregate recorded are published only after its save has succeeded.

pub mod in_memory;
pub mod publishing;

use core::any::Any;

use blocks_core::RepositoryError;

pub use in_memory::InMemoryRepository;
pub use publishing::PublishingRepository;

/// Opaque copy of a repository's state, taken before a unit of work applies its
/// staged operations.
pub struct Snapshot(Box<dyn Any + Send>);

impl Snapshot {
    pub fn new<T: Any + Send>(state: T) -> Self {
        Self(Box::new(state))
    }

    /// Recover the typed state. Handing a snapshot to a repository that did not
    /// produce it is a storage error, not a panic.
    pub fn downcast<T: Any>(self) -> Result<T, RepositoryError> {
        self.0
            .downcast::<T>()
            .map(|state| *state)
            .map_err(|_| RepositoryError::storage("snapshot belongs to a different repository"))
    }
}

impl core::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Snapshot(..)")
    }
}

/// A repository that can take part in an all-or-nothing unit of work.
///
/// The unit of work snapshots every participant before applying anything and
/// restores all of them if any staged operation fails.
pub trait Transactional: Send + Sync {
    fn snapshot(&self) -> Result<Snapshot, RepositoryError>;

    fn restore(&self, snapshot: Snapshot) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_downcasts_to_its_own_type() {
        let snapshot = Snapshot::new(vec![1u8, 2, 3]);
        assert_eq!(snapshot.downcast::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn foreign_snapshot_is_a_storage_error() {
        let err = Snapshot::new(42u32).downcast::<String>().unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
    }
}
