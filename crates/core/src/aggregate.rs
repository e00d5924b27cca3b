//! Aggregate root: consistency boundary with a version and an event ledger.

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

/// Identity, version and uncommitted-event ledger of one aggregate instance.
///
/// Aggregates embed this and expose it through [`AggregateRoot`]. The ledger cycles
/// through one loop for the aggregate's whole lifetime:
///
/// ```text
/// {version: v, events: []} --record_event x n--> {version: v, events: [e1..en]}
///                          --mark_changes_as_committed--> {version: v+1, events: []}
/// ```
///
/// Alongside the working `version` it remembers the version it was loaded or
/// last committed at. Repositories compare that one against storage, so a
/// mutation that bumps the working version with `increment_version` is not
/// mistaken for a concurrent write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateBase<Id, E> {
    id: Id,
    version: u64,
    persisted_version: u64,
    uncommitted_events: Vec<E>,
}

impl<Id, E: Clone> AggregateBase<Id, E> {
    /// A brand-new aggregate at version 0.
    pub fn new(id: Id) -> Self {
        Self::with_version(id, 0)
    }

    /// An aggregate at a known version (e.g. reconstructed from storage).
    pub fn with_version(id: Id, version: u64) -> Self {
        Self {
            id,
            version,
            persisted_version: version,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version at load time or at the last commit.
    pub fn persisted_version(&self) -> u64 {
        self.persisted_version
    }

    /// Order-preserving copy of the pending events.
    pub fn uncommitted_changes(&self) -> Vec<E> {
        self.uncommitted_events.clone()
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        !self.uncommitted_events.is_empty()
    }

    pub fn record_event(&mut self, event: E) {
        self.uncommitted_events.push(event);
    }

    /// Clears the ledger and bumps the version by exactly one.
    ///
    /// The version moves even when no events were pending; a commit is a
    /// boundary marker, not a count of events.
    pub fn mark_changes_as_committed(&mut self) {
        self.uncommitted_events.clear();
        self.increment_version();
        self.persisted_version = self.version;
    }

    pub fn increment_version(&mut self) {
        self.version += 1;
    }
}

/// Aggregate root contract.
///
/// Implementors provide access to their embedded [`AggregateBase`]; every ledger
/// operation is a default method on top of it. Domain methods validate their
/// preconditions first (returning `Err(DomainError)`) and only then call
/// [`record_event`](AggregateRoot::record_event), so a ledger never holds an
/// event for a mutation that did not happen.
///
/// The [`aggregate_root!`](crate::aggregate_root) macro wires `Entity`, this trait and
/// identity equality for a struct with an `AggregateBase` field.
pub trait AggregateRoot: Entity {
    type Event: Clone + core::fmt::Debug;

    fn base(&self) -> &AggregateBase<Self::Id, Self::Event>;

    fn base_mut(&mut self) -> &mut AggregateBase<Self::Id, Self::Event>;

    fn version(&self) -> u64 {
        self.base().version()
    }

    /// Optimistic-concurrency token: the version storage last saw.
    fn persisted_version(&self) -> u64 {
        self.base().persisted_version()
    }

    /// Copy of the pending events; mutating it never touches the aggregate.
    fn uncommitted_changes(&self) -> Vec<Self::Event> {
        self.base().uncommitted_changes()
    }

    fn has_uncommitted_changes(&self) -> bool {
        self.base().has_uncommitted_changes()
    }

    fn record_event(&mut self, event: Self::Event) {
        self.base_mut().record_event(event);
    }

    fn mark_changes_as_committed(&mut self) {
        self.base_mut().mark_changes_as_committed();
    }

    fn increment_version(&mut self) {
        self.base_mut().increment_version();
    }
}

/// Implements [`Entity`], [`AggregateRoot`] and id-based equality for a struct that
/// embeds an [`AggregateBase`].
///
/// ```ignore
/// pub struct Order {
///     base: AggregateBase<OrderId, OrderEvent>,
///     lines: Vec<OrderLine>,
/// }
///
/// aggregate_root!(Order, id = OrderId, event = OrderEvent, base = base);
/// ```
#[macro_export]
macro_rules! aggregate_root {
    ($t:ty, id = $id:ty, event = $event:ty, base = $field:ident) => {
        impl $crate::Entity for $t {
            type Id = $id;

            fn id(&self) -> &$id {
                self.$field.id()
            }
        }

        impl $crate::AggregateRoot for $t {
            type Event = $event;

            fn base(&self) -> &$crate::AggregateBase<$id, $event> {
                &self.$field
            }

            fn base_mut(&mut self) -> &mut $crate::AggregateBase<$id, $event> {
                &mut self.$field
            }
        }

        $crate::entity_identity!($t);
    };
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent commands, migrations, etc.).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        match self {
            ExpectedVersion::Exact(expected) if expected != actual => Err(DomainError::rule_violation(
                "optimistic concurrency check failed",
            )
            .with_detail("expected_version", expected)
            .with_detail("actual_version", actual)),
            _ => Ok(()),
        }
    }
}
