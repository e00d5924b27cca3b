use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use blocks_core::{AggregateRoot, ReadOnlyRepository, RepositoryError, WriteOnlyRepository};
use blocks_messages::{EventPublisher, Message, MessageEnvelope};
use tracing::{debug, warn};

/// Adapter that publishes an aggregate's recorded events after a successful save.
///
/// This ensures the ordering invariant: **publish happens only after save succeeds**.
/// A failed save publishes nothing and leaves the aggregate's ledger untouched.
///
/// Envelopes go through an outbox. The save has already committed the
/// aggregate's ledger, so an envelope the publisher rejects stays queued and is
/// sent, ahead of newer ones, by the next `save` or [`flush`](Self::flush).
/// Delivery is at-least-once.
pub struct PublishingRepository<R, P> {
    inner: R,
    publisher: P,
    outbox: Mutex<VecDeque<MessageEnvelope>>,
}

impl<R, P> PublishingRepository<R, P> {
    pub fn new(inner: R, publisher: P) -> Self {
        Self {
            inner,
            publisher,
            outbox: Mutex::new(VecDeque::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Envelopes saved but not yet accepted by the publisher.
    pub fn pending_publications(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock_outbox()?.len())
    }

    pub fn into_parts(self) -> (R, P) {
        (self.inner, self.publisher)
    }

    fn lock_outbox(&self) -> Result<MutexGuard<'_, VecDeque<MessageEnvelope>>, RepositoryError> {
        self.outbox
            .lock()
            .map_err(|_| RepositoryError::storage("lock poisoned"))
    }
}

impl<R, P> PublishingRepository<R, P>
where
    P: EventPublisher<MessageEnvelope>,
{
    /// Publish every queued envelope in order, stopping at the first failure.
    ///
    /// Returns how many were published. The failed envelope and everything
    /// behind it stay queued.
    pub fn flush(&self) -> Result<usize, RepositoryError> {
        let mut outbox = self.lock_outbox()?;
        Self::drain(&self.publisher, &mut outbox)
    }

    fn drain(
        publisher: &P,
        outbox: &mut VecDeque<MessageEnvelope>,
    ) -> Result<usize, RepositoryError> {
        let mut published = 0;
        while let Some(envelope) = outbox.front() {
            if let Err(err) = publisher.publish(envelope.clone()) {
                warn!(
                    message_type = envelope.message_type(),
                    queued = outbox.len(),
                    error = ?err,
                    "publication failed, envelopes kept for retry"
                );
                return Err(RepositoryError::Publish(format!("{err:?}")));
            }
            outbox.pop_front();
            published += 1;
        }
        Ok(published)
    }
}

impl<A, R, P> ReadOnlyRepository<A> for PublishingRepository<R, P>
where
    A: AggregateRoot,
    R: ReadOnlyRepository<A>,
{
    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        self.inner.find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<A>, RepositoryError> {
        self.inner.find_all()
    }
}

impl<A, R, P> WriteOnlyRepository<A> for PublishingRepository<R, P>
where
    A: AggregateRoot,
    A::Event: Message,
    R: WriteOnlyRepository<A>,
    P: EventPublisher<MessageEnvelope>,
{
    fn save(&self, aggregate: &mut A) -> Result<(), RepositoryError> {
        // The inner save commits (and so clears) the ledger.
        let pending: Vec<MessageEnvelope> = aggregate
            .uncommitted_changes()
            .iter()
            .map(MessageEnvelope::from_message)
            .collect();

        let mut outbox = self.lock_outbox()?;
        self.inner.save(aggregate)?;
        outbox.extend(pending);

        let published = Self::drain(&self.publisher, &mut outbox)?;
        debug!(published, "recorded events published");
        Ok(())
    }

    fn delete_by_id(&self, id: &A::Id) -> Result<(), RepositoryError> {
        self.inner.delete_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::repository::InMemoryRepository;
    use crate::test_support::Account;
    use blocks_core::Entity;
    use blocks_messages::InMemoryEventPublisher;

    type Accounts = PublishingRepository<
        InMemoryRepository<Account>,
        Arc<InMemoryEventPublisher<MessageEnvelope>>,
    >;

    fn publishing() -> (Accounts, Arc<InMemoryEventPublisher<MessageEnvelope>>) {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let repo = PublishingRepository::new(
            InMemoryRepository::new().with_unique_key("handle", |a: &Account| a.handle().to_string()),
            publisher.clone(),
        );
        (repo, publisher)
    }

    #[test]
    fn publishes_recorded_events_in_order_after_save() {
        let (repo, publisher) = publishing();
        let subscription = publisher.subscribe();

        let mut account = Account::open("ada");
        account.change_handle("lovelace");
        let recorded = account.uncommitted_changes();

        repo.save(&mut account).unwrap();

        let published = subscription.drain();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].message_id(), recorded[0].message_id());
        assert_eq!(published[1].message_type(), "HandleChanged");
        assert_eq!(published[1].payload()["handle"], serde_json::json!("lovelace"));
        assert!(!account.has_uncommitted_changes());
    }

    #[test]
    fn failed_save_publishes_nothing() {
        let (repo, publisher) = publishing();
        repo.save(&mut Account::open("ada")).unwrap();
        let subscription = publisher.subscribe();

        let mut twin = Account::open("ada");
        assert!(repo.save(&mut twin).is_err());
        assert!(subscription.drain().is_empty());
        assert_eq!(twin.uncommitted_changes().len(), 1);
    }

    /// Rejects the first `failures` publications, then records everything.
    struct FlakyPublisher {
        failures: AtomicUsize,
        delivered: Mutex<Vec<MessageEnvelope>>,
    }

    impl FlakyPublisher {
        fn failing(failures: usize) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
                delivered: Mutex::new(Vec::new()),
            }
        }

        fn delivered_types(&self) -> Vec<String> {
            self.delivered
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.message_type().to_string())
                .collect()
        }
    }

    impl EventPublisher<MessageEnvelope> for FlakyPublisher {
        type Error = &'static str;

        fn publish(&self, message: MessageEnvelope) -> Result<(), Self::Error> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err("transport down");
            }
            self.delivered.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[test]
    fn rejected_publications_are_kept_and_retried() {
        let publisher = Arc::new(FlakyPublisher::failing(1));
        let repo = PublishingRepository::new(InMemoryRepository::new(), publisher.clone());

        let mut account = Account::open("ada");
        account.change_handle("lovelace");
        let err = repo.save(&mut account).unwrap_err();
        assert!(matches!(err, RepositoryError::Publish(_)));

        // The save itself went through; both envelopes wait in the outbox.
        assert!(!account.has_uncommitted_changes());
        assert_eq!(repo.inner().len().unwrap(), 1);
        assert_eq!(repo.pending_publications().unwrap(), 2);
        assert!(publisher.delivered_types().is_empty());

        repo.save(&mut account).unwrap();
        assert_eq!(repo.pending_publications().unwrap(), 0);
        assert_eq!(
            publisher.delivered_types(),
            vec!["HandleChanged".to_string(); 2]
        );
    }

    #[test]
    fn flush_resends_in_order_ahead_of_newer_events() {
        let publisher = Arc::new(FlakyPublisher::failing(2));
        let repo = PublishingRepository::new(InMemoryRepository::new(), publisher.clone());

        let mut ada = Account::open("ada");
        assert!(repo.save(&mut ada).is_err());
        let mut alan = Account::open("alan");
        assert!(repo.save(&mut alan).is_err());
        assert_eq!(repo.pending_publications().unwrap(), 2);

        assert_eq!(repo.flush().unwrap(), 2);
        let delivered = publisher.delivered.lock().unwrap();
        let handles: Vec<_> = delivered.iter().map(|e| e.payload()["handle"].clone()).collect();
        assert_eq!(handles, vec![serde_json::json!("ada"), serde_json::json!("alan")]);
    }

    #[test]
    fn reads_and_deletes_pass_through() {
        let (repo, _publisher) = publishing();
        let mut account = Account::open("ada");
        repo.save(&mut account).unwrap();

        assert!(repo.find_by_id(account.id()).unwrap().is_some());
        repo.delete(&account).unwrap();
        assert!(repo.find_all().unwrap().is_empty());
        assert!(repo.inner().is_empty().unwrap());
    }
}
