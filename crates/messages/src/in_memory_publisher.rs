//! In-memory event publisher for tests/dev.

use std::sync::{Mutex, mpsc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::publisher::{AsyncEventPublisher, EventPublisher, Subscription};

#[derive(Debug, Error)]
pub enum InMemoryPublisherError {
    /// Publish failed due to internal lock poisoning.
    #[error("publisher lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub fan-out.
///
/// - No IO / no async work
/// - Best-effort fan-out; dropped subscriptions are pruned on publish
/// - Messages published before a subscription exists are not replayed
#[derive(Debug)]
pub struct InMemoryEventPublisher<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventPublisher<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

impl<M> Default for InMemoryEventPublisher<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventPublisher<M> for InMemoryEventPublisher<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryPublisherError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryPublisherError::Poisoned)?;

        subs.retain(|tx| tx.send(message.clone()).is_ok());
        debug!(subscribers = subs.len(), "message published");

        Ok(())
    }
}

#[async_trait]
impl<M> AsyncEventPublisher<M> for InMemoryEventPublisher<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryPublisherError;

    async fn publish(&self, message: M) -> Result<(), Self::Error> {
        EventPublisher::publish(self, message)
    }
}
