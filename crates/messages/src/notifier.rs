//! Notification port: tell a person or an external system that something happened.
//!
//! Unlike [`EventPublisher`](crate::EventPublisher), which broadcasts domain
//! messages to in-process consumers, a notifier hands one addressed
//! notification (email, SMS, push) to a delivery channel.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::in_memory_publisher::InMemoryPublisherError;

/// Outbound port: deliver a notification.
pub trait Notifier<N>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn notify(&self, notification: N) -> Result<(), Self::Error>;
}

impl<N, T> Notifier<N> for Arc<T>
where
    T: Notifier<N> + ?Sized,
{
    type Error = T::Error;

    fn notify(&self, notification: N) -> Result<(), Self::Error> {
        (**self).notify(notification)
    }
}

/// Async notification port, for network-backed channels.
#[async_trait]
pub trait AsyncNotifier<N>: Send + Sync
where
    N: Send + 'static,
{
    type Error: core::fmt::Debug + Send + Sync + 'static;

    async fn notify(&self, notification: N) -> Result<(), Self::Error>;
}

/// Notifier that keeps every notification in memory, for tests/dev.
#[derive(Debug)]
pub struct InMemoryNotifier<N> {
    sent: Mutex<Vec<N>>,
}

impl<N> Default for InMemoryNotifier<N> {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl<N: Clone> InMemoryNotifier<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, oldest first.
    pub fn sent(&self) -> Result<Vec<N>, InMemoryPublisherError> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .map_err(|_| InMemoryPublisherError::Poisoned)
    }
}

impl<N> Notifier<N> for InMemoryNotifier<N>
where
    N: Send,
{
    type Error = InMemoryPublisherError;

    fn notify(&self, notification: N) -> Result<(), Self::Error> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| InMemoryPublisherError::Poisoned)?;
        sent.push(notification);
        debug!(delivered = sent.len(), "notification recorded");
        Ok(())
    }
}

#[async_trait]
impl<N> AsyncNotifier<N> for InMemoryNotifier<N>
where
    N: Send + 'static,
{
    type Error = InMemoryPublisherError;

    async fn notify(&self, notification: N) -> Result<(), Self::Error> {
        Notifier::notify(self, notification)
    }
}
