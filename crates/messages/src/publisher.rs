//! Event publication port (mechanics only).
//!
//! Events are published **after** the aggregate that recorded them has been
//! persisted. Publication is at-least-once: consumers must tolerate duplicates,
//! which is what id-based message equality is for.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use async_trait::async_trait;

/// A subscription to published messages.
///
/// Each subscription receives its own copy of every message published after it
/// was created (broadcast semantics). Designed for single-threaded consumption.
///
/// ```ignore
/// let subscription = publisher.subscribe();
///
/// loop {
///     match subscription.recv_timeout(Duration::from_secs(1)) {
///         Ok(event) => handle(event)?,
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything already delivered, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Outbound port: publish a message to interested consumers.
///
/// `publish` may fail (transport down, buffer full). Failures are surfaced to the
/// caller; since the source aggregate is already persisted, retrying is safe.
pub trait EventPublisher<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;
}

impl<M, P> EventPublisher<M> for Arc<P>
where
    P: EventPublisher<M> + ?Sized,
{
    type Error = P::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }
}

/// Async publication port, for network-backed transports.
#[async_trait]
pub trait AsyncEventPublisher<M>: Send + Sync
where
    M: Send + 'static,
{
    type Error: core::fmt::Debug + Send + Sync + 'static;

    async fn publish(&self, message: M) -> Result<(), Self::Error>;
}
