//! Messages: immutable, identity-bearing facts (events) and intents (commands).

pub mod command;
pub mod envelope;
pub mod event;
pub mod in_memory_publisher;
pub mod message;
pub mod metadata;
pub mod notifier;
pub mod publisher;

pub use command::Command;
pub use envelope::MessageEnvelope;
pub use event::Event;
pub use in_memory_publisher::{InMemoryEventPublisher, InMemoryPublisherError};
pub use message::{Message, Payload};
pub use metadata::MessageMetadata;
pub use notifier::{AsyncNotifier, InMemoryNotifier, Notifier};
pub use publisher::{AsyncEventPublisher, EventPublisher, Subscription};
