use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::message::Message;

/// A domain event: something significant that already happened to an aggregate.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **identified** by their message id (deduplication by id, not by content)
/// - recorded on the aggregate and consumed by whatever persists it
pub trait Event: Message {
    fn event_id(&self) -> Uuid {
        self.message_id()
    }

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc> {
        self.created_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageMetadata, Payload};

    #[derive(Debug, Clone)]
    struct Shipped {
        metadata: MessageMetadata,
    }

    impl Message for Shipped {
        fn metadata(&self) -> &MessageMetadata {
            &self.metadata
        }

        fn payload(&self) -> Payload {
            Payload::new()
        }
    }

    impl Event for Shipped {}

    #[test]
    fn event_aliases_follow_metadata() {
        let e = Shipped {
            metadata: MessageMetadata::new(),
        };
        assert_eq!(e.event_id(), e.metadata.message_id());
        assert_eq!(e.occurred_at(), e.metadata.created_at());
    }
}
