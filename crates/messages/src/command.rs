use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::message::Message;

/// A command: a request for something to happen.
///
/// Commands represent **intent**. They may be rejected (validation errors); the
/// events an aggregate records while handling one are the facts that resulted.
///
/// ## Command vs Event
///
/// - **Command**: Intent to do something (e.g., "Change role to admin")
/// - **Event**: Fact that something happened (e.g., "UserRoleChanged { new_role: admin }")
pub trait Command: Message {
    fn command_id(&self) -> Uuid {
        self.message_id()
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.created_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageMetadata, Payload};
    use serde_json::json;

    #[derive(Debug, Clone)]
    struct Rename {
        metadata: MessageMetadata,
        name: String,
    }

    impl Message for Rename {
        fn metadata(&self) -> &MessageMetadata {
            &self.metadata
        }

        fn payload(&self) -> Payload {
            let mut payload = Payload::new();
            payload.insert("name".to_string(), json!(self.name));
            payload
        }
    }

    impl Command for Rename {}

    #[test]
    fn command_aliases_follow_metadata() {
        let c = Rename {
            metadata: MessageMetadata::new(),
            name: "new".to_string(),
        };
        assert_eq!(c.command_id(), c.metadata.message_id());
        assert_eq!(c.issued_at(), c.metadata.created_at());
        assert_eq!(c.message_type(), "Rename");
        assert_eq!(c.to_dict()["name"], json!("new"));
    }
}
