use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Message, Payload};

/// Owned, serializable snapshot of a message.
///
/// This is the unit handed to publishers and outboxes: it carries everything
/// `Message::to_dict` exposes, but keeps the metadata typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    message_id: Uuid,
    message_type: String,
    created_at: DateTime<Utc>,
    payload: Payload,
}

impl MessageEnvelope {
    pub fn new(
        message_id: Uuid,
        message_type: impl Into<String>,
        created_at: DateTime<Utc>,
        payload: Payload,
    ) -> Self {
        Self {
            message_id,
            message_type: message_type.into(),
            created_at,
            payload,
        }
    }

    pub fn from_message<M: Message + ?Sized>(message: &M) -> Self {
        Self::new(
            message.message_id(),
            message.message_type(),
            message.created_at(),
            message.payload(),
        )
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageMetadata;
    use serde_json::json;

    #[derive(Debug)]
    struct Archived {
        metadata: MessageMetadata,
        reason: &'static str,
    }

    impl Message for Archived {
        fn metadata(&self) -> &MessageMetadata {
            &self.metadata
        }

        fn payload(&self) -> Payload {
            let mut payload = Payload::new();
            payload.insert("reason".to_string(), json!(self.reason));
            payload
        }
    }

    #[test]
    fn captures_message_identity_and_payload() {
        let msg = Archived {
            metadata: MessageMetadata::new(),
            reason: "duplicate",
        };
        let env = MessageEnvelope::from_message(&msg);
        assert_eq!(env.message_id(), msg.message_id());
        assert_eq!(env.message_type(), "Archived");
        assert_eq!(env.created_at(), msg.created_at());
        assert_eq!(env.payload()["reason"], json!("duplicate"));
    }

    #[test]
    fn serializes_as_flat_record() {
        let msg = Archived {
            metadata: MessageMetadata::new(),
            reason: "stale",
        };
        let value = serde_json::to_value(MessageEnvelope::from_message(&msg)).unwrap();
        assert_eq!(value["message_type"], json!("Archived"));
        assert_eq!(value["payload"]["reason"], json!("stale"));
        let back: MessageEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(back.message_id(), msg.message_id());
    }
}
