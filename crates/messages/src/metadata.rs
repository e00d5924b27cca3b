use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and creation time of a message.
///
/// Generated at construction unless supplied explicitly (deterministic tests,
/// rehydration from storage).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageMetadata {
    message_id: Uuid,
    created_at: DateTime<Utc>,
}

impl MessageMetadata {
    /// Fresh random (v4) id, stamped with the current UTC time.
    pub fn new() -> Self {
        Self {
            message_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    pub fn from_parts(message_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            message_id,
            created_at,
        }
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for MessageMetadata {
    fn default() -> Self {
        Self::new()
    }
}
