//! Message contract shared by events and commands.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use blocks_core::short_type_name;

use crate::metadata::MessageMetadata;

/// Domain-specific fields of a message.
pub type Payload = Map<String, Value>;

/// An immutable, identity-bearing message.
///
/// Implementors supply their metadata and a mapping view of their own fields.
/// Messages are identified by `message_id`: two messages with the same id are
/// the same message even if their payloads differ. Use
/// [`message_identity!`](crate::message_identity) to derive `PartialEq`, `Eq` and
/// `Hash` on that basis.
pub trait Message {
    fn metadata(&self) -> &MessageMetadata;

    fn payload(&self) -> Payload;

    /// Name of the concrete message type.
    fn message_type(&self) -> &'static str {
        short_type_name::<Self>()
    }

    fn message_id(&self) -> Uuid {
        self.metadata().message_id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.metadata().created_at()
    }

    fn same_message_as<O>(&self, other: &O) -> bool
    where
        O: Message + ?Sized,
    {
        self.message_id() == other.message_id()
    }

    /// Flat mapping: `message_id`, `created_at` (RFC 3339, `+00:00`), `message_type`,
    /// then the payload entries.
    ///
    /// Payload keys are inserted last, so a payload key named like one of the three
    /// reserved keys replaces it.
    fn to_dict(&self) -> Payload {
        let mut dict = Payload::new();
        dict.insert(
            "message_id".to_string(),
            Value::String(self.message_id().to_string()),
        );
        dict.insert(
            "created_at".to_string(),
            Value::String(
                self.created_at()
                    .to_rfc3339_opts(SecondsFormat::AutoSi, false),
            ),
        );
        dict.insert(
            "message_type".to_string(),
            Value::String(self.message_type().to_string()),
        );
        dict.extend(self.payload());
        dict
    }
}

/// Implements `PartialEq`, `Eq` and `Hash` for a [`Message`] using only its id.
#[macro_export]
macro_rules! message_identity {
    ($t:ty) => {
        impl ::core::cmp::PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::Message::message_id(self) == $crate::Message::message_id(other)
            }
        }

        impl ::core::cmp::Eq for $t {}

        impl ::core::hash::Hash for $t {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&$crate::Message::message_id(self), state)
            }
        }
    };
}
