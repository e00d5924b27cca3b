//! Fixture aggregate shared by the adapter tests.

use blocks_core::{AggregateBase, AggregateId, AggregateRoot};
use blocks_messages::{Event, Message, MessageMetadata, Payload};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HandleChanged {
    metadata: MessageMetadata,
    pub handle: String,
}

impl Message for HandleChanged {
    fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("handle".to_string(), Value::String(self.handle.clone()));
        payload
    }
}

impl Event for HandleChanged {}

#[derive(Debug, Clone)]
pub struct Account {
    base: AggregateBase<AggregateId, HandleChanged>,
    handle: String,
}

blocks_core::aggregate_root!(Account, id = AggregateId, event = HandleChanged, base = base);

impl Account {
    pub fn open(handle: &str) -> Self {
        let mut account = Self {
            base: AggregateBase::new(AggregateId::new()),
            handle: String::new(),
        };
        account.change_handle(handle);
        account
    }

    pub fn change_handle(&mut self, handle: &str) {
        self.handle = handle.to_string();
        self.record_event(HandleChanged {
            metadata: MessageMetadata::new(),
            handle: handle.to_string(),
        });
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }
}
