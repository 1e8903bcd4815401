use crate::models::InboundMessage;

use std::sync::{Mutex, PoisonError};

/// Where inbound leave requests wait for the warden.
pub trait RequestStore: Send + Sync {
    fn push(&self, message: InboundMessage);

    /// Everything received so far, oldest first.
    fn pending(&self) -> Vec<InboundMessage>;
}

/// Process-local store; its contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: Mutex<Vec<InboundMessage>>,
}

impl RequestStore for MemoryStore {
    fn push(&self, message: InboundMessage) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    fn pending(&self) -> Vec<InboundMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
