use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::domain::{EventKind, MessageEvent, MonitorNotice};
use crate::ports::{EventBus, MessageHandler, SubscriptionId};

/// In-process event bus.
///
/// Suitable for hosts without their own dispatch mechanism and for tests:
/// message events are delivered synchronously to subscribed handlers and
/// every emitted notice is retained for inspection.
pub struct MemoryBus {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, EventKind, MessageHandler)>>,
    notices: RwLock<Vec<MonitorNotice>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: RwLock::new(Vec::new()),
            notices: RwLock::new(Vec::new()),
        }
    }

    /// Dispatch a host event to all handlers subscribed for its kind
    pub fn deliver(&self, kind: EventKind, event: &MessageEvent) {
        let matching: Vec<MessageHandler> = self
            .handlers
            .read()
            .unwrap()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| handler.clone())
            .collect();

        for handler in matching {
            handler(event);
        }
    }

    /// All notices emitted so far, in order
    pub fn notices(&self) -> Vec<MonitorNotice> {
        self.notices.read().unwrap().clone()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().unwrap().len()
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for MemoryBus {
    fn subscribe(&self, kind: EventKind, handler: MessageHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().unwrap().push((id, kind, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers
            .write()
            .unwrap()
            .retain(|(existing, _, _)| *existing != id);
    }

    fn emit(&self, notice: MonitorNotice) {
        self.notices.write().unwrap().push(notice);
    }
}
