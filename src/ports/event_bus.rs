use std::sync::Arc;

use crate::domain::{EventKind, MessageEvent, MonitorNotice};

/// Handler invoked inline during host event dispatch. Must not block or panic.
pub type MessageHandler = Arc<dyn Fn(&MessageEvent) + Send + Sync>;

/// Identifies one active subscription so it can be released later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Port for the host's publish/subscribe capability.
///
/// The host delivers message events to subscribed handlers and receives
/// monitor notices via `emit`. Emission is fire-and-forget; the monitor
/// never waits on notice delivery.
pub trait EventBus: Send + Sync {
    /// Register a handler for a class of host events
    fn subscribe(&self, kind: EventKind, handler: MessageHandler) -> SubscriptionId;

    /// Release a previously registered handler. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Deliver a monitor notice to the host
    fn emit(&self, notice: MonitorNotice);
}
