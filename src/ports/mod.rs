pub mod event_bus;
pub mod transport;

pub use event_bus::{EventBus, MessageHandler, SubscriptionId};
pub use transport::PushTransport;
