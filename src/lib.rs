//! Heartbeat reporter for push-style monitors such as
//! [Uptime Kuma](https://github.com/louislam/uptime-kuma).
//!
//! A [`Monitor`] periodically pushes an up/down status, an optional message
//! and a rolling latency average to a remote endpoint. Latency is sampled
//! from message events delivered by the embedding host over an injected
//! [`EventBus`]; lifecycle notices flow back to the host over the same bus.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{BoxError, MessageGetter, Monitor, MonitorError, PushError, StatusGetter};
pub use config::MonitorConfig;
pub use domain::{
    EventKind, LatencyWindow, MessageEvent, MonitorNotice, PushParams, PushResponse, PushStatus,
};
pub use ports::{EventBus, MessageHandler, PushTransport, SubscriptionId};
