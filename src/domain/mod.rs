pub mod event;
pub mod latency;
pub mod push;

pub use event::{EventKind, MessageEvent, MonitorNotice};
pub use latency::{LatencyWindow, WINDOW_CAPACITY};
pub use push::{PushParams, PushResponse, PushStatus};
