pub mod autopush;
pub mod monitor;
mod sampler;

pub use monitor::{BoxError, MessageGetter, Monitor, MonitorError, PushError, StatusGetter};
