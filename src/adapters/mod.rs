pub mod bus;
pub mod transport;

pub use bus::MemoryBus;
pub use transport::{HttpTransport, ScriptedTransport};
