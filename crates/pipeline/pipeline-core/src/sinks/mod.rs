//! Alert sink implementations.

mod memory;
mod payload;
mod stdout;
#[cfg(feature = "webhook")]
mod webhook;

pub use memory::MemorySink;
pub use payload::{slack_message, AlertPayload};
pub use stdout::StdoutSink;
#[cfg(feature = "webhook")]
pub use webhook::{HttpSink, SlackSink};
