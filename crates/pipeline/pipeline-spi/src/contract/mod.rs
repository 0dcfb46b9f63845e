//! Contract definitions for pipeline collaborators.

mod alert_sink;
mod loader;
mod storage;

pub use alert_sink::AlertSink;
pub use loader::Loader;
pub use storage::Storage;
