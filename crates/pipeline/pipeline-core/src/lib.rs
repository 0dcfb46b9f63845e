//! Pipeline Core
//!
//! Loader, in-memory event store, alert sinks, the config-driven factory and
//! the run orchestrator.

pub mod factory;
mod loader;
mod orchestrator;
pub mod sinks;
mod store;

pub use factory::{build_pipeline, BuiltPipeline};
pub use loader::DatasetLoader;
pub use orchestrator::PipelineOrchestrator;
pub use sinks::{AlertPayload, MemorySink, StdoutSink};
#[cfg(feature = "webhook")]
pub use sinks::{HttpSink, SlackSink};
pub use store::InMemoryStore;
