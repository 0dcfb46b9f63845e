//! Pipeline Facade
//!
//! Single entry point for configuring and running the anomaly pipeline:
//! - `Storage`, `Loader`, `AlertSink`, `PipelineState` and errors from SPI
//! - `PipelineConfig` and every section it holds from API
//! - Store, loader, sinks, factory and orchestrator from Core

// Re-export everything from SPI
pub use pipeline_spi::*;

// Re-export everything from API
pub use pipeline_api::*;

// Re-export everything from Core
pub use pipeline_core::*;
