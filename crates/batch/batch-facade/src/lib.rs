//! Record Batch Facade
//!
//! Unified re-exports for the record batch module:
//! - `RecordBatch`, `EventRecord` and the source contracts from SPI
//! - Source and quality configuration from API
//! - Synthetic, replay and quality implementations from Core

pub use batch_spi::*;

pub use batch_api::*;

pub use batch_core::*;
