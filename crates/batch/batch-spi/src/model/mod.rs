//! Data models for record batches.
//!
//! This module contains the event row, the immutable batch wrapping it and
//! the column vocabulary used by quality configuration.

mod column;
mod event_record;
mod record_batch;

pub use column::Column;
pub use event_record::{EventRecord, HIGH_CALLDATA_THRESHOLD};
pub use record_batch::RecordBatch;
