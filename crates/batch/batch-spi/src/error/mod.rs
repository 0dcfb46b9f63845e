//! Error types for record batches.
//!
//! This module contains error types and the Result alias.

mod batch_error;

pub use batch_error::{BatchError, Result};
