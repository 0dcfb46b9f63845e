//! Loader trait definition.

use crate::error::Result;

/// Moves source rows into storage ahead of a run.
pub trait Loader: Send {
    /// Ingest every available batch, returning the total rows stored.
    fn load(&mut self) -> Result<usize>;
}
