//! Dataset loader.

use std::sync::Arc;

use batch_spi::{BatchSource, QualityChecker};
use pipeline_spi::{Loader, Result, Storage};
use tracing::info;

/// Pulls batches from a source, filters them and writes them to storage.
pub struct DatasetLoader {
    source: Box<dyn BatchSource>,
    storage: Arc<dyn Storage>,
    quality_checker: Option<Box<dyn QualityChecker>>,
}

impl DatasetLoader {
    pub fn new(source: Box<dyn BatchSource>, storage: Arc<dyn Storage>) -> Self {
        Self {
            source,
            storage,
            quality_checker: None,
        }
    }

    /// Run every batch through `checker` before ingesting it.
    pub fn with_quality_checker(mut self, checker: Box<dyn QualityChecker>) -> Self {
        self.quality_checker = Some(checker);
        self
    }

    /// Create tables, then ingest every batch. Returns rows written.
    pub fn execute(&mut self) -> Result<usize> {
        self.storage.ensure_schema()?;

        let batches = self.source.batches()?;
        let mut total = 0;
        for (index, batch) in batches.into_iter().enumerate() {
            let batch = match &self.quality_checker {
                Some(checker) => checker.validate(&batch)?,
                None => batch,
            };
            let written = self.storage.ingest_batch(&batch)?;
            info!(source = self.source.name(), batch = index, rows = written, "ingested batch");
            total += written;
        }
        info!(source = self.source.name(), rows = total, "dataset loaded");
        Ok(total)
    }
}

impl Loader for DatasetLoader {
    fn load(&mut self) -> Result<usize> {
        self.execute()
    }
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("source", &self.source.name())
            .field("quality_checker", &self.quality_checker.is_some())
            .finish()
    }
}
