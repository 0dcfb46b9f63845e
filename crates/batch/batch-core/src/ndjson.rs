//! Newline-delimited JSON replay source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use batch_api::FileSourceConfig;
use batch_spi::{BatchError, BatchSource, EventRecord, RecordBatch, Result};
use tracing::info;

/// Replays a recorded event stream, one JSON object per line.
#[derive(Debug, Clone)]
pub struct NdjsonSource {
    path: PathBuf,
    batch_size: usize,
}

impl NdjsonSource {
    /// Create a source over `path`; the file must exist.
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Result<Self> {
        let path = path.into();
        if batch_size == 0 {
            return Err(BatchError::InvalidParameter {
                name: "batch_size".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if !path.exists() {
            return Err(BatchError::SourceNotFound(path.display().to_string()));
        }
        Ok(Self { path, batch_size })
    }

    /// Create from configuration.
    pub fn from_config(config: &FileSourceConfig) -> Result<Self> {
        Self::new(config.path.clone(), config.batch_size)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the file as a single batch.
    pub fn read_all(&self) -> Result<RecordBatch> {
        let batches = self.read_batches()?;
        Ok(RecordBatch::concat(batches))
    }

    fn read_batches(&self) -> Result<Vec<RecordBatch>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut batches = Vec::new();
        let mut current: Vec<EventRecord> = Vec::with_capacity(self.batch_size);

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: EventRecord =
                serde_json::from_str(&line).map_err(|e| BatchError::Parse {
                    line: idx + 1,
                    reason: e.to_string(),
                })?;
            current.push(record);
            if current.len() >= self.batch_size {
                batches.push(self.emit(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            batches.push(self.emit(current));
        }
        Ok(batches)
    }

    fn emit(&self, rows: Vec<EventRecord>) -> RecordBatch {
        info!(rows = rows.len(), path = %self.path.display(), "replay source emitted batch");
        RecordBatch::new(rows)
    }
}

impl BatchSource for NdjsonSource {
    fn name(&self) -> &str {
        "ndjson"
    }

    fn batches(&mut self) -> Result<Vec<RecordBatch>> {
        self.read_batches()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row(minute: u32, tx: &str) -> String {
        format!(
            r#"{{"event_time":"2024-01-01T00:0{minute}:00Z","entity_id":{minute},"chain_id":1,"block_number":10,"contract_address":"0x1","tx_hash":"{tx}","value":1.5,"attribute":0.2,"gas_used":21000,"calldata_size":64}}"#
        )
    }

    fn write_file(lines: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn test_reads_batches_and_skips_blank_lines() {
        let lines = vec![
            row(1, "0xa"),
            row(2, "0xb"),
            String::new(),
            row(3, "0xc"),
            row(4, "0xd"),
            "   ".to_string(),
            row(5, "0xe"),
        ];
        let file = write_file(&lines);
        let mut source = NdjsonSource::new(file.path(), 2).unwrap();

        let batches = source.batches().unwrap();

        let sizes: Vec<usize> = batches.iter().map(RecordBatch::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(batches.iter().map(RecordBatch::len).sum::<usize>(), 5);
    }

    #[test]
    fn test_missing_file() {
        let err = NdjsonSource::new("/definitely/not/here.ndjson", 10).unwrap_err();
        assert!(matches!(err, BatchError::SourceNotFound(_)));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let lines = vec![row(1, "0xa"), "{not json".to_string()];
        let file = write_file(&lines);
        let mut source = NdjsonSource::new(file.path(), 10).unwrap();

        let err = source.batches().unwrap_err();
        assert!(matches!(err, BatchError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_read_all_concatenates() {
        let lines = vec![row(1, "0xa"), row(2, "0xb"), row(3, "0xc")];
        let file = write_file(&lines);
        let source = NdjsonSource::new(file.path(), 1).unwrap();
        assert_eq!(source.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_null_tx_hash_is_dropped_by_quality_checker() {
        use crate::ColumnQualityChecker;
        use batch_spi::{Column, QualityChecker};

        let lines = vec![
            row(1, "0xa"),
            r#"{"event_time":"2024-01-01T00:02:00Z","entity_id":2,"chain_id":1,"block_number":10,"contract_address":"0x1","tx_hash":null,"value":1.5,"attribute":0.2,"gas_used":21000,"calldata_size":64}"#.to_string(),
        ];
        let file = write_file(&lines);
        let mut source = NdjsonSource::new(file.path(), 10).unwrap();

        let batches = source.batches().unwrap();
        assert_eq!(batches[0].len(), 2);

        let checker = ColumnQualityChecker::new(vec![Column::TxHash], vec![]);
        let cleaned = checker.validate(&batches[0]).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.records()[0].tx_hash, "0xa");
    }
}
