//! RecordCollector trait for streaming ancestry rows to storage.
//!
//! Implementations can buffer rows and flush them to storage (e.g. Parquet
//! files) when thresholds are reached.

use anyhow::Result;

use crate::table::AncestryRecord;

/// Trait for collecting ancestry rows during a run.
///
/// # Example
///
/// ```ignore
/// let mut collector = StreamingParquetWriter::new(Path::new("run.parquet"))?;
/// collector.add_ancestry(AncestryRecord { ancestry, evt_id: 42 })?;
/// collector.finish()?;
/// ```
pub trait RecordCollector {
    /// Add one ancestry row.
    fn add_ancestry(&mut self, record: AncestryRecord) -> Result<()>;

    /// Number of rows added so far.
    fn rows(&self) -> usize;

    /// Flush any buffered rows to storage.
    fn flush(&mut self) -> Result<()>;

    /// Finish writing and close all files.
    fn finish(self) -> Result<()>;
}

/// A simple in-memory collector that keeps every row.
///
/// Used by tests and by callers that want the rows rather than a file.
#[derive(Default)]
pub struct InMemoryCollector {
    records: Vec<AncestryRecord>,
}

impl InMemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AncestryRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AncestryRecord> {
        self.records
    }
}

impl RecordCollector for InMemoryCollector {
    fn add_ancestry(&mut self, record: AncestryRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }

    fn rows(&self) -> usize {
        self.records.len()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}
