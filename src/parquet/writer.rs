//! Streaming Parquet writer for ancestry rows.
//!
//! Rows are buffered and written as a row group whenever the batch size is
//! reached, so memory use stays bounded however many neutrinos a run finds.
//!
//! # Thread Safety
//!
//! `StreamingParquetWriter` is NOT thread-safe. Use from a single thread.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    ArrayRef, Float64Builder, Int32Builder, Int64Builder, ListArray, RecordBatch, StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::Schema;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::record::RecordCollector;
use crate::table::{self, AncestryRecord, ParticleSnapshot};

/// Default batch size for streaming writes.
const DEFAULT_BATCH_SIZE: usize = 100_000;

/// A streaming Parquet writer that implements `RecordCollector`.
///
/// Each flush writes a new row group to the file, preserving all previously
/// written data. The file is created on the first flush; a run without any
/// accepted candidate still produces a valid, empty table on `finish`.
pub struct StreamingParquetWriter {
    path: PathBuf,
    batch_size: usize,
    writer_props: WriterProperties,
    schema: Arc<Schema>,
    records: Vec<AncestryRecord>,
    writer: Option<ArrowWriter<File>>,
    total_records: usize,
}

impl StreamingParquetWriter {
    /// Create a writer for the table at `path`.
    ///
    /// The parent directory must already exist.
    pub fn new(path: &Path) -> Result<Self> {
        Self::with_batch_size(path, DEFAULT_BATCH_SIZE)
    }

    /// Create a writer with a custom batch size.
    pub fn with_batch_size(path: &Path, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            anyhow::bail!("Batch size must be positive");
        }

        let writer_props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(Default::default()))
            .set_max_row_group_size(1_000_000)
            .build();

        Ok(Self {
            path: path.to_path_buf(),
            batch_size,
            writer_props,
            schema: table::ancestry_schema(),
            records: Vec::new(),
            writer: None,
            total_records: 0,
        })
    }

    /// Path of the table being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_or_create_writer(&mut self) -> Result<&mut ArrowWriter<File>> {
        if self.writer.is_none() {
            let file = File::create(&self.path)
                .with_context(|| format!("Failed to create file: {}", self.path.display()))?;
            let writer = ArrowWriter::try_new(
                file,
                self.schema.clone(),
                Some(self.writer_props.clone()),
            )
            .with_context(|| {
                format!("Failed to create Parquet writer for: {}", self.path.display())
            })?;
            self.writer = Some(writer);
        }
        self.writer
            .as_mut()
            .context("Parquet writer missing after creation")
    }

    fn flush_records(&mut self) -> Result<()> {
        if self.records.is_empty() {
            return Ok(());
        }

        let batch = build_ancestry_batch(&self.records, &self.schema)?;
        let writer = self.get_or_create_writer()?;
        writer.write(&batch)?;
        self.records.clear();
        Ok(())
    }
}

impl RecordCollector for StreamingParquetWriter {
    fn add_ancestry(&mut self, record: AncestryRecord) -> Result<()> {
        if self.records.is_empty() {
            self.records.reserve(self.batch_size.min(DEFAULT_BATCH_SIZE));
        }
        self.records.push(record);
        self.total_records += 1;
        if self.records.len() >= self.batch_size {
            self.flush_records()?;
        }
        Ok(())
    }

    fn rows(&self) -> usize {
        self.total_records
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_records()
    }

    fn finish(mut self) -> Result<()> {
        self.flush_records()?;
        // Empty runs still get a file carrying the schema
        self.get_or_create_writer()?;
        if let Some(writer) = self.writer.take() {
            writer
                .close()
                .with_context(|| format!("Failed to close {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Column builders for the fields of [`ParticleSnapshot`].
struct ParticleColumns {
    pdg: Int32Builder,
    status: Int32Builder,
    mother1: Int32Builder,
    mother2: Int32Builder,
    daughter1: Int32Builder,
    daughter2: Int32Builder,
    px: Float64Builder,
    py: Float64Builder,
    pz: Float64Builder,
    e: Float64Builder,
    x: Float64Builder,
    y: Float64Builder,
    z: Float64Builder,
    t: Float64Builder,
}

impl ParticleColumns {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            pdg: Int32Builder::with_capacity(capacity),
            status: Int32Builder::with_capacity(capacity),
            mother1: Int32Builder::with_capacity(capacity),
            mother2: Int32Builder::with_capacity(capacity),
            daughter1: Int32Builder::with_capacity(capacity),
            daughter2: Int32Builder::with_capacity(capacity),
            px: Float64Builder::with_capacity(capacity),
            py: Float64Builder::with_capacity(capacity),
            pz: Float64Builder::with_capacity(capacity),
            e: Float64Builder::with_capacity(capacity),
            x: Float64Builder::with_capacity(capacity),
            y: Float64Builder::with_capacity(capacity),
            z: Float64Builder::with_capacity(capacity),
            t: Float64Builder::with_capacity(capacity),
        }
    }

    fn append(&mut self, p: &ParticleSnapshot) {
        self.pdg.append_value(p.pdg);
        self.status.append_value(p.status);
        self.mother1.append_value(p.mother1);
        self.mother2.append_value(p.mother2);
        self.daughter1.append_value(p.daughter1);
        self.daughter2.append_value(p.daughter2);
        self.px.append_value(p.px);
        self.py.append_value(p.py);
        self.pz.append_value(p.pz);
        self.e.append_value(p.e);
        self.x.append_value(p.x);
        self.y.append_value(p.y);
        self.z.append_value(p.z);
        self.t.append_value(p.t);
    }

    /// Arrays in the order of [`table::particle_fields`].
    fn finish(mut self) -> Vec<ArrayRef> {
        vec![
            Arc::new(self.pdg.finish()),
            Arc::new(self.status.finish()),
            Arc::new(self.mother1.finish()),
            Arc::new(self.mother2.finish()),
            Arc::new(self.daughter1.finish()),
            Arc::new(self.daughter2.finish()),
            Arc::new(self.px.finish()),
            Arc::new(self.py.finish()),
            Arc::new(self.pz.finish()),
            Arc::new(self.e.finish()),
            Arc::new(self.x.finish()),
            Arc::new(self.y.finish()),
            Arc::new(self.z.finish()),
            Arc::new(self.t.finish()),
        ]
    }
}

fn build_ancestry_batch(records: &[AncestryRecord], schema: &Arc<Schema>) -> Result<RecordBatch> {
    let n_particles: usize = records.iter().map(|r| r.ancestry.len()).sum();
    let mut particles = ParticleColumns::with_capacity(n_particles);
    let mut evt_id_builder = Int64Builder::with_capacity(records.len());

    for record in records {
        for particle in &record.ancestry {
            particles.append(particle);
        }
        evt_id_builder.append_value(record.evt_id);
    }

    let values = StructArray::try_new(table::particle_fields(), particles.finish(), None)?;
    let offsets = OffsetBuffer::<i32>::from_lengths(records.iter().map(|r| r.ancestry.len()));
    let ancestry = ListArray::try_new(
        table::ancestry_item_field(),
        offsets,
        Arc::new(values),
        None,
    )?;

    Ok(RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(ancestry), Arc::new(evt_id_builder.finish())],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parquet::read_ancestry_table;
    use tempfile::TempDir;

    fn record(evt_id: i64, pdgs: &[i32]) -> AncestryRecord {
        AncestryRecord {
            ancestry: pdgs
                .iter()
                .enumerate()
                .map(|(i, pdg)| ParticleSnapshot {
                    pdg: *pdg,
                    status: if i == 0 { 91 } else { -91 },
                    mother1: (i as i32) + 3,
                    pz: 100.0 / (i as f64 + 1.0),
                    e: 100.0,
                    z: -0.5 * i as f64,
                    ..Default::default()
                })
                .collect(),
            evt_id,
        }
    }

    #[test]
    fn test_write_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nu.parquet");

        let records = vec![
            record(3, &[16, -15, 431, 4, 2212]),
            record(3, &[-16, 431]),
            record(9, &[12]),
        ];

        let mut writer = StreamingParquetWriter::new(&path).unwrap();
        for r in &records {
            writer.add_ancestry(r.clone()).unwrap();
        }
        assert_eq!(writer.rows(), 3);
        writer.finish().unwrap();

        assert_eq!(read_ancestry_table(&path).unwrap(), records);
    }

    #[test]
    fn test_multiple_row_groups() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nu.parquet");

        let mut writer = StreamingParquetWriter::with_batch_size(&path, 2).unwrap();
        for evt_id in 0..5 {
            writer.add_ancestry(record(evt_id, &[14, 211])).unwrap();
        }
        writer.finish().unwrap();

        let read = read_ancestry_table(&path).unwrap();
        let ids: Vec<i64> = read.iter().map(|r| r.evt_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_run_writes_schema() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.parquet");

        let writer = StreamingParquetWriter::new(&path).unwrap();
        writer.finish().unwrap();

        assert!(path.exists());
        assert!(read_ancestry_table(&path).unwrap().is_empty());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(StreamingParquetWriter::with_batch_size(&tmp.path().join("x.parquet"), 0).is_err());
    }
}
