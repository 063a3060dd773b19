//! Job table input.
//!
//! The table is a headerless CSV with one source per line:
//!
//! ```text
//! /eos/sources/muons_0.root, 2500000, 0
//! /eos/sources/muons_1.root, 1000000, 1
//! ```
//!
//! Lines starting with `#` are ignored.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

/// One source to be split into jobs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct JobRow {
    pub path: String,
    #[serde(rename = "nEvents")]
    pub n_events: u64,
    pub id: String,
}

/// Read a job table file.
pub fn read_job_table(path: &Path) -> Result<Vec<JobRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open job table: {}", path.display()))?;
    parse_job_table(file).with_context(|| format!("Invalid job table: {}", path.display()))
}

/// Parse job table rows from any reader.
pub fn parse_job_table<R: Read>(reader: R) -> Result<Vec<JobRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<JobRow>().enumerate() {
        rows.push(record.with_context(|| format!("Bad job table row {}", line + 1))?);
    }
    Ok(rows)
}
