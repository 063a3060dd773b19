//! nuflux library - shared modules for the `nuflux` and `nuflux-submit` binaries.
//!
//! The `nuflux` driver runs an event generator, keeps the final-state
//! neutrinos inside a pseudorapidity window and records the first-mother
//! ancestry of each one in a Parquet table. `nuflux-submit` splits large
//! sources into cluster jobs that each run the driver on a slice.
//!
//! # Modules
//!
//! - [`config`] - Run options, process modes and output naming
//! - [`generator`] - Generator interface, directives and the replay backend
//! - [`filter`] - Candidate selection
//! - [`ancestry`] - First-mother chain walk
//! - [`table`] - Row types and the Arrow schema of the ancestry table
//! - [`record`] - Sinks for accepted rows
//! - [`parquet`] - Parquet writer, reader and output paths
//! - [`summary`] - Cross sections and luminosity
//! - [`driver`] - The event loop
//! - [`submit`] - Job partitioning and batch submission
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use nuflux::{driver, RecordCollector, ReplayGenerator, RunConfig, StreamingParquetWriter};
//!
//! let config = RunConfig {
//!     species: vec![14, -14],
//!     n_events: 1000,
//!     ..Default::default()
//! };
//! let mut generator = ReplayGenerator::open(Path::new("events.jsonl"))?;
//! driver::setup_generator(&mut generator, &config)?;
//!
//! let mut writer = StreamingParquetWriter::new(Path::new("run.parquet"))?;
//! let stats = driver::run_events(&mut generator, &config, &mut writer)?;
//! writer.finish()?;
//! println!("{} neutrinos accepted", stats.accepted);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod ancestry;
pub mod config;
pub mod driver;
pub mod filter;
pub mod generator;
pub mod logging;
pub mod parquet;
pub mod record;
pub mod submit;
pub mod summary;
pub mod table;

pub use config::{ProcessMode, RunConfig};
pub use generator::{Generator, ReplayGenerator};
pub use parquet::{read_ancestry_table, OutputPaths, StreamingParquetWriter};
pub use record::RecordCollector;
pub use summary::RunSummary;
pub use table::AncestryRecord;
