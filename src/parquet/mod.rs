//! Parquet I/O operations.
//!
//! This module provides functionality for writing ancestry rows in Parquet
//! format and reading them back.

pub mod paths;
pub mod reader;
pub mod writer;

pub use paths::{prepare_output_dir, OutputPaths};
pub use reader::read_ancestry_table;
pub use writer::StreamingParquetWriter;
