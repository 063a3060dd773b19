//! Record collection for accepted candidates.
//!
//! The driver hands every ancestry row to a [`RecordCollector`]; where the
//! rows end up is up to the implementation.

pub mod collector;

pub use collector::{InMemoryCollector, RecordCollector};
