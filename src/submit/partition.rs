//! Splitting sources into fixed-size jobs.

use anyhow::{bail, Result};
use serde::Serialize;

use super::config::SubmitConfig;
use super::table::JobRow;

/// Number of chunks kept per source in debug mode.
pub const DEBUG_CHUNKS: usize = 2;

/// Event count forced on each debug chunk.
pub const DEBUG_EVENTS: u64 = 10;

/// A contiguous event range of one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub start_event: u64,
    pub n_events: u64,
}

/// Split `total_events` into chunks of `chunk_size`, the last one holding
/// the remainder.
pub fn partition(total_events: u64, chunk_size: u64) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        bail!("Chunk size must be positive");
    }

    Ok((0..total_events.div_ceil(chunk_size))
        .map(|index| {
            let start_event = index * chunk_size;
            Chunk {
                index,
                start_event,
                n_events: chunk_size.min(total_events - start_event),
            }
        })
        .collect())
}

/// Per-job variables expanded into the submit template.
///
/// Field names are the macro names used in the job arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemData {
    pub input_file_name: String,
    pub subjob: String,
    pub start_event: String,
    #[serde(rename = "nEvents")]
    pub n_events: String,
    pub seed: String,
    pub extra_fs_args: String,
}

impl ItemData {
    /// Macro names, in the order [`ItemData::values`] returns them.
    pub const NAMES: [&'static str; 6] = [
        "input_file_name",
        "subjob",
        "start_event",
        "nEvents",
        "seed",
        "extra_fs_args",
    ];

    pub fn values(&self) -> [&str; 6] {
        [
            &self.input_file_name,
            &self.subjob,
            &self.start_event,
            &self.n_events,
            &self.seed,
            &self.extra_fs_args,
        ]
    }

    fn for_chunk(row: &JobRow, chunk: &Chunk, extra_fs_args: &str) -> Self {
        ItemData {
            input_file_name: row.path.clone(),
            subjob: chunk.index.to_string(),
            start_event: chunk.start_event.to_string(),
            n_events: chunk.n_events.to_string(),
            seed: chunk.index.to_string(),
            extra_fs_args: extra_fs_args.to_string(),
        }
    }
}

/// Build the job variables for every chunk of one source.
///
/// The seed of each job is its chunk index. In debug mode only the first
/// [`DEBUG_CHUNKS`] chunks are kept and each runs [`DEBUG_EVENTS`] events.
pub fn build_item_data(
    row: &JobRow,
    config: &SubmitConfig,
    debug: bool,
) -> Result<Vec<ItemData>> {
    let mut chunks = partition(row.n_events, config.events_per_job)?;
    if debug {
        chunks.truncate(DEBUG_CHUNKS);
        for chunk in &mut chunks {
            chunk.n_events = DEBUG_EVENTS;
        }
    }

    Ok(chunks
        .iter()
        .map(|chunk| ItemData::for_chunk(row, chunk, &config.extra_fs_args))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n_events: u64) -> JobRow {
        JobRow {
            path: "/data/muons.root".to_string(),
            n_events,
            id: "3".to_string(),
        }
    }

    fn config() -> SubmitConfig {
        SubmitConfig {
            extra_fs_args: "--forward -f 16".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_with_remainder() {
        let chunks = partition(2_500_000, 1_000_000).unwrap();
        let sizes: Vec<u64> = chunks.iter().map(|c| c.n_events).collect();
        let starts: Vec<u64> = chunks.iter().map(|c| c.start_event).collect();
        assert_eq!(sizes, vec![1_000_000, 1_000_000, 500_000]);
        assert_eq!(starts, vec![0, 1_000_000, 2_000_000]);
    }

    #[test]
    fn test_partition_exact_multiple() {
        let chunks = partition(3_000, 1_000).unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.n_events == 1_000));
    }

    #[test]
    fn test_partition_small_and_empty() {
        assert_eq!(
            partition(5, 1_000).unwrap(),
            vec![Chunk {
                index: 0,
                start_event: 0,
                n_events: 5
            }]
        );
        assert!(partition(0, 1_000).unwrap().is_empty());
        assert!(partition(10, 0).is_err());
    }

    #[test]
    fn test_partition_covers_range() {
        for (total, size) in [(1, 1), (7, 3), (999_999, 1_000), (10_000_001, 1_000_000)] {
            let chunks = partition(total, size).unwrap();
            let mut next = 0;
            for chunk in &chunks {
                assert_eq!(chunk.start_event, next);
                assert!(chunk.n_events > 0 && chunk.n_events <= size);
                next += chunk.n_events;
            }
            assert_eq!(next, total);
        }
    }

    #[test]
    fn test_item_data() {
        let items = build_item_data(&row(2_500_000), &config(), false).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[2],
            ItemData {
                input_file_name: "/data/muons.root".to_string(),
                subjob: "2".to_string(),
                start_event: "2000000".to_string(),
                n_events: "500000".to_string(),
                seed: "2".to_string(),
                extra_fs_args: "--forward -f 16".to_string(),
            }
        );
    }

    #[test]
    fn test_debug_truncates() {
        let items = build_item_data(&row(5_500_000), &config(), true).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.n_events == "10"));
        assert_eq!(items[1].start_event, "1000000");
    }

    #[test]
    fn test_debug_with_single_chunk() {
        let items = build_item_data(&row(20), &config(), true).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].n_events, "10");
    }

    #[test]
    fn test_item_data_serializes_macro_names() {
        let items = build_item_data(&row(1), &config(), false).unwrap();
        let json = serde_json::to_value(&items[0]).unwrap();
        let object = json.as_object().unwrap();
        for name in ItemData::NAMES {
            assert!(object.contains_key(name), "missing {name}");
        }
    }
}
