//! Splitting large generation campaigns into cluster jobs.
//!
//! A job table lists sources with their event counts. Each source is cut into
//! chunks of `events_per_job`, and all chunks of one source go out as a single
//! submit description so the scheduler expands them into one job each.
//!
//! ```no_run
//! use std::path::Path;
//! use nuflux::submit::{read_job_table, submit_all, DryRunScheduler, SubmitConfig};
//!
//! let config = SubmitConfig::default();
//! let rows = read_job_table(Path::new("jobs.csv"))?;
//! let mut scheduler = DryRunScheduler::new("logs/nuflux");
//! let outcomes = submit_all(&rows, &config, false, &mut scheduler)?;
//! println!("{} submit files written", outcomes.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod description;
pub mod partition;
pub mod scheduler;
pub mod table;

pub use config::SubmitConfig;
pub use description::{JobTemplate, SubmitDescription};
pub use partition::{build_item_data, partition, Chunk, ItemData};
pub use scheduler::{
    parse_cluster_id, write_submit_file, CondorScheduler, DryRunScheduler, Scheduler,
    SubmitOutcome,
};
pub use table::{parse_job_table, read_job_table, JobRow};

use std::fs;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Submit every row of the job table.
///
/// In debug mode only the first row is submitted, with truncated chunks.
/// Rows are spaced by `submit_interval_secs`.
pub fn submit_all<S: Scheduler + ?Sized>(
    rows: &[JobRow],
    config: &SubmitConfig,
    debug: bool,
    scheduler: &mut S,
) -> Result<Vec<SubmitOutcome>> {
    let log_dir = config.run_log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let mut outcomes = Vec::new();
    for (n, row) in rows.iter().enumerate() {
        if n > 0 && config.submit_interval_secs > 0 {
            thread::sleep(Duration::from_secs(config.submit_interval_secs));
        }

        let items = build_item_data(row, config, debug)?;
        if items.is_empty() {
            warn!("Source {} ({}) has no events, skipping", row.id, row.path);
        } else {
            info!(
                "Source {}: {} events in {} job(s)",
                row.id,
                row.n_events,
                items.len()
            );
            let description =
                SubmitDescription::new(&row.id, JobTemplate::for_source(config, &row.id), items);
            let outcome = scheduler
                .submit(&description)
                .with_context(|| format!("Failed to submit source {}", row.id))?;
            outcomes.push(outcome);
        }

        if debug {
            info!("Debug mode: stopping after the first source");
            break;
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingScheduler {
        submitted: Vec<SubmitDescription>,
    }

    impl Scheduler for RecordingScheduler {
        fn submit(&mut self, description: &SubmitDescription) -> Result<SubmitOutcome> {
            self.submitted.push(description.clone());
            Ok(SubmitOutcome {
                cluster: Some(self.submitted.len() as u64),
                jobs: description.job_count(),
                submit_file: PathBuf::from(format!("{}.sub", description.source_id)),
            })
        }
    }

    fn rows() -> Vec<JobRow> {
        [("/data/a.root", 250, "0"), ("/data/b.root", 0, "1"), ("/data/c.root", 100, "2")]
            .into_iter()
            .map(|(path, n_events, id)| JobRow {
                path: path.to_string(),
                n_events,
                id: id.to_string(),
            })
            .collect()
    }

    fn config(tmp: &TempDir) -> SubmitConfig {
        SubmitConfig {
            events_per_job: 100,
            log_dir: tmp.path().join("logs"),
            submit_interval_secs: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_submits_each_source() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        let mut scheduler = RecordingScheduler::default();
        let outcomes = submit_all(&rows(), &cfg, false, &mut scheduler).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].jobs, 3);
        assert_eq!(outcomes[1].jobs, 1);
        let ids: Vec<&str> = scheduler
            .submitted
            .iter()
            .map(|d| d.source_id.as_str())
            .collect();
        assert_eq!(ids, vec!["0", "2"]);
        assert!(cfg.run_log_dir().is_dir());
    }

    #[test]
    fn test_debug_submits_first_source_only() {
        let tmp = TempDir::new().unwrap();
        let mut scheduler = RecordingScheduler::default();
        let outcomes = submit_all(&rows(), &config(&tmp), true, &mut scheduler).unwrap();

        assert_eq!(outcomes.len(), 1);
        let items = &scheduler.submitted[0].items;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.n_events == "10"));
    }
}
