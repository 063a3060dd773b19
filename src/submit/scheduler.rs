//! Handing submit descriptions to a batch scheduler.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{debug, info};

use super::description::SubmitDescription;

/// Matches the summary line `condor_submit` prints on success.
static CLUSTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) job\(s\) submitted to cluster (\d+)\.")
        .expect("Invalid cluster regex pattern")
});

/// Result of submitting one description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Cluster id assigned by the scheduler, if any.
    pub cluster: Option<u64>,
    pub jobs: usize,
    pub submit_file: PathBuf,
}

/// A batch system that accepts submit descriptions.
pub trait Scheduler {
    fn submit(&mut self, description: &SubmitDescription) -> Result<SubmitOutcome>;
}

/// Render `description` to `<dir>/<source_id>.sub`.
pub fn write_submit_file(dir: &Path, description: &SubmitDescription) -> Result<PathBuf> {
    let text = description.render()?;
    let path = dir.join(format!("{}.sub", description.source_id));
    fs::write(&path, text)
        .with_context(|| format!("Failed to write submit file: {}", path.display()))?;
    Ok(path)
}

/// Parse `(jobs, cluster)` from `condor_submit` output.
pub fn parse_cluster_id(output: &str) -> Option<(usize, u64)> {
    let caps = CLUSTER_RE.captures(output)?;
    let jobs = caps[1].parse().ok()?;
    let cluster = caps[2].parse().ok()?;
    Some((jobs, cluster))
}

/// Submits through the `condor_submit` command line tool.
pub struct CondorScheduler {
    /// Directory receiving the rendered submit files.
    submit_dir: PathBuf,
    program: PathBuf,
}

impl CondorScheduler {
    pub fn new(submit_dir: impl Into<PathBuf>) -> Self {
        CondorScheduler {
            submit_dir: submit_dir.into(),
            program: PathBuf::from("condor_submit"),
        }
    }

    /// Use a different submit program, e.g. a wrapper script.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl Scheduler for CondorScheduler {
    fn submit(&mut self, description: &SubmitDescription) -> Result<SubmitOutcome> {
        let submit_file = write_submit_file(&self.submit_dir, description)?;
        debug!("Running {} {}", self.program.display(), submit_file.display());

        let output = Command::new(&self.program)
            .arg(&submit_file)
            .output()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} failed for source {} ({}): {}",
                self.program.display(),
                description.source_id,
                output.status,
                stderr.trim()
            );
        }

        let (jobs, cluster) = match parse_cluster_id(&stdout) {
            Some((jobs, cluster)) => (jobs, Some(cluster)),
            None => (description.job_count(), None),
        };
        info!(
            "Submitted {jobs} job(s) for source {} to cluster {}",
            description.source_id,
            cluster.map_or_else(|| "?".to_string(), |c| c.to_string())
        );

        Ok(SubmitOutcome {
            cluster,
            jobs,
            submit_file,
        })
    }
}

/// Writes submit files without submitting anything.
pub struct DryRunScheduler {
    submit_dir: PathBuf,
}

impl DryRunScheduler {
    pub fn new(submit_dir: impl Into<PathBuf>) -> Self {
        DryRunScheduler {
            submit_dir: submit_dir.into(),
        }
    }
}

impl Scheduler for DryRunScheduler {
    fn submit(&mut self, description: &SubmitDescription) -> Result<SubmitOutcome> {
        let submit_file = write_submit_file(&self.submit_dir, description)?;
        info!(
            "Dry run: {} job(s) for source {} written to {}",
            description.job_count(),
            description.source_id,
            submit_file.display()
        );
        Ok(SubmitOutcome {
            cluster: None,
            jobs: description.job_count(),
            submit_file,
        })
    }
}
