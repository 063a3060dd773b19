//! Submission settings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by every job of a submission campaign.
///
/// Loaded from a JSON file; every field is optional and falls back to the
/// default below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Campaign name, used in log and output directory names.
    pub run_tag: String,
    /// Extra driver flags appended to every job, e.g. `--eta-min 7.0 -f 16`.
    pub extra_fs_args: String,
    /// Software checkout the job wrapper runs from.
    pub path_to_fs: PathBuf,
    /// Environment setup script sourced by the job wrapper.
    pub path_to_env: PathBuf,
    pub events_per_job: u64,
    /// Base directory for job outputs.
    pub output_dir: PathBuf,
    /// Base directory for scheduler logs.
    pub log_dir: PathBuf,
    /// Job wrapper script.
    pub executable: String,
    pub request_cpus: u32,
    pub request_memory: String,
    pub request_disk: String,
    pub job_flavour: String,
    /// Wall-clock limit per job, seconds.
    pub max_runtime: u64,
    /// Pause between source rows, seconds.
    pub submit_interval_secs: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        SubmitConfig {
            run_tag: "nuflux".to_string(),
            extra_fs_args: String::new(),
            path_to_fs: PathBuf::from("."),
            path_to_env: PathBuf::from("setUp.sh"),
            events_per_job: 1_000_000,
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
            executable: "start_FS.sh".to_string(),
            request_cpus: 1,
            request_memory: "4096MB".to_string(),
            request_disk: "1024MB".to_string(),
            job_flavour: "tomorrow".to_string(),
            max_runtime: 60 * 60 * 24 * 2,
            submit_interval_secs: 1,
        }
    }
}

impl SubmitConfig {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read submit config: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid submit config: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.events_per_job == 0 {
            bail!("events_per_job must be positive");
        }
        if self.run_tag.is_empty() || self.run_tag.contains('/') {
            bail!("run_tag '{}' must be a non-empty single path component", self.run_tag);
        }
        if self.extra_fs_args.contains('\n') {
            bail!("extra_fs_args must be a single line");
        }
        Ok(())
    }

    /// Directory holding this campaign's scheduler logs.
    pub fn run_log_dir(&self) -> PathBuf {
        self.log_dir.join(&self.run_tag)
    }
}
