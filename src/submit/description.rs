//! Cluster submit descriptions.
//!
//! One [`SubmitDescription`] covers one source row: a shared job template
//! plus one [`ItemData`] per chunk. Rendering produces HTCondor submit
//! language with a `queue ... from` item list, so the scheduler expands it
//! into one job per chunk.

use std::fmt::Write as _;

use anyhow::{bail, Result};

use super::config::SubmitConfig;
use super::partition::ItemData;

/// Ordered submit attributes shared by all jobs of one source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobTemplate {
    attributes: Vec<(String, String)>,
}

impl JobTemplate {
    /// Template for the jobs of source `id`.
    ///
    /// Logs go to `<log_dir>/<run_tag>/`, job outputs to
    /// `<output_dir>/<run_tag>/<id>/<subjob>`.
    pub fn for_source(config: &SubmitConfig, id: &str) -> Self {
        let run_tag = &config.run_tag;
        let log_dir = config.run_log_dir();
        let log_path = |prefix: &str, ext: &str| {
            log_dir
                .join(format!("{prefix}-{id}-{run_tag}-$(ProcId).{ext}"))
                .display()
                .to_string()
        };
        let out_dir = config.output_dir.join(run_tag).join(id);

        let arguments = format!(
            "{} {} $(input_file_name) $(start_event) $(nEvents) $(seed) $(extra_fs_args)",
            config.path_to_env.display(),
            config.path_to_fs.display()
        );

        let attributes = vec![
            ("executable", config.executable.clone()),
            ("arguments", arguments),
            ("output", log_path("fs", "out")),
            ("error", log_path("fs", "err")),
            ("log", log_path("cat", "log")),
            ("should_transfer_files", "NO".to_string()),
            ("request_cpus", config.request_cpus.to_string()),
            ("MY.SendCredential", "True".to_string()),
            (
                "environment",
                format!("\"out_dir={}/$(subjob)\"", out_dir.display()),
            ),
            ("request_memory", config.request_memory.clone()),
            ("request_disk", config.request_disk.clone()),
            ("+JobFlavour", format!("\"{}\"", config.job_flavour)),
            ("+MaxRuntime", config.max_runtime.to_string()),
        ];

        JobTemplate {
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Everything needed to submit the jobs of one source row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitDescription {
    /// Source identifier from the job table.
    pub source_id: String,
    pub template: JobTemplate,
    pub items: Vec<ItemData>,
}

impl SubmitDescription {
    pub fn new(source_id: impl Into<String>, template: JobTemplate, items: Vec<ItemData>) -> Self {
        SubmitDescription {
            source_id: source_id.into(),
            template,
            items,
        }
    }

    /// Number of jobs this description expands to.
    pub fn job_count(&self) -> usize {
        self.items.len()
    }

    /// Render as a submit file.
    ///
    /// Item values are separated by commas. The last variable takes the rest
    /// of its line, so only `extra_fs_args` may contain spaces.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        for (key, value) in self.template.attributes() {
            if value.contains('\n') {
                bail!("Submit attribute '{key}' spans multiple lines");
            }
            writeln!(out, "{key} = {value}")?;
        }

        writeln!(out)?;
        writeln!(out, "queue {} from (", ItemData::NAMES.join(","))?;
        for item in &self.items {
            let values = item.values();
            let (fixed, last) = (&values[..5], values[5]);
            for (name, value) in ItemData::NAMES.iter().zip(fixed) {
                if value.is_empty() || value.contains([',', ' ', '\t', '\n', '"']) {
                    bail!(
                        "Item value '{value}' for '{name}' of source {} cannot be used in a queue list",
                        self.source_id
                    );
                }
            }
            if last.contains('\n') {
                bail!("extra_fs_args must be a single line");
            }
            writeln!(out, "  {}, {}", fixed.join(", "), last)?;
        }
        writeln!(out, ")")?;
        Ok(out)
    }
}
