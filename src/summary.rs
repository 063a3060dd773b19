//! End-of-run summary: cross sections and equivalent luminosities.

use std::fs;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::RunConfig;
use crate::generator::ProcessCrossSection;
use crate::parquet::OutputPaths;

/// Inverse femtobarns per inverse millibarn (1 mb = 1e12 fb).
pub const INV_MB_TO_INV_FB: f64 = 1e-12;

/// Neutrino charged-current cross section at 100 GeV used to fold the
/// luminosity, in the same units as the luminosity conversion.
pub const REFERENCE_NU_CC_XSEC: f64 = 4.8e-12;

/// Results of one generation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub name: String,
    pub config: RunConfig,
    pub accepted: usize,
    pub processes: Vec<ProcessCrossSection>,
    pub total_xsec_mb: f64,
    /// Integrated luminosity equivalent to the generated events, fb⁻¹.
    pub int_lumi_fb: f64,
    /// Luminosity folded with the reference neutrino cross section, fb⁻¹.
    pub eff_lumi_fb: f64,
    pub real_time_s: f64,
}

impl RunSummary {
    pub fn new(
        config: &RunConfig,
        accepted: usize,
        processes: Vec<ProcessCrossSection>,
        elapsed: Duration,
    ) -> Result<Self> {
        let total_xsec_mb = total_cross_section(&processes);
        let int_lumi_fb = integrated_luminosity(config.n_events, total_xsec_mb)?;
        Ok(RunSummary {
            name: config.output_name(),
            config: config.clone(),
            accepted,
            processes,
            total_xsec_mb,
            int_lumi_fb,
            eff_lumi_fb: effective_luminosity(int_lumi_fb),
            real_time_s: elapsed.as_secs_f64(),
        })
    }

    /// Write `lumi.txt` and the JSON summary.
    pub fn write(&self, paths: &OutputPaths) -> Result<()> {
        fs::write(&paths.lumi, format!("{}\n", self.int_lumi_fb))
            .with_context(|| format!("Failed to write {}", paths.lumi.display()))?;

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&paths.summary, json)
            .with_context(|| format!("Failed to write {}", paths.summary.display()))?;
        Ok(())
    }

    /// Print the process table and luminosities to stdout.
    pub fn print(&self) {
        for process in &self.processes {
            println!("{:<50} {:>12.5e} mb", process.name, process.sigma_mb);
        }
        println!("{:<50} {:>12.5e} mb", "total", self.total_xsec_mb);
        println!(
            "Saving to output {} neutrino flavour(s) having PDG ID(s) {:?}",
            self.config.species_names(),
            self.config.species
        );
        println!(
            "simulated events = {}, equivalent to integrated luminosity of {:.2e} fb-1. Real time {:.1}s",
            self.config.n_events, self.int_lumi_fb, self.real_time_s
        );
        println!(
            "corresponding to effective luminosity (folded with neutrino CC cross section at 100GeV) of {:.2e} fb-1.",
            self.eff_lumi_fb
        );
        println!("accepted neutrinos = {}", self.accepted);
    }
}

/// Sum of the generated cross sections, in mb.
pub fn total_cross_section(processes: &[ProcessCrossSection]) -> f64 {
    processes.iter().map(|p| p.sigma_mb).sum()
}

/// Luminosity in fb⁻¹ equivalent to `n_events` at `total_xsec_mb`.
pub fn integrated_luminosity(n_events: u64, total_xsec_mb: f64) -> Result<f64> {
    if !total_xsec_mb.is_finite() || total_xsec_mb <= 0.0 {
        bail!("Total cross section must be positive, got {total_xsec_mb} mb");
    }
    Ok(n_events as f64 / total_xsec_mb * INV_MB_TO_INV_FB)
}

pub fn effective_luminosity(int_lumi_fb: f64) -> f64 {
    int_lumi_fb / REFERENCE_NU_CC_XSEC
}
