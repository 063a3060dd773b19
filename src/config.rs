//! Run configuration for the generator driver.
//!
//! A [`RunConfig`] is built once from the command line and then passed by
//! reference to every stage of the run. Nothing reads options from ambient
//! state.

use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;

/// Neutrino species the driver can select, keyed by PDG code.
pub const NEUTRINO_SPECIES: [(i32, &str); 6] = [
    (12, "nue"),
    (-12, "anue"),
    (14, "numu"),
    (-14, "anumu"),
    (16, "nutau"),
    (-16, "anutau"),
];

/// Look up the short name of a neutrino PDG code.
pub fn species_name(pdg: i32) -> Option<&'static str> {
    NEUTRINO_SPECIES
        .iter()
        .find(|(code, _)| *code == pdg)
        .map(|(_, name)| *name)
}

/// Hard-process selection. Exactly one is active per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessMode {
    #[default]
    MinimumBias,
    Charm,
    Beauty,
    Hard,
    Weak,
}

impl ProcessMode {
    /// Resolve the four command line switches into a single mode.
    ///
    /// Precedence is charm, beauty, hard, weak; with none set the run is
    /// minimum bias.
    pub fn from_switches(charm: bool, beauty: bool, hard: bool, weak: bool) -> Self {
        if charm {
            ProcessMode::Charm
        } else if beauty {
            ProcessMode::Beauty
        } else if hard {
            ProcessMode::Hard
        } else if weak {
            ProcessMode::Weak
        } else {
            ProcessMode::MinimumBias
        }
    }

    /// Base tag used in output names.
    pub fn tag(&self) -> &'static str {
        match self {
            ProcessMode::MinimumBias => "nobias",
            ProcessMode::Charm => "ccbar",
            ProcessMode::Beauty => "bbbar",
            ProcessMode::Hard => "hard",
            ProcessMode::Weak => "weak",
        }
    }

    /// Whether the light-meson decay override applies to this mode.
    pub fn allows_unstable_mesons(&self) -> bool {
        matches!(
            self,
            ProcessMode::Hard | ProcessMode::Weak | ProcessMode::MinimumBias
        )
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Immutable options for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunConfig {
    /// Target neutrino PDG codes, in command line order.
    pub species: Vec<i32>,
    /// Progress report interval handed to the generator.
    pub heartbeat: u64,
    /// Number of events to generate.
    pub n_events: u64,
    /// Identifier of the first event; event ids run from here.
    pub first_event: u64,
    /// Centre-of-mass energy in GeV.
    pub e_cm: f64,
    pub process: ProcessMode,
    /// PDF set, either a built-in index or an `LHAPDF6:<set>` name.
    pub pdf_set: String,
    pub unstable_mesons: bool,
    /// Lower pseudorapidity bound, applied symmetrically to both hemispheres.
    pub eta_min: f64,
    /// Upper pseudorapidity bound. Recorded in the summary only; the
    /// acceptance test does not consult it.
    pub eta_max: f64,
    pub seed: u32,
    pub output_dir: PathBuf,
    /// Keep only the neutrino and its direct mother.
    pub low_info: bool,
    /// Apply the forward beam-remnant tune (minimum bias only).
    pub forward: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            species: Vec::new(),
            heartbeat: 10_000,
            n_events: 1_000_000,
            first_event: 0,
            e_cm: 13_600.0,
            process: ProcessMode::MinimumBias,
            pdf_set: "13".to_string(),
            unstable_mesons: false,
            eta_min: 6.0,
            eta_max: 10.0,
            seed: 0,
            output_dir: PathBuf::from("."),
            low_info: false,
            forward: false,
        }
    }
}

impl RunConfig {
    /// Check the options that cannot be expressed in the argument parser.
    pub fn validate(&self) -> Result<()> {
        if self.species.is_empty() {
            bail!("At least one neutrino flavour must be selected");
        }
        for pdg in &self.species {
            if species_name(*pdg).is_none() {
                bail!("Unsupported neutrino flavour {pdg}, expected one of ±12, ±14, ±16");
            }
        }
        if !self.eta_min.is_finite() {
            bail!("eta_min must be finite, got {}", self.eta_min);
        }
        if self.e_cm.is_nan() || self.e_cm <= 0.0 {
            bail!("Centre-of-mass energy must be positive, got {}", self.e_cm);
        }
        match self.first_event.checked_add(self.n_events) {
            Some(last) if last <= i64::MAX as u64 => {}
            _ => bail!(
                "Event range {} + {} exceeds the largest event id {}",
                self.first_event,
                self.n_events,
                i64::MAX
            ),
        }
        Ok(())
    }

    /// Species names joined with `_`, e.g. `nutau_anutau`.
    pub fn species_names(&self) -> String {
        self.species
            .iter()
            .map(|pdg| species_name(*pdg).unwrap_or("unknown"))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Whether a PDG code is one of the requested species.
    pub fn is_target(&self, pdg: i32) -> bool {
        self.species.contains(&pdg)
    }

    /// Descriptive tag of the active process mode and its modifiers.
    pub fn tag(&self) -> String {
        let mut tag = self.process.tag().to_string();
        if self.unstable_mesons && self.process.allows_unstable_mesons() {
            tag.push_str("unstable_mesons");
        }
        if self.forward && self.process == ProcessMode::MinimumBias {
            tag.push_str("_forward");
        }
        tag
    }

    /// Filesystem-safe base name for the run's output files.
    pub fn output_name(&self) -> String {
        sanitize_tag(&format!(
            "pythia8_{}_PDFpset{}_{}",
            self.tag(),
            self.pdf_set,
            self.species_names()
        ))
    }
}

/// Make a tag usable as a file name component.
///
/// `*` becomes `star`, `->` becomes `to` and `/` is dropped.
pub fn sanitize_tag(raw: &str) -> String {
    raw.replace('*', "star").replace("->", "to").replace('/', "")
}
