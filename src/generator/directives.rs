//! Translation of a run configuration into generator directives.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error, Result};

use crate::config::{ProcessMode, RunConfig};

/// Light mesons that are stable by default and can be allowed to decay.
pub const DECAYABLE_MESONS: [i32; 5] = [211, -211, 130, 321, -321];

/// Proton PDG code, used for both beams.
const PROTON: i32 = 2212;

/// Monash 2013 tune.
const DEFAULT_TUNE: i32 = 14;

/// Beam-remnant parameters of the forward-physics tune.
const FORWARD_TUNE: [(&str, &str); 9] = [
    ("BeamRemnants:dampPopcorn", "0"),
    ("BeamRemnants:hardRemnantBaryon", "on"),
    ("BeamRemnants:aRemnantBaryon", "0.68"),
    ("BeamRemnants:bRemnantBaryon", "1.22"),
    ("BeamRemnants:primordialKTsoft", "0.56"),
    ("BeamRemnants:primordialKThard", "1.8"),
    ("BeamRemnants:halfScaleForKT", "10"),
    ("BeamRemnants:halfMassForKT", "1"),
    ("BeamRemnants:primordialKTremnant", "0.56"),
];

/// A single `key = value` generator setting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub value: String,
}

impl Directive {
    pub fn new(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Directive {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

impl FromStr for Directive {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let Some((key, value)) = line.split_once('=') else {
            bail!("Directive '{line}' is not of the form 'key = value'");
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            bail!("Directive '{line}' has an empty key or value");
        }
        Ok(Directive::new(key, value))
    }
}

/// Build the ordered directive list for a run.
///
/// The tune is set before the PDF, and exactly one process branch is
/// emitted.
pub fn build_directives(config: &RunConfig) -> Vec<Directive> {
    let mut directives = vec![
        Directive::new("Random:setSeed", "on"),
        Directive::new("Random:seed", u64::from(config.seed) + 100),
        Directive::new("Next:numberCount", config.heartbeat),
        Directive::new("Beams:idA", PROTON),
        Directive::new("Beams:idB", PROTON),
        Directive::new("Beams:eCM", config.e_cm),
        Directive::new("Tune:pp", DEFAULT_TUNE),
        Directive::new("PDF:pSet", &config.pdf_set),
    ];

    match config.process {
        ProcessMode::Charm => directives.push(Directive::new("HardQCD:hardccbar", "on")),
        ProcessMode::Beauty => directives.push(Directive::new("HardQCD:hardbbbar", "on")),
        ProcessMode::Hard => {
            directives.push(Directive::new("HardQCD:all", "on"));
            directives.push(Directive::new("PhaseSpace:pTHatMin", "5.0"));
        }
        ProcessMode::Weak => directives.push(Directive::new("WeakBosonExchange:all", "on")),
        ProcessMode::MinimumBias => directives.push(Directive::new("SoftQCD:inelastic", "on")),
    }

    if config.unstable_mesons && config.process.allows_unstable_mesons() {
        directives.extend(
            DECAYABLE_MESONS
                .iter()
                .map(|pdg| Directive::new(format!("{pdg}:mayDecay"), "on")),
        );
    }

    if config.forward && config.process == ProcessMode::MinimumBias {
        directives.extend(
            FORWARD_TUNE
                .iter()
                .map(|(key, value)| Directive::new(*key, value)),
        );
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(directives: &[Directive]) -> Vec<&str> {
        directives.iter().map(|d| d.key.as_str()).collect()
    }

    fn config(process: ProcessMode) -> RunConfig {
        RunConfig {
            species: vec![12],
            process,
            ..Default::default()
        }
    }

    #[test]
    fn test_directive_parse() {
        let d: Directive = "Beams:eCM = 13600".parse().expect("Failed to parse");
        assert_eq!(d, Directive::new("Beams:eCM", 13600));
        assert_eq!(d.to_string(), "Beams:eCM = 13600");

        assert!("Beams:eCM".parse::<Directive>().is_err());
        assert!(" = on".parse::<Directive>().is_err());
    }

    #[test]
    fn test_tune_before_pdf() {
        let directives = build_directives(&config(ProcessMode::MinimumBias));
        let keys = keys(&directives);
        let tune = keys.iter().position(|k| *k == "Tune:pp").unwrap();
        let pdf = keys.iter().position(|k| *k == "PDF:pSet").unwrap();
        assert!(tune < pdf);
    }

    #[test]
    fn test_seed_offset() {
        let cfg = RunConfig {
            seed: 7,
            ..config(ProcessMode::MinimumBias)
        };
        let directives = build_directives(&cfg);
        assert!(directives.contains(&Directive::new("Random:seed", 107)));
    }

    #[test]
    fn test_single_process_branch() {
        let process_keys = [
            "HardQCD:hardccbar",
            "HardQCD:hardbbbar",
            "HardQCD:all",
            "WeakBosonExchange:all",
            "SoftQCD:inelastic",
        ];
        for mode in [
            ProcessMode::MinimumBias,
            ProcessMode::Charm,
            ProcessMode::Beauty,
            ProcessMode::Hard,
            ProcessMode::Weak,
        ] {
            let directives = build_directives(&config(mode));
            let count = keys(&directives)
                .iter()
                .filter(|k| process_keys.contains(k))
                .count();
            assert_eq!(count, 1, "mode {mode} emitted {count} process switches");
        }
    }

    #[test]
    fn test_unstable_mesons_skipped_for_heavy_flavour() {
        let cfg = RunConfig {
            unstable_mesons: true,
            ..config(ProcessMode::Beauty)
        };
        let directives = build_directives(&cfg);
        assert!(!keys(&directives).iter().any(|k| k.ends_with(":mayDecay")));

        let cfg = RunConfig {
            unstable_mesons: true,
            ..config(ProcessMode::Weak)
        };
        let directives = build_directives(&cfg);
        let decays = keys(&directives)
            .iter()
            .filter(|k| k.ends_with(":mayDecay"))
            .count();
        assert_eq!(decays, DECAYABLE_MESONS.len());
    }

    #[test]
    fn test_forward_tune_only_minimum_bias() {
        let cfg = RunConfig {
            forward: true,
            ..config(ProcessMode::Hard)
        };
        assert!(!keys(&build_directives(&cfg))
            .iter()
            .any(|k| k.starts_with("BeamRemnants:")));

        let cfg = RunConfig {
            forward: true,
            ..config(ProcessMode::MinimumBias)
        };
        let directives = build_directives(&cfg);
        assert!(directives.contains(&Directive::new("BeamRemnants:aRemnantBaryon", "0.68")));
        assert_eq!(
            keys(&directives)
                .iter()
                .filter(|k| k.starts_with("BeamRemnants:"))
                .count(),
            FORWARD_TUNE.len()
        );
    }
}
