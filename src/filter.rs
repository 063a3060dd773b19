//! Candidate selection.

use crate::config::RunConfig;
use crate::generator::{Event, Particle};

/// Pseudorapidity acceptance.
///
/// The bound is applied symmetrically: a particle passes when it is more
/// forward than `eta_min` in either hemisphere. `eta_max` is not consulted.
#[inline]
pub fn passes_eta(eta: f64, eta_min: f64) -> bool {
    eta > eta_min || eta < -eta_min
}

/// Whether a particle is an accepted candidate for this run.
pub fn is_candidate(particle: &Particle, config: &RunConfig) -> bool {
    particle.is_final()
        && config.is_target(particle.pdg)
        && passes_eta(particle.eta(), config.eta_min)
}

/// Indices of all accepted candidates in an event, in record order.
pub fn select_candidates(event: &Event, config: &RunConfig) -> Vec<usize> {
    event
        .entries()
        .filter(|(_, particle)| is_candidate(particle, config))
        .map(|(index, _)| index)
        .collect()
}
