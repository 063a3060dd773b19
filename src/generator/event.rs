//! Event record model shared by generator backends and the analysis stages.

use serde::{Deserialize, Serialize};

/// Smallest transverse momentum used when computing pseudorapidity, in GeV.
const TINY_PT: f64 = 1e-20;

/// One entry of a generated event.
///
/// Mother and daughter fields are indices into the same [`Event`]; 0 means
/// "none" since entry 0 is the event's system line rather than a particle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Particle {
    pub pdg: i32,
    /// Positive for final-state particles, negative for decayed or
    /// intermediate ones.
    pub status: i32,
    pub mother1: i32,
    pub mother2: i32,
    pub daughter1: i32,
    pub daughter2: i32,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
    /// Production vertex, mm.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Production time, mm/c.
    pub t: f64,
}

impl Particle {
    pub fn is_final(&self) -> bool {
        self.status > 0
    }

    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    pub fn p_abs(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Pseudorapidity, signed by the longitudinal momentum.
    ///
    /// Particles along the beam axis get a large finite value instead of
    /// infinity.
    pub fn eta(&self) -> f64 {
        let eta = ((self.p_abs() + self.pz.abs()) / self.pt().max(TINY_PT)).ln();
        if self.pz > 0.0 {
            eta
        } else {
            -eta
        }
    }
}

/// A fully generated event.
///
/// Entry 0 describes the event as a whole and is never a scan candidate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub particles: Vec<Particle>,
}

impl Event {
    pub fn new(particles: Vec<Particle>) -> Self {
        Event { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Real particles with their indices, skipping the system entry.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Particle)> {
        self.particles.iter().enumerate().skip(1)
    }
}

/// Generated cross section of one hard process, in mb.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessCrossSection {
    pub code: i32,
    pub name: String,
    pub sigma_mb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_momentum(px: f64, py: f64, pz: f64) -> Particle {
        Particle {
            px,
            py,
            pz,
            e: (px * px + py * py + pz * pz).sqrt(),
            ..Default::default()
        }
    }

    #[test]
    fn test_eta_transverse_is_zero() {
        let p = with_momentum(1.0, 0.0, 0.0);
        assert!(p.eta().abs() < 1e-12);
    }

    #[test]
    fn test_eta_sign_follows_pz() {
        let forward = with_momentum(0.1, 0.0, 100.0);
        let backward = with_momentum(0.1, 0.0, -100.0);
        assert!(forward.eta() > 7.0);
        assert!((forward.eta() + backward.eta()).abs() < 1e-9);
    }

    #[test]
    fn test_eta_known_value() {
        // theta = 45 degrees gives eta = -ln(tan(pi/8))
        let p = with_momentum(1.0, 0.0, 1.0);
        let expected = -(std::f64::consts::PI / 8.0).tan().ln();
        assert!((p.eta() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_eta_along_beam_is_finite() {
        let p = with_momentum(0.0, 0.0, 50.0);
        assert!(p.eta().is_finite());
        assert!(p.eta() > 20.0);
    }

    #[test]
    fn test_entries_skip_system_line() {
        let event = Event::new(vec![Particle::default(), Particle::default()]);
        let indices: Vec<usize> = event.entries().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_particle_deserialize_defaults() {
        let p: Particle = serde_json::from_str(r#"{"pdg": 16, "status": 1, "pz": 3.0}"#)
            .expect("Failed to parse particle");
        assert_eq!(p.pdg, 16);
        assert_eq!(p.mother1, 0);
        assert!(p.is_final());
    }
}
