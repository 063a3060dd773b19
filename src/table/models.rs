//! Row structs for the ancestry table.

use serde::Serialize;

use crate::generator::Particle;

/// Copy of one event-record entry as stored in an ancestry chain.
///
/// Note: Cannot derive `Eq` because the kinematics are `f64`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub pdg: i32,
    pub status: i32,
    pub mother1: i32,
    pub mother2: i32,
    pub daughter1: i32,
    pub daughter2: i32,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        ParticleSnapshot {
            pdg: p.pdg,
            status: p.status,
            mother1: p.mother1,
            mother2: p.mother2,
            daughter1: p.daughter1,
            daughter2: p.daughter2,
            px: p.px,
            py: p.py,
            pz: p.pz,
            e: p.e,
            x: p.x,
            y: p.y,
            z: p.z,
            t: p.t,
        }
    }
}

/// One row of the ancestry table.
///
/// # Fields
/// - `ancestry`: The accepted neutrino at position 0, followed by its mother,
///   grandmother and so on along the first-mother link
/// - `evt_id`: Event the neutrino was found in
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AncestryRecord {
    pub ancestry: Vec<ParticleSnapshot>,
    pub evt_id: i64,
}

impl AncestryRecord {
    /// The accepted neutrino itself.
    pub fn candidate(&self) -> Option<&ParticleSnapshot> {
        self.ancestry.first()
    }

    /// Number of ancestors, not counting the neutrino.
    pub fn depth(&self) -> usize {
        self.ancestry.len().saturating_sub(1)
    }
}
