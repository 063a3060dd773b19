//! Ancestry reconstruction for accepted candidates.
//!
//! A chain starts with the candidate and follows the first-mother link back
//! through the event record until it reaches an entry without a mother.
//! Only `mother1` is followed, so the chain is a single path and never
//! branches.

use anyhow::{bail, Result};

use crate::generator::Event;
use crate::table::ParticleSnapshot;

/// Build the ancestry chain of the particle at `candidate`.
///
/// Position 0 is the candidate, followed by mother, grandmother and so on.
/// Mother index 0 ends the walk and is never emitted. With `low_info` the
/// walk stops after the first mother.
pub fn walk(event: &Event, candidate: usize, low_info: bool) -> Result<Vec<ParticleSnapshot>> {
    let mut chain = Vec::new();
    walk_into(event, candidate, low_info, &mut chain)?;
    Ok(chain)
}

/// Same as [`walk`], reusing `chain` as the buffer.
///
/// The buffer is cleared first.
pub fn walk_into(
    event: &Event,
    candidate: usize,
    low_info: bool,
    chain: &mut Vec<ParticleSnapshot>,
) -> Result<()> {
    chain.clear();

    let Some(particle) = event.get(candidate) else {
        bail!(
            "Candidate index {candidate} out of range for event of {} entries",
            event.len()
        );
    };
    chain.push(ParticleSnapshot::from(particle));

    let mut mother = particle.mother1;
    while mother != 0 {
        // A path through an acyclic record visits each entry at most once
        if chain.len() > event.len() {
            bail!("Mother chain of entry {candidate} does not terminate, the event record has a cycle");
        }

        let Some(ancestor) = usize::try_from(mother).ok().and_then(|i| event.get(i)) else {
            bail!(
                "Mother index {mother} in chain of entry {candidate} out of range for event of {} entries",
                event.len()
            );
        };
        chain.push(ParticleSnapshot::from(ancestor));

        if low_info {
            break;
        }
        mother = ancestor.mother1;
    }

    Ok(())
}
