//! Event generator interface.
//!
//! The physics lives in an external generator. This module defines the seam
//! the driver talks through: string directives to configure it, a step call
//! to produce the next event, and access to the event record and the
//! generated cross sections.

pub mod directives;
pub mod event;
pub mod replay;

pub use directives::{build_directives, Directive};
pub use event::{Event, Particle, ProcessCrossSection};
pub use replay::ReplayGenerator;

use anyhow::{Context, Result};

/// A configurable proton-proton event generator.
pub trait Generator {
    /// Apply one `key = value` setting. Settings are only accepted before
    /// [`Generator::initialize`].
    fn configure(&mut self, directive: &Directive) -> Result<()>;

    /// Finish configuration and prepare for event generation.
    fn initialize(&mut self) -> Result<()>;

    /// Produce the next event.
    ///
    /// Returns `Ok(false)` when the generator could not produce an event.
    fn advance_event(&mut self) -> Result<bool>;

    /// The most recently produced event.
    fn event(&self) -> &Event;

    /// Cross sections of the hard processes generated so far.
    fn cross_sections(&self) -> Vec<ProcessCrossSection>;

    /// Emit the generator's own end-of-run statistics.
    fn report_statistics(&self) {}
}

/// Apply every directive in order, stopping at the first rejected one.
pub fn configure_all<G: Generator + ?Sized>(
    generator: &mut G,
    directives: &[Directive],
) -> Result<()> {
    for directive in directives {
        generator
            .configure(directive)
            .with_context(|| format!("Generator rejected directive '{directive}'"))?;
    }
    Ok(())
}
