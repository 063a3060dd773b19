//! Event loop: generate, select, walk ancestry, record.

use anyhow::{bail, Context, Result};
use tracing::{debug, trace};

use crate::ancestry;
use crate::config::RunConfig;
use crate::filter::select_candidates;
use crate::generator::{build_directives, configure_all, Generator};
use crate::record::RecordCollector;
use crate::table::AncestryRecord;

/// Counters gathered while running the event loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Events produced by the generator.
    pub events: u64,
    /// Candidates written to the collector.
    pub accepted: usize,
    /// Events with at least one candidate.
    pub events_with_candidates: u64,
}

/// Configure and initialize a generator for this run.
pub fn setup_generator<G: Generator + ?Sized>(
    generator: &mut G,
    config: &RunConfig,
) -> Result<()> {
    let directives = build_directives(config);
    for directive in &directives {
        debug!("{directive}");
    }
    configure_all(generator, &directives)?;
    generator
        .initialize()
        .context("Failed to initialize generator")
}

/// Run the event loop over `[first_event, first_event + n_events)`.
///
/// Every accepted candidate becomes one row tagged with its event id. A
/// failed event is fatal.
pub fn run_events<G, C>(
    generator: &mut G,
    config: &RunConfig,
    collector: &mut C,
) -> Result<LoopStats>
where
    G: Generator + ?Sized,
    C: RecordCollector,
{
    let mut stats = LoopStats::default();
    let mut chain = Vec::new();
    let last = config
        .first_event
        .checked_add(config.n_events)
        .context("Event range overflows the event id")?;

    for n in config.first_event..last {
        if !generator
            .advance_event()
            .with_context(|| format!("Generator error at event {n}"))?
        {
            bail!("Generator failed to produce event {n}");
        }
        stats.events += 1;

        let event = generator.event();
        let candidates = select_candidates(event, config);
        if candidates.is_empty() {
            continue;
        }
        stats.events_with_candidates += 1;

        let evt_id = i64::try_from(n).context("Event id does not fit the evt_id column")?;
        for index in candidates {
            ancestry::walk_into(event, index, config.low_info, &mut chain)
                .with_context(|| format!("Failed to walk ancestry in event {n}"))?;
            let record = AncestryRecord {
                ancestry: chain.clone(),
                evt_id,
            };
            trace!(evt_id, index, depth = record.depth(), "accepted candidate");
            collector.add_ancestry(record)?;
            stats.accepted += 1;
        }
    }

    collector.flush()?;
    Ok(stats)
}
