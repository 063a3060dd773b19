//! Generator backend that replays pre-generated events.
//!
//! The input is a JSON-lines stream. Each line is either a process header
//!
//! ```text
//! {"kind": "process", "code": 101, "name": "non-diffractive", "sigma_mb": 56.4}
//! ```
//!
//! or an event
//!
//! ```text
//! {"kind": "event", "particles": [{"pdg": 90, "status": -11}, ...]}
//! ```
//!
//! Process headers must come before the first event. Blank lines are
//! ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::{Directive, Event, Generator, ProcessCrossSection};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReplayLine {
    Process(ProcessCrossSection),
    Event(Event),
}

/// Replays events from a JSON-lines stream through the [`Generator`] trait.
pub struct ReplayGenerator<R> {
    reader: R,
    line_no: usize,
    settings: Vec<Directive>,
    initialized: bool,
    /// Events to discard during initialization.
    skip: u64,
    /// Progress report interval, from `Next:numberCount`. 0 disables.
    report_every: u64,
    processes: Vec<ProcessCrossSection>,
    seen_event: bool,
    event: Event,
    generated: u64,
    failed: u64,
}

impl ReplayGenerator<BufReader<File>> {
    /// Open a replay file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open replay input: {}", path.display()))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayGenerator<R> {
    pub fn from_reader(reader: R) -> Self {
        ReplayGenerator {
            reader,
            line_no: 0,
            settings: Vec::new(),
            initialized: false,
            skip: 0,
            report_every: 0,
            processes: Vec::new(),
            seen_event: false,
            event: Event::default(),
            generated: 0,
            failed: 0,
        }
    }

    /// Discard the first `count` events of the stream at initialization.
    ///
    /// Sub-jobs covering `[start, start + n)` of one source use this to
    /// read disjoint slices of the same stream.
    pub fn skip_events(mut self, count: u64) -> Self {
        self.skip = count;
        self
    }

    /// Settings accepted so far, in order.
    pub fn settings(&self) -> &[Directive] {
        &self.settings
    }

    /// Current value of a setting, if it was configured.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .rev()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    /// Read lines until the next event, recording process headers on the way.
    fn read_event(&mut self) -> Result<Option<Event>> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("Failed to read replay line {}", self.line_no + 1))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed: ReplayLine = serde_json::from_str(trimmed)
                .with_context(|| format!("Invalid replay line {}", self.line_no))?;
            match parsed {
                ReplayLine::Process(process) => {
                    if self.seen_event {
                        bail!(
                            "Process header '{}' on line {} follows an event",
                            process.name,
                            self.line_no
                        );
                    }
                    self.processes.push(process);
                }
                ReplayLine::Event(event) => {
                    self.seen_event = true;
                    return Ok(Some(event));
                }
            }
        }
    }
}

impl<R: BufRead> Generator for ReplayGenerator<R> {
    fn configure(&mut self, directive: &Directive) -> Result<()> {
        if self.initialized {
            bail!("Cannot apply '{directive}' after initialization");
        }
        self.settings.push(directive.clone());
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            bail!("Generator already initialized");
        }

        if let Some(count) = self.setting("Next:numberCount") {
            self.report_every = count
                .parse()
                .with_context(|| format!("Invalid Next:numberCount '{count}'"))?;
        }

        for skipped in 0..self.skip {
            if self.read_event()?.is_none() {
                bail!(
                    "Replay input ended after {skipped} events, cannot skip to event {}",
                    self.skip
                );
            }
        }

        debug!(
            settings = self.settings.len(),
            skipped = self.skip,
            processes = self.processes.len(),
            "replay generator initialized"
        );
        self.initialized = true;
        Ok(())
    }

    fn advance_event(&mut self) -> Result<bool> {
        if !self.initialized {
            bail!("Generator used before initialization");
        }

        match self.read_event()? {
            Some(event) => {
                self.event = event;
                self.generated += 1;
                if self.report_every > 0 && self.generated % self.report_every == 0 {
                    info!("{} events generated", self.generated);
                }
                Ok(true)
            }
            None => {
                self.failed += 1;
                Ok(false)
            }
        }
    }

    fn event(&self) -> &Event {
        &self.event
    }

    fn cross_sections(&self) -> Vec<ProcessCrossSection> {
        self.processes.clone()
    }

    fn report_statistics(&self) {
        info!(
            generated = self.generated,
            failed = self.failed,
            lines = self.line_no,
            "replay statistics"
        );
    }
}
