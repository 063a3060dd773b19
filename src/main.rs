use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{info, warn};

use nuflux::config::{ProcessMode, RunConfig};
use nuflux::generator::{build_directives, Generator, ReplayGenerator};
use nuflux::parquet::{prepare_output_dir, OutputPaths, StreamingParquetWriter};
use nuflux::record::RecordCollector;
use nuflux::{driver, logging, RunSummary};

/// Record the ancestry of forward neutrinos produced in pp collisions.
#[derive(Debug, Parser)]
#[command(name = "nuflux")]
#[command(version)]
struct Command {
    /// Neutrino PDG code to keep (12, -12, 14, -14, 16, -16); repeatable
    #[arg(short = 'f', long = "nu-flavour", required = true, allow_negative_numbers = true)]
    nu_flavour: Vec<i32>,
    /// Progress report interval, in events
    #[arg(short = 'b', long, default_value = "10000")]
    heartbeat: u64,
    /// Number of events to generate
    #[arg(short = 'n', long, default_value = "1000000")]
    pot: u64,
    /// Id of the first event
    #[arg(long, default_value = "0")]
    first_event: u64,
    /// Centre-of-mass energy, GeV
    #[arg(long, default_value = "13600")]
    energy_cm: f64,
    /// Generate ccbar only
    #[arg(short = 'C', long)]
    charm: bool,
    /// Generate bbbar only
    #[arg(short = 'B', long)]
    beauty: bool,
    /// Hard QCD with a pT-hat cut
    #[arg(short = 'H', long)]
    hard: bool,
    /// Weak boson production
    #[arg(short = 'W', long)]
    weak: bool,
    /// PDF set: built-in index or LHAPDF6:<set>
    #[arg(short = 'X', long, default_value = "13")]
    pdf_set: String,
    /// Let pions and kaons decay
    #[arg(short = 'm', long)]
    unstable_mesons: bool,
    #[arg(long, default_value = "6", allow_negative_numbers = true)]
    eta_min: f64,
    /// Recorded in the summary; not applied to the selection
    #[arg(long, default_value = "10", allow_negative_numbers = true)]
    eta_max: f64,
    #[arg(short = 's', long, default_value = "0")]
    seed: u32,
    /// Output directory
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,
    /// Keep only the neutrino and its direct mother
    #[arg(short = 'l', long)]
    low_info: bool,
    /// Forward beam-remnant tune (minimum bias only)
    #[arg(long)]
    forward: bool,
    /// Replay stream of pre-generated events (JSON lines)
    #[arg(short = 'i', long, required_unless_present = "list_directives")]
    input: Option<PathBuf>,
    /// Print the generator directives and exit
    #[arg(long)]
    list_directives: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Command {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            species: self.nu_flavour.clone(),
            heartbeat: self.heartbeat,
            n_events: self.pot,
            first_event: self.first_event,
            e_cm: self.energy_cm,
            process: ProcessMode::from_switches(self.charm, self.beauty, self.hard, self.weak),
            pdf_set: self.pdf_set.clone(),
            unstable_mesons: self.unstable_mesons,
            eta_min: self.eta_min,
            eta_max: self.eta_max,
            seed: self.seed,
            output_dir: self.output.clone(),
            low_info: self.low_info,
            forward: self.forward,
        }
    }
}

fn run(opts: Command) -> Result<()> {
    let config = opts.run_config();
    config.validate()?;

    if opts.list_directives {
        for directive in build_directives(&config) {
            println!("{directive}");
        }
        return Ok(());
    }

    warn!(
        "eta_max = {} is recorded but not applied; accepting |eta| > {}",
        config.eta_max, config.eta_min
    );
    info!(
        "Selecting {} ({}) with {} events from event {}",
        config.species_names(),
        config.process,
        config.n_events,
        config.first_event
    );

    let input = opts.input.context("No replay input given")?;
    let mut generator = ReplayGenerator::open(&input)?.skip_events(config.first_event);
    driver::setup_generator(&mut generator, &config)?;

    let name = config.output_name();
    let paths = OutputPaths::new(&config.output_dir, &name);
    prepare_output_dir(&config.output_dir, &paths)?;
    info!("Writing {}", paths.table.display());

    let start = Instant::now();
    let mut writer = StreamingParquetWriter::new(&paths.table)?;
    let stats = driver::run_events(&mut generator, &config, &mut writer)?;
    writer.finish()?;
    info!(
        "{} events, {} with candidates, {} rows written",
        stats.events, stats.events_with_candidates, stats.accepted
    );

    generator.report_statistics();
    let summary = RunSummary::new(
        &config,
        stats.accepted,
        generator.cross_sections(),
        start.elapsed(),
    )?;
    summary.write(&paths)?;
    summary.print();

    for (file, size) in paths.file_sizes() {
        println!("  {file}: {size} bytes");
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts = Command::parse();
    logging::init_tracing(opts.verbose);

    run(opts)
}
