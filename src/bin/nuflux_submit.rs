//! nuflux-submit: split sources into cluster jobs and submit them
//!
//! Reads a job table (`path, nEvents, id` per line), cuts every source into
//! chunks of `events_per_job` events and submits one HTCondor cluster per
//! source.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing::info;

use nuflux::logging;
use nuflux::submit::{
    read_job_table, submit_all, CondorScheduler, DryRunScheduler, Scheduler, SubmitConfig,
};

#[derive(Parser)]
#[command(name = "nuflux-submit")]
#[command(about = "Split neutrino production sources into cluster jobs")]
#[command(version)]
struct Cli {
    /// Job table: headerless CSV of `path, nEvents, id`
    #[arg(short, long)]
    jobs: PathBuf,

    /// Submit settings (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the campaign name
    #[arg(long)]
    run_tag: Option<String>,

    /// Override the number of events per job
    #[arg(long)]
    events_per_job: Option<u64>,

    /// Override the extra driver flags passed to every job
    #[arg(long, allow_hyphen_values = true)]
    extra_args: Option<String>,

    /// Submit the first source only, with two 10-event jobs
    #[arg(long)]
    debug: bool,

    /// Write submit files without calling condor_submit
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn submit_config(&self) -> Result<SubmitConfig> {
        let mut config = match &self.config {
            Some(path) => SubmitConfig::load(path)?,
            None => SubmitConfig::default(),
        };
        if let Some(run_tag) = &self.run_tag {
            config.run_tag = run_tag.clone();
        }
        if let Some(events_per_job) = self.events_per_job {
            config.events_per_job = events_per_job;
        }
        if let Some(extra_args) = &self.extra_args {
            config.extra_fs_args = extra_args.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = cli.submit_config()?;
    let rows = read_job_table(&cli.jobs)?;
    info!(
        "{} source(s) from {}, run tag {}",
        rows.len(),
        cli.jobs.display(),
        config.run_tag
    );

    let submit_dir = config.run_log_dir();
    let mut scheduler: Box<dyn Scheduler> = if cli.dry_run {
        Box::new(DryRunScheduler::new(&submit_dir))
    } else {
        Box::new(CondorScheduler::new(&submit_dir))
    };

    let outcomes = submit_all(&rows, &config, cli.debug, scheduler.as_mut())?;
    for outcome in &outcomes {
        match outcome.cluster {
            Some(cluster) => println!(
                "cluster {cluster}: {} job(s) from {}",
                outcome.jobs,
                outcome.submit_file.display()
            ),
            None => println!(
                "{} job(s) in {}",
                outcome.jobs,
                outcome.submit_file.display()
            ),
        }
    }
    Ok(())
}
