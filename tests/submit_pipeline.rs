//! Integration tests for `nuflux-submit` in dry-run mode.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_submit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nuflux-submit"))
        .args(args)
        .output()
        .expect("Failed to run nuflux-submit")
}

/// Write a job table and a submit config into `dir`.
fn setup(dir: &Path) -> (String, String) {
    let jobs = dir.join("jobs.csv");
    fs::write(
        &jobs,
        "# path, nEvents, id\n/eos/muons_0.root, 2500000, 0\n/eos/muons_1.root, 1000000, 1\n",
    )
    .unwrap();

    let config = dir.join("submit.json");
    let json = serde_json::json!({
        "run_tag": "soft_nutau",
        "extra_fs_args": "--forward -f 16 -f -16",
        "log_dir": dir.join("logs"),
        "output_dir": dir.join("out"),
        "submit_interval_secs": 0,
    });
    fs::write(&config, json.to_string()).unwrap();

    (
        jobs.to_str().unwrap().to_string(),
        config.to_str().unwrap().to_string(),
    )
}

#[test]
fn test_dry_run_writes_one_file_per_source() {
    let tmp = TempDir::new().unwrap();
    let (jobs, config) = setup(tmp.path());

    let output = run_submit(&["--jobs", &jobs, "--config", &config, "--dry-run"]);
    assert!(
        output.status.success(),
        "nuflux-submit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let log_dir = tmp.path().join("logs").join("soft_nutau");
    let first = fs::read_to_string(log_dir.join("0.sub")).unwrap();
    let items: Vec<&str> = first
        .lines()
        .filter(|l| l.starts_with("  /eos/"))
        .collect();
    assert_eq!(
        items,
        vec![
            "  /eos/muons_0.root, 0, 0, 1000000, 0, --forward -f 16 -f -16",
            "  /eos/muons_0.root, 1, 1000000, 1000000, 1, --forward -f 16 -f -16",
            "  /eos/muons_0.root, 2, 2000000, 500000, 2, --forward -f 16 -f -16",
        ]
    );
    assert!(first.contains("MY.SendCredential = True"));

    let second = fs::read_to_string(log_dir.join("1.sub")).unwrap();
    assert_eq!(second.lines().filter(|l| l.starts_with("  /eos/")).count(), 1);
}

#[test]
fn test_debug_stops_after_first_source() {
    let tmp = TempDir::new().unwrap();
    let (jobs, config) = setup(tmp.path());

    let output = run_submit(&[
        "--jobs",
        &jobs,
        "--config",
        &config,
        "--dry-run",
        "--debug",
        "--run-tag",
        "debug_run",
    ]);
    assert!(output.status.success());

    let log_dir = tmp.path().join("logs").join("debug_run");
    let first = fs::read_to_string(log_dir.join("0.sub")).unwrap();
    assert_eq!(
        first
            .lines()
            .filter(|l| l.starts_with("  /eos/") && l.contains(", 10, "))
            .count(),
        2
    );
    assert!(!log_dir.join("1.sub").exists());
}

#[test]
fn test_bad_job_table() {
    let tmp = TempDir::new().unwrap();
    let (_, config) = setup(tmp.path());
    let jobs = tmp.path().join("bad.csv");
    fs::write(&jobs, "/eos/muons_0.root, lots, 0\n").unwrap();

    let output = run_submit(&[
        "--jobs",
        jobs.to_str().unwrap(),
        "--config",
        &config,
        "--dry-run",
    ]);
    assert!(!output.status.success());
}
