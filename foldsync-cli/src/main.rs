//! foldsync — one-way folder mirroring daemon.
//!
//! # Usage
//!
//! ```text
//! foldsync <source_dir> <replica_dir> <interval_seconds> <log_file>
//! ```
//!
//! Mirrors `<source_dir>` onto `<replica_dir>` once at startup and then
//! every `<interval_seconds>`, appending every mutating action to
//! `<log_file>` and stdout. Runs until interrupted with ctrl-c.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use foldsync_daemon::Scheduler;
use foldsync_engine::{ensure_replica_root, Journal, SyncEndpoint};

#[derive(Parser, Debug)]
#[command(
    name = "foldsync",
    version,
    about = "Mirror a source directory onto a replica on a fixed interval",
    long_about = None,
)]
struct Cli {
    /// Directory treated as ground truth. Must exist.
    source_dir: PathBuf,

    /// Directory kept in sync with the source. Created if absent.
    replica_dir: PathBuf,

    /// Seconds between mirroring passes.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    interval_seconds: u64,

    /// Append-only action log file.
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Source Path: {}", cli.source_dir.display());
    println!("Replica Path: {}", cli.replica_dir.display());
    println!("Interval: {} seconds", cli.interval_seconds);
    println!("Log File Path: {}", cli.log_file.display());

    if !cli.source_dir.is_dir() {
        bail!(
            "source directory '{}' does not exist",
            cli.source_dir.display()
        );
    }

    let source = SyncEndpoint::source(cli.source_dir);
    let replica = SyncEndpoint::replica(cli.replica_dir);
    let journal = Journal::new(cli.log_file);

    ensure_replica_root(&replica, &journal).with_context(|| {
        format!(
            "could not create replica directory '{}'",
            replica.root().display()
        )
    })?;

    let interval = Duration::from_secs(cli.interval_seconds);
    Scheduler::new(source, replica, journal, interval)
        .start_blocking()
        .context("scheduler failed")
}
