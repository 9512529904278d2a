//! dispatchd - demo driver for taskq-core's dispatch loop.
//!
//! Wires up a `DispatchCore` against a simulated host-state feed and a
//! simulated kick transport: CLI flags, YAML config with defaults,
//! `tracing` logging, and a background refresh loop.
//!
//! The real transport, host-state store, and job catalog are out of scope
//! -- this binary exists to demonstrate `taskq-core`, not to be a
//! production scheduler front end.

mod config;
mod dispatch_loop;
mod feed;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taskq_core::{DispatchCore, SystemClock, TaskHandle};
use tracing::info;

/// dispatchd - demo dispatch-loop daemon
#[derive(Parser, Debug)]
#[command(name = "dispatchd", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "/etc/dispatchd/dispatchd.yaml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Number of dispatch passes to run before exiting
    #[arg(long, default_value_t = 3)]
    passes: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("dispatchd v{} starting", env!("CARGO_PKG_VERSION"));

    let dispatch_config = config::load_config(&args.config)?;
    let core = Arc::new(DispatchCore::new(dispatch_config, Arc::new(SystemClock::new()))?);

    seed_demo_tasks(&core);

    let fleet = feed::demo_fleet();
    dispatch_loop::refresh_from_fleet(&core, &fleet);

    for pass in 0..args.passes {
        info!(pass, "running dispatch pass");
        dispatch_loop::run_once(&core, &fleet);
        std::thread::sleep(Duration::from_millis(50));
    }

    dispatch_loop::shutdown(&core);
    info!("dispatchd stopping");
    Ok(())
}

fn seed_demo_tasks(core: &DispatchCore) {
    core.enqueue(10, TaskHandle::new("job-a", 0), false, false);
    core.enqueue(10, TaskHandle::new("job-a", 1), false, false);
    core.enqueue(5, TaskHandle::new("job-b", 0), true, false);
}
