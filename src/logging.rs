//! Per-run log sink
//!
//! Each worker run writes its own log file into the host's log folder. The
//! sink is returned as a [`Dispatch`] for the caller to attach to the run
//! instead of being installed as the process-wide default.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};
use uuid::Uuid;

const LOG_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Builds the log sink for a run
///
/// The file is `<log_dir>/<worker>_<random hex>.log`; its level is DEBUG in
/// debug mode and INFO otherwise.
/// `console` optionally mirrors events to stderr with its own filter.
///
/// # Returns
///
/// * `Ok((Dispatch, PathBuf))` - The sink and the path of its log file
/// * `Err(io::Error)` - The log folder or file could not be created
pub fn build_log_sink(
    log_dir: &Path,
    worker: &str,
    debug: bool,
    console: Option<EnvFilter>,
) -> io::Result<(Dispatch, PathBuf)> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!("{}_{}.log", worker, Uuid::new_v4().simple()));
    let file = File::create(&path)?;

    let file_filter = EnvFilter::new(if debug { "debug" } else { "info" });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .with_filter(file_filter);

    let console_layer = console.map(|filter| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(filter)
    });

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer);

    Ok((Dispatch::new(subscriber), path))
}

/// Maps CLI verbosity flags to a stderr filter
pub fn console_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    match verbose {
        0 => EnvFilter::new("hostcrawl=info,warn"),
        1 => EnvFilter::new("hostcrawl=debug,info"),
        2 => EnvFilter::new("hostcrawl=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}
