//! netdevd - network device counter collector daemon.
//!
//! Periodically collects per-interface counters from the host and writes
//! them to stdout as JSON lines, one object per device and counter.

use std::io::{self, BufWriter, Stdout};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use netdev_core::collector::{FilterConfig, NetDevCollector, NetDevSource, platform_source};
use netdev_core::sink::JsonLinesSink;

/// Network device counter collector daemon.
#[derive(Parser, Debug)]
#[command(name = "netdevd", about = "Network device counter collector", version)]
struct Args {
    /// Collection interval in seconds.
    #[arg(short, long, default_value = "10")]
    interval: u64,

    /// Path to /proc filesystem (for testing/containers). Linux only.
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Regexp of devices to ignore (mutually exclusive with --device-accept).
    #[arg(long, value_name = "REGEX", visible_alias = "device-blacklist")]
    device_ignore: Option<String>,

    /// Regexp of devices to report, all others are ignored
    /// (mutually exclusive with --device-ignore).
    #[arg(long, value_name = "REGEX", visible_alias = "device-whitelist")]
    device_accept: Option<String>,

    /// Run a single collection cycle and exit with its status.
    #[arg(long)]
    once: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            ignore: self.device_ignore.clone(),
            accept: self.device_accept.clone(),
        }
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Logs go to stderr; stdout carries the samples.
fn init_logging(verbose: u8, quiet: bool) {
    let level = log_level(verbose, quiet);

    let mut filter = EnvFilter::from_default_env();
    for target in ["netdevd", "netdev_core"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Runs one cycle and flushes its output. Returns `true` on success.
fn run_cycle<S: NetDevSource>(
    collector: &NetDevCollector<S>,
    sink: &mut JsonLinesSink<BufWriter<Stdout>>,
    cycle: u64,
) -> bool {
    let start = Instant::now();
    let before = sink.written();
    sink.set_timestamp(Utc::now());

    let result = collector.update(sink);
    if let Err(e) = sink.flush() {
        warn!("Failed to flush output: {}", e);
    }

    match result {
        Ok(()) => {
            debug!(
                "Cycle #{}: {} samples in {:?}",
                cycle,
                sink.written() - before,
                start.elapsed()
            );
            true
        }
        Err(e) => {
            error!("couldn't get netstats: {}", e);
            false
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("netdevd {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: interval={}s, proc={}, ignore={:?}, accept={:?}",
        args.interval, args.proc_path, args.device_ignore, args.device_accept
    );

    let source = platform_source(&args.proc_path);
    let collector = match NetDevCollector::new(&args.filter_config(), source) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create netdev collector: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sink = JsonLinesSink::new(BufWriter::new(io::stdout()));

    if args.once {
        return if run_cycle(&collector, &mut sink, 1) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let interval = Duration::from_secs(args.interval);
    let mut cycle: u64 = 0;
    let mut failures: u64 = 0;

    info!("Starting collection loop");

    while running.load(Ordering::SeqCst) {
        cycle += 1;
        if !run_cycle(&collector, &mut sink, cycle) {
            failures += 1;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!(
        "Shutting down after {} cycles ({} failed, {} samples written)",
        cycle,
        failures,
        sink.written()
    );
    ExitCode::SUCCESS
}
