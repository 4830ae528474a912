//! cmdscraped - Command-output metrics collector daemon.
//!
//! Periodically invokes an external diagnostic command, extracts metric
//! records from its text output with a pattern rule table, and prints
//! line-protocol records on stdout. All diagnostics go to stderr so the
//! metric stream stays clean for the downstream pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use cmdscrape_core::config::CollectorConfig;
use cmdscrape_core::emit::Emitter;
use cmdscrape_core::extract::Extractor;
use cmdscrape_core::rules::RuleTable;
use cmdscrape_core::scheduler::Scheduler;
use cmdscrape_core::source::CommandSource;

/// Command-output metrics collector daemon.
#[derive(Parser)]
#[command(name = "cmdscraped", about = "Command-output metrics collector daemon", version)]
struct Args {
    /// Built-in collector preset to run (hadoop-dfs, sensors).
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    /// Path to a JSON collector configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Override the poll interval in seconds.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Override the command timeout in seconds.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Override the metric namespace prefix.
    #[arg(short, long)]
    namespace: Option<String>,

    /// Run a single collection cycle and exit.
    #[arg(long)]
    once: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
///
/// The writer is stderr: stdout carries the metric stream and must never
/// receive diagnostics.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("cmdscraped={}", level).parse().unwrap())
        .add_directive(format!("cmdscrape_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the collector configuration from the CLI arguments.
fn load_config(args: &Args) -> Result<CollectorConfig, String> {
    let mut config = match (&args.preset, &args.config) {
        (Some(name), None) => CollectorConfig::preset(name).ok_or_else(|| {
            format!(
                "unknown preset '{}' (available: {})",
                name,
                CollectorConfig::preset_names().join(", ")
            )
        })?,
        (None, Some(path)) => {
            CollectorConfig::from_json_file(path).map_err(|e| e.to_string())?
        }
        (None, None) => {
            return Err(format!(
                "either --preset or --config is required (presets: {})",
                CollectorConfig::preset_names().join(", ")
            ));
        }
        (Some(_), Some(_)) => unreachable!("clap rejects --preset with --config"),
    };

    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(ref namespace) = args.namespace {
        config.namespace = namespace.clone();
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cmdscraped: {}", e);
            std::process::exit(2);
        }
    };

    let table = match RuleTable::compile(&config.rules, &config.classifiers) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("cmdscraped: {}", e);
            std::process::exit(2);
        }
    };

    let source = match CommandSource::from_argv(
        &config.command,
        Duration::from_secs(config.timeout_secs),
    ) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("cmdscraped: {}", e);
            std::process::exit(2);
        }
    };

    info!("cmdscraped {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: command='{}', interval={}s, timeout={}s, namespace='{}', mode={:?}",
        config.command.join(" "),
        config.interval_secs,
        config.timeout_secs,
        config.namespace,
        config.mode
    );
    info!(
        "Rule table: {} rules, {} classifiers",
        config.rules.len(),
        config.classifiers.len()
    );

    let extractor = Extractor::new(config.mode, table, config.namespace.clone());
    let emitter = Emitter::new(std::io::stdout());

    let mut scheduler = Scheduler::new(
        source,
        extractor,
        emitter,
        Duration::from_secs(config.interval_secs),
    );
    if args.once {
        scheduler = scheduler.with_max_cycles(1);
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

    info!("Starting collection loop");
    let cycles = scheduler.run(&running);

    info!("Shutdown complete after {} cycles", cycles);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("cmdscraped").chain(argv.iter().copied()))
    }

    #[test]
    fn preset_resolves_to_builtin_config() {
        let config = load_config(&args_for(&["--preset", "sensors"])).unwrap();
        assert_eq!(config.command, vec!["sensors".to_string()]);
        assert_eq!(config.interval_secs, 10);
    }

    #[test]
    fn unknown_preset_is_rejected_with_available_names() {
        let err = load_config(&args_for(&["--preset", "nope"])).unwrap_err();
        assert!(err.contains("unknown preset"));
        assert!(err.contains("hadoop-dfs"));
        assert!(err.contains("sensors"));
    }

    #[test]
    fn missing_source_selection_is_rejected() {
        assert!(load_config(&args_for(&[])).is_err());
    }

    #[test]
    fn overrides_replace_preset_values() {
        let config = load_config(&args_for(&[
            "--preset",
            "hadoop-dfs",
            "--interval",
            "60",
            "--timeout",
            "5",
            "--namespace",
            "dfs.",
        ]))
        .unwrap();
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.namespace, "dfs.");
    }

    #[test]
    fn zero_interval_override_is_rejected() {
        let err = load_config(&args_for(&["--preset", "sensors", "--interval", "0"]));
        assert!(err.is_err());
    }
}
