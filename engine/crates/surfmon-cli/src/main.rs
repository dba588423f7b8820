//! surfmon - Attack surface analyzer and change monitor
//!
//! Captures security-relevant host state, diffs it against the previous
//! capture kept in a local cache and reports what changed.

mod output;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use output::{entry_lines, print_error, probe_lines, Printer};
use std::path::PathBuf;
use surfmon_collect::LocalCollector;
use surfmon_common::{init_logging_with_config, Config, LogConfig};
use surfmon_engine::{EngineResult, Report, Session};
use surfmon_probes::ProbeRegistry;
use surfmon_store::SnapshotStore;
use tracing::{debug, error, info};

/// surfmon attack surface analyzer
#[derive(Parser, Debug)]
#[command(name = "surfmon")]
#[command(version)]
#[command(about = "Attack surface analyzer and change monitor", long_about = None)]
#[command(group(ArgGroup::new("action").args(["analyze", "compare", "list_probes", "list_entries"])))]
struct Args {
    /// Analyze the system
    #[arg(short = 'A')]
    analyze: bool,

    /// Compare cache entry ID1 with ID2
    #[arg(short = 'C', num_args = 2, value_names = ["ID1", "ID2"])]
    compare: Option<Vec<u64>>,

    /// List available probes
    #[arg(short = 'E')]
    list_probes: bool,

    /// List cache entries
    #[arg(short = 'L')]
    list_entries: bool,

    /// Show debug output
    #[arg(short = 'd')]
    show_debug: bool,

    /// Run only this probe (repeatable); results are then not cached
    #[arg(short = 'e', value_name = "NAME")]
    probes: Vec<String>,

    /// Run even when not root
    #[arg(short = 'f')]
    force: bool,

    /// Colorize the analysis output
    #[arg(short = 'g')]
    colorize: bool,

    /// Location of the cache file (default: $HOME/.surfmon.db)
    #[arg(short = 'l', value_name = "PATH")]
    cache_location: Option<PathBuf>,

    /// Max amount of cache entries to keep (default: 16)
    #[arg(short = 'm', value_name = "N")]
    max_entries: Option<usize>,

    /// Configuration file path
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Verbose logging (same as --log-level debug)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn probe_filter(&self) -> Option<&[String]> {
        (!self.probes.is_empty()).then_some(self.probes.as_slice())
    }
}

/// Config file (if any), then SURFMON_* variables, then command line flags
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .merge_env();

    if let Some(path) = &args.cache_location {
        config.cache.path = Some(path.clone());
    }
    if let Some(n) = args.max_entries {
        config.cache.max_entries = n;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.verbose {
        config.logging.level = String::from("debug");
    }

    config.validate()?;
    Ok(config)
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

fn confirm_unprivileged() -> bool {
    println!("It's strongly recommended to run an analysis as root.");
    dialoguer::Confirm::new()
        .with_prompt("Continue anyway with the analysis?")
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Print whatever was found before a failed comparison gave up
fn report_failure(printer: &Printer, result: EngineResult<Report>) -> Result<Report> {
    result.map_err(|err| {
        error!(code = err.code(), "{}", err);
        let partial = err.partial_anomalies();
        if !partial.is_empty() {
            printer.print_report(&Report::new(partial.to_vec()));
        }
        err.into()
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let mut log_config = LogConfig::from_settings(&config.logging);
    if args.verbose {
        log_config = log_config.with_file().with_target();
    }
    init_logging_with_config(&log_config)?;

    debug!("surfmon v{}", env!("CARGO_PKG_VERSION"));

    if args.colorize {
        colored::control::set_override(true);
    }

    let registry = ProbeRegistry::builtin()?;

    if args.list_probes {
        for line in probe_lines(&registry.all()) {
            println!("{}", line);
        }
        return Ok(());
    }

    if !args.analyze && !args.list_entries && args.compare.is_none() {
        println!("select an action -A/C/E/L");
        return Ok(());
    }

    if args.analyze && !args.force && !running_as_root() && !confirm_unprivileged() {
        return Ok(());
    }

    let cache_path = config.cache_path();
    info!("Using cache {}", cache_path.display());
    let store = SnapshotStore::load(&cache_path)?;

    if args.list_entries {
        for line in entry_lines(store.entries()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let collector = LocalCollector::new().with_shell(config.collector.shell.clone());
    let mut session = Session::new(&registry, store, collector);
    let printer = Printer {
        color: args.colorize,
        show_debug: args.show_debug,
    };

    let report = match args.compare.as_deref() {
        Some(&[old_id, new_id]) => report_failure(
            &printer,
            session.compare_entries(old_id, new_id, args.probe_filter()),
        )?,
        Some(ids) => anyhow::bail!("expected two cache entry ids, got {}", ids.len()),
        None => report_failure(&printer, session.analyze(args.probe_filter()))?,
    };

    printer.print_report(&report);
    if let Some(id) = report.cached_as {
        info!("Snapshot cached as entry {}", id);
    }

    session.finish(config.cache.max_entries)?;
    Ok(())
}
