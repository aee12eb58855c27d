//! url-sweep main entry point
//!
//! This is the command-line interface for the url-sweep batch prober.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use url_sweep::batch::read_url_list;
use url_sweep::config::{load_config_with_hash, validate, Config};
use url_sweep::probe::ProbeMode;
use url_sweep::report::print_statistics;
use url_sweep::run::run_sweep_with_cancel;

/// url-sweep: probe a list of URLs and report which ones answer
///
/// Reads URLs from a delimited file, probes them concurrently, and writes a
/// report sorted by URL.
#[derive(Parser, Debug)]
#[command(name = "url-sweep")]
#[command(version)]
#[command(about = "Concurrent URL existence and responsiveness checker", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the probe mode (existence or responsiveness)
    #[arg(long, value_name = "MODE")]
    mode: Option<ProbeMode>,

    /// Override the number of concurrent workers
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Override the input URL list
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Override the report path
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config, read the URL list, and show what would be probed
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_sweep(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("url_sweep=info,warn"),
            1 => EnvFilter::new("url_sweep=debug,info"),
            2 => EnvFilter::new("url_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.probe.mode = mode;
    }
    if let Some(concurrency) = cli.concurrency {
        config.probe.concurrency = concurrency;
    }
    if let Some(input) = &cli.input {
        config.input.path = input.display().to_string();
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }
}

/// Handles the --dry-run mode: shows the resolved settings and batch size
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== url-sweep Dry Run ===\n");

    println!("Probe Configuration:");
    println!("  Mode: {}", config.probe.mode);
    println!("  Concurrency: {}", config.probe.concurrency);
    println!("  Chunk size: {}", config.probe.chunk_size);
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.probe.request_timeout_secs, config.probe.connect_timeout_secs
    );
    if config.probe.mode == ProbeMode::Responsiveness {
        println!(
            "  Marker: '{}' in <{}>",
            config.probe.marker_token, config.probe.marker_tag
        );
    }

    println!("\nInput: {}", config.input.path);
    println!("Output: {}", config.output_path().display());

    let batch = read_url_list(&config.input)?;
    println!("\n✓ Configuration is valid");
    println!("✓ Would probe {} URLs", batch.len());

    Ok(())
}

/// Handles the main sweep, forwarding Ctrl-C as a cancellation
async fn handle_sweep(config: Config, quiet: bool) -> anyhow::Result<()> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing with completed results");
            cancel_tx.send_replace(true);
        }
    });

    let summary = run_sweep_with_cancel(config, cancel_rx)
        .await
        .context("Sweep failed")?;

    if !quiet {
        print_statistics(&summary.statistics);
        println!("\nReport written to: {}", summary.report_path.display());
    }

    Ok(())
}
