//! wbdl main entry point
//!
//! This is the command-line interface for the wbdl website archiver.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wbdl::config::{load_config_with_hash, Config};
use wbdl::output::{archive_website, print_statistics, UuidGenerator, ZipCompressor};

/// wbdl: download a website into a ZIP archive
///
/// wbdl crawls every page reachable from URL on the same origin, saves each
/// page under a folder layout that mirrors its URL path, and packages the
/// result into a ZIP file.
#[derive(Parser, Debug)]
#[command(name = "wbdl")]
#[command(version)]
#[command(about = "Download a website into a ZIP archive", long_about = None)]
struct Cli {
    /// The URL to start crawling from, e.g. https://example.net
    #[arg(value_name = "URL")]
    url: String,

    /// Open the output folder in the file manager when done
    #[arg(long)]
    open: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to create the run folder in (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Unable to generate website archive for {}", cli.url);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output.output_dir = dir.clone();
    }

    let compressor = Arc::new(ZipCompressor::default());
    let output = archive_website(&cli.url, &config, &UuidGenerator, compressor)
        .await
        .with_context(|| format!("archiving {}", cli.url))?;

    if !cli.quiet {
        println!();
        println!("Website archive created for {} at:", cli.url);
        println!("{}", output.run_dir.display());
        println!();
        print_statistics(&output.stats);
    }

    if cli.open {
        open_folder(&output.run_dir)?;
    }

    Ok(())
}

/// Loads the config file if one was given, otherwise the defaults
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wbdl=info,warn"),
            1 => EnvFilter::new("wbdl=debug,info"),
            2 => EnvFilter::new("wbdl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens `folder` with the platform's file manager
fn open_folder(folder: &Path) -> anyhow::Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    tracing::debug!("Opening {} with {}", folder.display(), opener);
    let status = Command::new(opener)
        .arg(folder)
        .status()
        .with_context(|| format!("running {}", opener))?;

    // explorer.exe reports a non-zero status even when it succeeds
    if !status.success() && !cfg!(target_os = "windows") {
        anyhow::bail!("{} exited with {}", opener, status);
    }

    Ok(())
}
