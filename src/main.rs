//! Binary entry point: read settings, start file logging, build the session
//! catalog and hand it to the Ratatui event loop.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use library_desk::{
    default_records, init_logging, load_seed_file, load_settings, run_app, App, Catalog,
};
use tracing::info;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "library-desk")]
#[command(about = "Terminal front desk for a small library catalog")]
struct Args {
    /// Settings file (defaults to ~/.library-desk/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed catalog in TOML; overrides the configured seed
    #[arg(short, long, value_name = "PATH", conflicts_with = "empty")]
    seed: Option<PathBuf>,

    /// Start with an empty catalog
    #[arg(long)]
    empty: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if args.verbose {
        settings.log_level = "debug".into();
    }
    if let Some(seed) = args.seed {
        settings.seed_path = Some(seed);
    }
    init_logging(&settings.resolved_log_path()?, &settings.log_level)?;
    info!("starting library-desk");

    let catalog = if args.empty {
        Catalog::new()
    } else if let Some(path) = &settings.seed_path {
        load_seed_file(path)?
    } else {
        Catalog::from_records(default_records())?
    };
    info!(books = catalog.len(), "catalog ready");

    let mut app = App::new(catalog, &settings);
    run_app(&mut app)
}
