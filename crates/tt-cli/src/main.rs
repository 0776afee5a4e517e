use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tt_cli::commands::{clear, intervals, status, tick, today};
use tt_cli::{Cli, Commands, Config};
use tt_core::SystemClock;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config: &Config) -> Result<tt_db::Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    tt_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let max_gap = config.max_gap().with_context(|| {
        format!(
            "max_gap_minutes must be a positive number of minutes, got {}",
            config.max_gap_minutes
        )
    })?;

    let db = open_database(&config)?;
    let clock = SystemClock;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Tick { label, at } => {
            tick::run(&db, &clock, label, at.as_deref())?;
        }
        Commands::Intervals(args) => intervals::run(&mut stdout, &db, &clock, max_gap, args)?,
        Commands::Today(args) => today::run(&mut stdout, &db, &clock, max_gap, args)?,
        Commands::Status => status::run(&mut stdout, &db, &config.database_path)?,
        Commands::Clear { yes } => clear::run(&mut stdout, &db, *yes)?,
    }

    Ok(())
}
