//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::intervals::IntervalsArgs;
use crate::commands::today::TodayArgs;

/// Tick-based time tracker.
///
/// Records "work happened" ticks and turns them into work intervals and
/// day-at-a-glance bars.
#[derive(Debug, Parser)]
#[command(name = "tt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record that work happened.
    Tick {
        /// The task being worked on. Empty if omitted.
        #[arg(default_value = "")]
        label: String,

        /// When the work happened (ISO 8601, YYYY-MM-DD, or relative like
        /// "5 minutes ago"). Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },

    /// List work intervals.
    Intervals(IntervalsArgs),

    /// Show a bar of the day's activity.
    Today(TodayArgs),

    /// Show database status.
    Status,

    /// Delete every recorded tick.
    Clear {
        /// Confirm deleting all data.
        #[arg(long)]
        yes: bool,
    },
}
