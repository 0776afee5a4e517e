//! CLI subcommand implementations.

pub mod clear;
pub mod intervals;
pub mod status;
pub mod tick;
pub mod today;
pub mod util;
