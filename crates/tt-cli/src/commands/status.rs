//! Status command for showing what the database holds.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::SecondsFormat;

use tt_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    let count = db.tick_count().context("failed to count ticks")?;

    writeln!(writer, "Time tracker status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Ticks: {count}")?;

    let Some(last) = db.last_tick().context("failed to read last tick")? else {
        writeln!(writer, "No ticks recorded.")?;
        return Ok(());
    };

    let label = if last.label.is_empty() {
        "(none)"
    } else {
        last.label.as_str()
    };
    writeln!(
        writer,
        "Last tick: {} ({label})",
        last.at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    Ok(())
}
