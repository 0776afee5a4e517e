//! Clear command for deleting every recorded tick.

use std::io::Write;

use anyhow::{Context, Result, bail};

use tt_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete all ticks without --yes");
    }

    let removed = db.clear().context("failed to clear ticks")?;
    writeln!(writer, "Cleared {removed} ticks.")?;
    Ok(())
}
