//! Intervals command for listing synthesized work intervals.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use clap::Args;

use tt_core::{Clock, GetIntervalsRequest, GetIntervalsResponse, format_duration, get_intervals};
use tt_db::Database;

use super::util::{local_date, local_midnight_to_utc, parse_datetime};

#[derive(Debug, Args)]
pub struct IntervalsArgs {
    /// Window start. Defaults to the start of today.
    #[arg(long)]
    pub start: Option<String>,

    /// Window end. Defaults to 24 hours after the start.
    #[arg(long)]
    pub end: Option<String>,

    /// Only show intervals for this label.
    #[arg(long, default_value = "")]
    pub label: String,

    /// Merge every label into one unlabeled timeline.
    #[arg(long)]
    pub union: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl IntervalsArgs {
    /// Builds the request, resolving times against `now`.
    fn request(&self, now: DateTime<Utc>) -> Result<GetIntervalsRequest> {
        let start = match &self.start {
            Some(start) => parse_datetime(start, now).context("invalid --start")?,
            None => local_midnight_to_utc(local_date(now)),
        };
        let end = match &self.end {
            Some(end) => parse_datetime(end, now).context("invalid --end")?,
            None => start + Duration::hours(24),
        };
        Ok(GetIntervalsRequest::new(start, end)
            .with_label(self.label.clone())
            .with_union(self.union))
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    clock: &dyn Clock,
    max_gap: Duration,
    args: &IntervalsArgs,
) -> Result<()> {
    let request = args.request(clock.now())?;
    let response =
        get_intervals(db, &request, max_gap).context("failed to compute intervals")?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&response)?)?;
    } else {
        write!(
            writer,
            "{}",
            format_intervals(&response, request.start, request.end, &Local)
        )?;
    }
    Ok(())
}

/// Formats intervals as a human-readable table in the given timezone.
pub fn format_intervals<Tz>(
    response: &GetIntervalsResponse,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    const FULL: &str = "%Y-%m-%d %H:%M";

    let mut output = String::new();
    let _ = writeln!(
        output,
        "Intervals from {} to {}",
        start.with_timezone(tz).format(FULL),
        end.with_timezone(tz).format(FULL)
    );

    if response.intervals.is_empty() {
        output.push_str("No intervals.\n");
        return output;
    }

    for interval in &response.intervals {
        let interval_start = interval.start.with_timezone(tz);
        let interval_end = interval.end.with_timezone(tz);
        let end_format = if interval_start.date_naive() == interval_end.date_naive() {
            "%H:%M"
        } else {
            FULL
        };
        let label = if interval.label.is_empty() {
            "(none)"
        } else {
            interval.label.as_str()
        };
        let _ = writeln!(
            output,
            "{} - {}  {:>8}  {}",
            interval_start.format(FULL),
            interval_end.format(end_format),
            format_duration(interval.duration()),
            label
        );
    }
    let _ = writeln!(output, "Total: {}", format_duration(response.total()));
    output
}
