//! Today command for drawing a bar of each day's activity.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Days, Duration, NaiveDate};
use clap::Args;

use tt_core::{Clock, GetIntervalsRequest, get_intervals, render_bar};
use tt_db::Database;

use super::util::{local_date, local_midnight_to_utc};

#[derive(Debug, Args)]
pub struct TodayArgs {
    /// Day to show (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Number of days to show, ending at --date.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    clock: &dyn Clock,
    max_gap: Duration,
    args: &TodayArgs,
) -> Result<()> {
    let last = args.date.unwrap_or_else(|| local_date(clock.now()));

    for back in (0..args.days).rev() {
        let date = last
            .checked_sub_days(Days::new(u64::from(back)))
            .with_context(|| format!("{back} days before {last} is out of range"))?;
        let morning = local_midnight_to_utc(date);
        let request =
            GetIntervalsRequest::new(morning, morning + Duration::hours(24)).with_union(true);
        let response = get_intervals(db, &request, max_gap)
            .with_context(|| format!("failed to compute intervals for {date}"))?;

        tracing::debug!(%date, intervals = response.intervals.len(), "rendering day");
        writeln!(
            writer,
            "{}: {}",
            date.format("%Y/%m/%d"),
            render_bar(morning, &response.intervals)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tt_core::{DEFAULT_MAX_GAP, EMPTY_BAR, Interval, TestingClock, Tick};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 7, d).unwrap()
    }

    fn run_to_string(db: &Database, clock: &dyn Clock, args: &TodayArgs) -> String {
        let mut output = Vec::new();
        run(&mut output, db, clock, DEFAULT_MAX_GAP, args).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn today_draws_union_of_labels() {
        let db = Database::open_in_memory().unwrap();
        let morning = local_midnight_to_utc(date(1));
        let noon = morning + Duration::hours(12);
        for (offset, label) in [(0, "a"), (5, "b"), (10, "a")] {
            db.insert_tick(&Tick::new(noon + Duration::minutes(offset), label))
                .unwrap();
        }
        let clock = TestingClock::new(noon + Duration::hours(1));

        let output = run_to_string(
            &db,
            &clock,
            &TodayArgs {
                date: None,
                days: 1,
            },
        );

        let expected = render_bar(
            morning,
            &[Interval {
                start: noon,
                end: noon + Duration::minutes(10),
                label: String::new(),
            }],
        );
        assert_eq!(output, format!("2017/07/01: {expected}\n"));
        assert_ne!(expected, *EMPTY_BAR);
    }

    #[test]
    fn today_prints_days_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let clock = TestingClock::new(local_midnight_to_utc(date(20)));

        let output = run_to_string(
            &db,
            &clock,
            &TodayArgs {
                date: Some(date(3)),
                days: 3,
            },
        );

        let empty = &*EMPTY_BAR;
        assert_eq!(
            output,
            format!("2017/07/01: {empty}\n2017/07/02: {empty}\n2017/07/03: {empty}\n")
        );
    }

    #[test]
    fn today_ignores_ticks_from_other_days() {
        let db = Database::open_in_memory().unwrap();
        let morning = local_midnight_to_utc(date(2));
        db.insert_tick(&Tick::new(morning - Duration::hours(6), "x"))
            .unwrap();
        db.insert_tick(&Tick::new(morning - Duration::hours(6) + Duration::minutes(2), "x"))
            .unwrap();
        let clock = TestingClock::new(morning);

        let output = run_to_string(
            &db,
            &clock,
            &TodayArgs {
                date: Some(date(2)),
                days: 1,
            },
        );

        assert_eq!(output, format!("2017/07/02: {}\n", *EMPTY_BAR));
    }
}
