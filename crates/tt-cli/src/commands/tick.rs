//! Tick command for recording that work happened.

use anyhow::{Context, Result};

use tt_core::{Clock, Tick};
use tt_db::Database;

use super::util::parse_datetime;

/// Records a tick for `label`, at `at` if given and now otherwise.
pub fn run(db: &Database, clock: &dyn Clock, label: &str, at: Option<&str>) -> Result<Tick> {
    let now = clock.now();
    let at = match at {
        Some(at) => parse_datetime(at, now)?,
        None => now,
    };

    let tick = Tick::new(at, label);
    db.insert_tick(&tick).context("failed to record tick")?;
    Ok(tick)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone, Utc};
    use tt_core::TestingClock;

    #[test]
    fn tick_defaults_to_clock_time() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2017, 7, 1, 12, 0, 0).unwrap();
        let clock = TestingClock::new(now);

        run(&db, &clock, "label1", None).unwrap();
        clock.advance(Duration::minutes(1));
        run(&db, &clock, "label1", None).unwrap();

        let ticks = db.ticks_in_range(now, now + Duration::hours(1), None).unwrap();
        assert_eq!(
            ticks,
            vec![
                Tick::new(now, "label1"),
                Tick::new(now + Duration::minutes(1), "label1"),
            ]
        );
    }

    #[test]
    fn tick_at_explicit_and_relative_times() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2017, 7, 1, 12, 0, 0).unwrap();
        let clock = TestingClock::new(now);

        let explicit = run(&db, &clock, "", Some("2017-07-01T09:15:00Z")).unwrap();
        let relative = run(&db, &clock, "", Some("5 minutes ago")).unwrap();

        assert_eq!(explicit.at, Utc.with_ymd_and_hms(2017, 7, 1, 9, 15, 0).unwrap());
        assert_eq!(relative.at, now - Duration::minutes(5));
        assert_eq!(db.tick_count().unwrap(), 2);
    }

    #[test]
    fn tick_rejects_unparseable_time() {
        let db = Database::open_in_memory().unwrap();
        let clock = TestingClock::new(Utc::now());
        assert!(run(&db, &clock, "x", Some("whenever")).is_err());
        assert_eq!(db.tick_count().unwrap(), 0);
    }
}
