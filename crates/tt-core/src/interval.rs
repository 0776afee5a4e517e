//! Converting ticks into work intervals.
//!
//! Ticks are added to a [`Collector`] in chronological order. Consecutive
//! ticks no more than `max_gap` apart belong to the same interval; a wider gap
//! closes the running interval and starts a new one. When all ticks have been
//! added the collector is finished and the intervals are extracted.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// If more than this much time elapses between consecutive ticks, the gap
/// breaks the running interval.
pub const DEFAULT_MAX_GAP: Duration = Duration::minutes(23);

/// A span of time in which work was happening.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Empty when the interval is a union across labels.
    #[serde(default)]
    pub label: String,
}

impl Interval {
    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} starting {} ({})]",
            format_duration(self.duration()),
            self.start,
            self.label
        )
    }
}

/// Formats a duration as "Xh Ym" if at least an hour, "Xm" otherwise.
/// Negative durations format as "0m".
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes < 0 {
        return "0m".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Bounds of the interval currently being extended.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Synthesizes one label's intervals from its ticks.
///
/// Every interval produced is clipped to `[window_start, window_end]`; spans
/// that clip to nothing (including single isolated ticks) are dropped.
///
/// Ticks must be added in non-decreasing order. To see intervals that begin
/// before `window_start` or end after `window_end`, the caller has to feed
/// ticks from `[window_start - max_gap, window_end + max_gap]`.
#[derive(Debug)]
pub struct Collector {
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    max_gap: Duration,
    label: String,
    current: Option<Span>,
    intervals: Vec<Interval>,
}

impl Collector {
    /// Creates a collector for `label` clipped to `[window_start, window_end]`.
    pub fn new(
        label: impl Into<String>,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        max_gap: Duration,
    ) -> Self {
        Self {
            window_start,
            window_end,
            max_gap,
            label: label.into(),
            current: None,
            intervals: Vec::new(),
        }
    }

    /// Adds a tick at `t`.
    ///
    /// Returns `false` once the running interval starts after the window, at
    /// which point no later tick can contribute anything.
    pub fn add(&mut self, t: DateTime<Utc>) -> bool {
        match &mut self.current {
            Some(span) if span.start > self.window_end => {
                tracing::trace!(tick = %t, "past query window");
                return false;
            }
            Some(span) if t - span.end <= self.max_gap => {
                tracing::trace!(tick = %t, "interval still going");
                span.end = t;
                return true;
            }
            _ => {}
        }
        tracing::trace!(tick = %t, "interval break");
        self.close_current();
        self.current = Some(Span { start: t, end: t });
        true
    }

    /// Closes the last interval and returns everything collected.
    pub fn finish(mut self) -> Vec<Interval> {
        self.close_current();
        self.intervals
    }

    fn close_current(&mut self) {
        let Some(span) = self.current.take() else {
            return;
        };
        let start = self.window_start.max(span.start);
        let end = self.window_end.min(span.end);
        if end <= start {
            return;
        }
        self.intervals.push(Interval {
            start,
            end,
            label: self.label.clone(),
        });
    }
}
