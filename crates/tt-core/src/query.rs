//! Answering interval queries from a tick source.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::{Collector, Interval};
use crate::merge::merge_intervals;
use crate::tick::TickSource;

/// Errors answering an interval query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query window ends before it starts.
    #[error("query window ends before it starts: {start} > {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The tick source returned ticks out of chronological order.
    #[error("tick source returned {next} after {previous}")]
    UnsortedTicks {
        previous: DateTime<Utc>,
        next: DateTime<Utc>,
    },

    /// The tick source failed.
    #[error("failed to read ticks")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A request for the intervals in a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetIntervalsRequest {
    /// Start of the window. Intervals overlapping it are truncated.
    pub start: DateTime<Utc>,
    /// End of the window. Intervals overlapping it are truncated.
    pub end: DateTime<Utc>,
    /// The label to get intervals for. Empty means every label.
    #[serde(default)]
    pub label: String,
    /// With no label filter, merge all labels into one unlabeled union
    /// instead of reporting each label separately.
    #[serde(default)]
    pub union: bool,
}

impl GetIntervalsRequest {
    /// A request for every label's intervals in `[start, end]`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            label: String::new(),
            union: false,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub const fn with_union(mut self, union: bool) -> Self {
        self.union = union;
        self
    }
}

/// The intervals answering a [`GetIntervalsRequest`], sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetIntervalsResponse {
    pub intervals: Vec<Interval>,
}

impl GetIntervalsResponse {
    /// Sum of all interval durations.
    pub fn total(&self) -> Duration {
        self.intervals
            .iter()
            .map(Interval::duration)
            .fold(Duration::zero(), |acc, d| acc + d)
    }
}

/// Synthesizes the intervals in the request window.
///
/// Ticks are read from `max_gap` before the window to `max_gap` after it, so
/// intervals crossing either edge are found and then clipped.
pub fn get_intervals<S>(
    source: &S,
    request: &GetIntervalsRequest,
    max_gap: Duration,
) -> Result<GetIntervalsResponse, QueryError>
where
    S: TickSource + ?Sized,
{
    if request.end < request.start {
        return Err(QueryError::InvalidWindow {
            start: request.start,
            end: request.end,
        });
    }

    let label_filter = (!request.label.is_empty()).then_some(request.label.as_str());
    let union = request.union && label_filter.is_none();
    let read_start = request
        .start
        .checked_sub_signed(max_gap)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let read_end = request
        .end
        .checked_add_signed(max_gap)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let ticks = source
        .ticks_in_range(read_start, read_end, label_filter)
        .map_err(|e| QueryError::Source(Box::new(e)))?;
    tracing::debug!(
        ticks = ticks.len(),
        start = %request.start,
        end = %request.end,
        label = %request.label,
        union,
        "synthesizing intervals"
    );

    let mut collectors: BTreeMap<String, Collector> = BTreeMap::new();
    let mut previous: Option<DateTime<Utc>> = None;
    for tick in ticks {
        match previous {
            Some(previous) if tick.at < previous => {
                return Err(QueryError::UnsortedTicks {
                    previous,
                    next: tick.at,
                });
            }
            _ => previous = Some(tick.at),
        }

        if label_filter.is_some_and(|label| label != tick.label) {
            tracing::warn!(label = %tick.label, "skipping tick with unrequested label");
            continue;
        }
        let label = if union { String::new() } else { tick.label };
        collectors
            .entry(label)
            .or_insert_with_key(|label| {
                Collector::new(label.clone(), request.start, request.end, max_gap)
            })
            .add(tick.at);
    }

    let collections: Vec<Vec<Interval>> = collectors.into_values().map(Collector::finish).collect();
    let intervals = merge_intervals(collections);
    tracing::debug!(intervals = intervals.len(), "synthesized intervals");
    Ok(GetIntervalsResponse { intervals })
}
