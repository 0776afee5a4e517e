//! Raw work ticks and the source they are read from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single "work happened" signal.
///
/// The empty label is reserved: as a filter it means "all labels".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// When the work happened.
    pub at: DateTime<Utc>,
    /// The task the work belongs to.
    #[serde(default)]
    pub label: String,
}

impl Tick {
    /// Creates a tick with the given label.
    pub fn new(at: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            at,
            label: label.into(),
        }
    }
}

/// Something that can answer range queries over recorded ticks.
///
/// Implementations must return ticks ordered by instant (ties in insertion
/// order). Both range bounds are inclusive.
pub trait TickSource {
    /// The error returned when the underlying storage fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every tick in `[start, end]`, restricted to `label` when given.
    fn ticks_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: Option<&str>,
    ) -> Result<Vec<Tick>, Self::Error>;
}

impl TickSource for [Tick] {
    type Error = std::convert::Infallible;

    fn ticks_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: Option<&str>,
    ) -> Result<Vec<Tick>, Self::Error> {
        Ok(self
            .iter()
            .filter(|tick| tick.at >= start && tick.at <= end)
            .filter(|tick| label.is_none_or(|label| tick.label == label))
            .cloned()
            .collect())
    }
}
