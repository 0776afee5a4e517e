//! Core domain logic for the time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Interval synthesis: collapsing ticks into work intervals
//! - Merging: combining per-label intervals into one timeline
//! - Bars: rendering a day of intervals for the terminal

pub mod bar;
pub mod clock;
mod interval;
pub mod label;
mod merge;
mod query;
mod tick;

pub use bar::{EMPTY_BAR, render_bar};
pub use clock::{Clock, SystemClock, TestingClock};
pub use interval::{Collector, DEFAULT_MAX_GAP, Interval, format_duration};
pub use merge::merge_intervals;
pub use query::{GetIntervalsRequest, GetIntervalsResponse, QueryError, get_intervals};
pub use tick::{Tick, TickSource};
