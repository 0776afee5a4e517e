//! Multiway merge of per-label interval lists.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::interval::Interval;

/// The next unmerged interval of one input sequence.
struct Head {
    interval: Interval,
    sequence: usize,
}

impl Head {
    fn key(&self) -> (chrono::DateTime<chrono::Utc>, usize) {
        (self.interval.start, self.sequence)
    }
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Head {}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Head {
    // Reversed so the max-heap pops the earliest start first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Merges sorted interval sequences into one sequence sorted by start.
///
/// Each input must already be sorted by `start`. Intervals keep their labels.
/// When two heads share a start, the one from the earlier sequence is emitted
/// first.
pub fn merge_intervals(sequences: Vec<Vec<Interval>>) -> Vec<Interval> {
    let total = sequences.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);

    let mut remaining: Vec<_> = sequences.into_iter().map(Vec::into_iter).collect();
    let mut heap = BinaryHeap::with_capacity(remaining.len());
    for (sequence, intervals) in remaining.iter_mut().enumerate() {
        if let Some(interval) = intervals.next() {
            heap.push(Head { interval, sequence });
        }
    }

    while let Some(Head { interval, sequence }) = heap.pop() {
        merged.push(interval);
        if let Some(next) = remaining[sequence].next() {
            heap.push(Head {
                interval: next,
                sequence,
            });
        }
    }

    merged
}
