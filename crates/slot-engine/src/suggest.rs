//! Pick the earliest slot of each of the first few available days.

use crate::availability::AvailabilityMap;
use crate::instant::Instant;

/// The first slot of each non-empty date, in bucket order, at most `limit`.
///
/// Because buckets are chronological the result is strictly ascending, holds
/// at most one slot per date, and each slot is its date's earliest. A later
/// day is never preferred for having an earlier time of day.
pub fn select_suggestions(slots: &AvailabilityMap, limit: usize) -> Vec<Instant> {
    slots
        .days()
        .filter_map(|day| day.slots.first().copied())
        .take(limit)
        .collect()
}
