//! Busy-interval expansion -- converts a commitment or provider event into the
//! quarter-hour grid instants it occupies.
//!
//! Both sources are first turned into a half-open buffered [`Interval`]
//! `[start, end)`; the interval is then walked in 15-minute steps in the
//! display timezone.

use chrono::{DateTime, Duration, FixedOffset};
use chrono_tz::Tz;

use crate::error::Result;
use crate::instant::{
    round_down_to_quarter_hour, round_up_to_quarter_hour, shift_minutes, Instant, SLOT_MINUTES,
};
use crate::model::{Commitment, ProviderEvent};

/// A busy span, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub label: Option<String>,
}

impl Interval {
    /// Buffered span of a persisted meeting:
    /// `[starting_at - buffer, starting_at + meeting)`.
    ///
    /// With the default 15-minute buffer and 30-minute meeting this covers
    /// exactly three ticks.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` if `starting_at` is not a valid timestamp,
    /// and `SlotError::Config` if the durations overflow the calendar.
    pub fn for_commitment(
        commitment: &Commitment,
        meeting_minutes: i64,
        buffer_minutes: i64,
    ) -> Result<Self> {
        let start = commitment.start()?;
        Ok(Self {
            start: shift_minutes(start, buffer_minutes.saturating_neg())?,
            end: shift_minutes(start, meeting_minutes)?,
            label: None,
        })
    }

    /// Buffered span of a provider event:
    /// `[floor15(start) - buffer, ceil15(end))`.
    ///
    /// The start is floored to the grid before the buffer is subtracted; the
    /// end is ceiled so a partially covered quarter hour counts as busy.
    ///
    /// # Errors
    /// Returns `SlotError::Parse` if either timestamp is invalid, and
    /// `SlotError::Config` if the buffer overflows the calendar.
    pub fn for_provider_event(event: &ProviderEvent, buffer_minutes: i64) -> Result<Self> {
        let start = round_down_to_quarter_hour(&event.start_instant()?);
        let end = round_up_to_quarter_hour(&event.end_instant()?);
        Ok(Self {
            start: shift_minutes(start, buffer_minutes.saturating_neg())?,
            end,
            label: Some(event.summary.clone()),
        })
    }
}

/// Every tick `t` with `interval.start <= t < interval.end`, in `tz`.
pub fn expand_interval(interval: &Interval, tz: &Tz) -> Vec<Instant> {
    let step = Duration::minutes(SLOT_MINUTES);
    let end = interval.end.with_timezone(tz);
    let mut current = interval.start.with_timezone(tz);
    let mut ticks = Vec::new();

    while current < end {
        ticks.push(current);
        current += step;
    }

    ticks
}

/// Occupied ticks of a persisted meeting.
pub fn expand_commitment(
    commitment: &Commitment,
    tz: &Tz,
    meeting_minutes: i64,
    buffer_minutes: i64,
) -> Result<Vec<Instant>> {
    let interval = Interval::for_commitment(commitment, meeting_minutes, buffer_minutes)?;
    Ok(expand_interval(&interval, tz))
}

/// Occupied ticks of a provider event.
pub fn expand_provider_event(
    event: &ProviderEvent,
    tz: &Tz,
    buffer_minutes: i64,
) -> Result<Vec<Instant>> {
    let interval = Interval::for_provider_event(event, buffer_minutes)?;
    Ok(expand_interval(&interval, tz))
}
