//! Existing commitments near a proposed slot.
//!
//! Provider events and persisted meetings within `target ± 8h` are merged and
//! the first three (by start time, or by distance to the target when
//! configured) are returned for display next to the slot.
//!
//! Provider events are scanned in listing order and the scan stops at the
//! third match. A closer event listed later can therefore be missed; this
//! bounds the scan on large calendars.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::config::{NearbyOrdering, SlotConfig};
use crate::error::Result;
use crate::instant::Instant;
use crate::model::{Commitment, NearbyEvent, Party, SuggestedTime};
use crate::source::{CalendarProvider, ListParams, MeetingStore, MemoizedProvider};

pub struct NearbyEventFinder<'a> {
    store: &'a dyn MeetingStore,
    calendar: Option<&'a dyn CalendarProvider>,
    config: SlotConfig,
}

impl<'a> NearbyEventFinder<'a> {
    pub fn new(store: &'a dyn MeetingStore, calendar: Option<&'a dyn CalendarProvider>) -> Self {
        Self {
            store,
            calendar,
            config: SlotConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SlotConfig) -> Self {
        self.config = config;
        self
    }

    /// Up to `nearby_limit` events around `target`, shown in the party's zone.
    ///
    /// # Errors
    /// Returns `SlotError::Config` for an invalid [`SlotConfig`]. Propagates
    /// provider and store failures, and `SlotError::Parse` for unparseable
    /// timestamps.
    pub fn other_events<Z: chrono::TimeZone>(
        &self,
        party: &Party,
        target: &DateTime<Z>,
        now: DateTime<Utc>,
    ) -> Result<Vec<NearbyEvent>> {
        self.config.validate()?;
        let calendar = MemoizedProvider::new(
            self.calendar,
            ListParams::upcoming(now, self.config.provider_max_results),
        );
        self.other_events_with(&calendar, party, target.with_timezone(&Utc))
    }

    /// Attach nearby events to each proposed slot, keeping input order.
    ///
    /// Each slot is returned as given; only its nearby events are shown in
    /// the party's zone.
    pub fn suggested_times(
        &self,
        party: &Party,
        slots: &[Instant],
        now: DateTime<Utc>,
    ) -> Result<Vec<SuggestedTime>> {
        self.config.validate()?;
        let calendar = MemoizedProvider::new(
            self.calendar,
            ListParams::upcoming(now, self.config.provider_max_results),
        );

        slots
            .iter()
            .map(|slot| {
                let target = slot.with_timezone(&Utc);
                Ok(SuggestedTime {
                    suggested_time: *slot,
                    other_events: self.other_events_with(&calendar, party, target)?,
                })
            })
            .collect()
    }

    fn other_events_with(
        &self,
        calendar: &MemoizedProvider<'_>,
        party: &Party,
        target: DateTime<Utc>,
    ) -> Result<Vec<NearbyEvent>> {
        let tz = party.zone()?;
        let half_width = Duration::hours(self.config.nearby_window_hours);
        let min = target - half_width;
        let max = target + half_width;

        let mut events = self.provider_events(calendar, &tz, min, max)?;
        events.extend(self.store_events(party, &tz, min, max)?);

        match self.config.nearby_ordering {
            NearbyOrdering::Chronological => events.sort_by_key(|e| e.starting_at),
            NearbyOrdering::Proximity => {
                events.sort_by_key(|e| (e.starting_at.with_timezone(&Utc) - target).abs())
            }
        }
        events.truncate(self.config.nearby_limit);

        debug!(party = party.id, %target, found = events.len(), "nearby events");
        Ok(events)
    }

    /// Provider events fully inside `[min, max]`, first matches in listing order.
    fn provider_events(
        &self,
        calendar: &MemoizedProvider<'_>,
        tz: &Tz,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    ) -> Result<Vec<NearbyEvent>> {
        let mut found = Vec::new();

        for event in calendar.events()? {
            let start = event.start_instant()?.with_timezone(&Utc);
            let end = event.end_instant()?.with_timezone(&Utc);

            if start >= min && end <= max {
                found.push(NearbyEvent {
                    name: event.summary.clone(),
                    starting_at: start.with_timezone(tz),
                    ending_at: end.with_timezone(tz),
                });
            }

            if found.len() >= self.config.nearby_limit {
                break;
            }
        }

        Ok(found)
    }

    fn store_events(
        &self,
        party: &Party,
        tz: &Tz,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    ) -> Result<Vec<NearbyEvent>> {
        let meetings = self
            .store
            .attended_meetings(party, min, max, self.config.nearby_limit)?;
        let mut found = Vec::new();

        for meeting in meetings.iter().take(self.config.nearby_limit) {
            let start = meeting.start()?.with_timezone(&Utc);
            let end = meeting.end(self.config.meeting_minutes)?.with_timezone(&Utc);
            if start < min || end > max {
                continue;
            }
            found.push(NearbyEvent {
                name: meeting_name(meeting, party),
                starting_at: start.with_timezone(tz),
                ending_at: end.with_timezone(tz),
            });
        }

        Ok(found)
    }
}

/// Display name of a persisted meeting from `party`'s point of view.
pub fn meeting_name(meeting: &Commitment, party: &Party) -> String {
    if meeting.created_by != party.id {
        return format!("Meeting with {}", meeting.host.full_name);
    }
    match &meeting.applicant {
        Some(applicant) => format!("Meeting with {}", applicant.full_name),
        None if meeting.remote => "My remote meeting".to_string(),
        None => format!(
            "My meeting at {} {}, {}",
            meeting.address.street, meeting.address.street_number, meeting.address.city
        ),
    }
}
