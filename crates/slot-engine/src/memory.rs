//! In-memory collaborators backed by plain vectors.
//!
//! Used by the `slots` CLI (which reads everything from a JSON document) and by
//! tests. Behaviour mirrors what the real store and provider do with their
//! query parameters.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{Commitment, Party, ProviderEvent};
use crate::source::{CalendarProvider, ListParams, MeetingStore};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    meetings: Vec<Commitment>,
}

impl InMemoryStore {
    pub fn new(meetings: Vec<Commitment>) -> Self {
        Self { meetings }
    }
}

impl MeetingStore for InMemoryStore {
    fn meetings_for_party(&self, party: &Party) -> Result<Vec<Commitment>> {
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.involves(party.id))
            .cloned()
            .collect())
    }

    fn attended_meetings(
        &self,
        party: &Party,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Commitment>> {
        let mut matching = Vec::new();
        for meeting in self.meetings.iter().filter(|m| m.involves(party.id)) {
            let start = meeting.start()?.with_timezone(&Utc);
            if start >= min && start <= max {
                matching.push((start, meeting.clone()));
            }
        }
        matching.sort_by_key(|(start, _)| *start);
        Ok(matching.into_iter().take(limit).map(|(_, m)| m).collect())
    }
}

/// A provider whose listing is fixed up front.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    events: Vec<ProviderEvent>,
}

impl StaticCalendar {
    pub fn new(events: Vec<ProviderEvent>) -> Self {
        Self { events }
    }
}

impl CalendarProvider for StaticCalendar {
    /// Events in stored order, minus those already over at `time_min`.
    ///
    /// Events with an unparseable end are passed through untouched so the
    /// engine reports them.
    fn list_events(&self, params: &ListParams) -> Result<Vec<ProviderEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.end_instant().map_or(true, |end| end.with_timezone(&Utc) >= params.time_min))
            .take(params.max_results as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartyRef;
    use chrono::TimeZone;

    fn meeting(id: u64, host: u64, starting_at: &str) -> Commitment {
        Commitment {
            id,
            host: PartyRef { id: host, full_name: "Host".to_string() },
            applicant: None,
            starting_at: starting_at.to_string(),
            remote: true,
            address: Default::default(),
            created_by: host,
        }
    }

    fn party(id: u64) -> Party {
        Party {
            id,
            full_name: String::new(),
            utc_offset_hours: 0,
            timezone: "UTC".to_string(),
        }
    }

    #[test]
    fn attended_meetings_are_windowed_sorted_and_capped() {
        let store = InMemoryStore::new(vec![
            meeting(1, 7, "2026-10-19 15:00:00"),
            meeting(2, 7, "2026-10-19 11:00:00"),
            meeting(3, 7, "2026-10-19 13:00:00"),
            meeting(4, 7, "2026-10-19 12:00:00"),
            meeting(5, 8, "2026-10-19 12:00:00"),
            meeting(6, 7, "2026-10-21 12:00:00"),
        ]);
        let min = Utc.with_ymd_and_hms(2026, 10, 19, 4, 0, 0).unwrap();
        let max = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
        let ids: Vec<u64> = store
            .attended_meetings(&party(7), min, max, 3)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn static_calendar_drops_past_events() {
        let calendar = StaticCalendar::new(vec![
            ProviderEvent {
                summary: "old".to_string(),
                start: "2026-10-01T09:00:00Z".to_string(),
                end: "2026-10-01T10:00:00Z".to_string(),
            },
            ProviderEvent {
                summary: "new".to_string(),
                start: "2026-10-20T09:00:00Z".to_string(),
                end: "2026-10-20T10:00:00Z".to_string(),
            },
        ]);
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let listed = calendar.list_events(&ListParams::upcoming(now, 100)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].summary, "new");
    }
}
