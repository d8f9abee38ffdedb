//! Occupied-slot collection across the two event sources.
//!
//! For each party role the collector unions the ticks of persisted meetings
//! (when the party is known) with the ticks of provider events (when that role
//! has a calendar configured). Missing sources simply contribute nothing.

use std::collections::BTreeSet;

use chrono_tz::Tz;
use tracing::debug;

use crate::config::SlotConfig;
use crate::error::Result;
use crate::expander::{expand_commitment, expand_provider_event};
use crate::instant::Instant;
use crate::model::Party;
use crate::source::{MeetingStore, MemoizedProvider};

/// Which side of the negotiation a party is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Applicant,
}

pub struct EventCollector<'a> {
    store: &'a dyn MeetingStore,
    applicant_calendar: MemoizedProvider<'a>,
    host_calendar: MemoizedProvider<'a>,
    display_tz: Tz,
    meeting_minutes: i64,
    buffer_minutes: i64,
}

impl<'a> EventCollector<'a> {
    pub fn new(
        store: &'a dyn MeetingStore,
        applicant_calendar: MemoizedProvider<'a>,
        host_calendar: MemoizedProvider<'a>,
        display_tz: Tz,
        config: &SlotConfig,
    ) -> Self {
        Self {
            store,
            applicant_calendar,
            host_calendar,
            display_tz,
            meeting_minutes: config.meeting_minutes,
            buffer_minutes: config.buffer_minutes,
        }
    }

    fn calendar(&self, role: Role) -> &MemoizedProvider<'a> {
        match role {
            Role::Host => &self.host_calendar,
            Role::Applicant => &self.applicant_calendar,
        }
    }

    /// Occupied ticks for one role.
    ///
    /// `party` is `None` when the applicant has not identified themselves yet; in
    /// that case only provider events count.
    pub fn collect(&self, party: Option<&Party>, role: Role) -> Result<BTreeSet<Instant>> {
        let mut occupied = BTreeSet::new();

        if let Some(party) = party {
            for meeting in self.store.meetings_for_party(party)? {
                occupied.extend(expand_commitment(
                    &meeting,
                    &self.display_tz,
                    self.meeting_minutes,
                    self.buffer_minutes,
                )?);
            }
        }

        let calendar = self.calendar(role);
        if calendar.is_configured() {
            for event in calendar.events()? {
                occupied.extend(expand_provider_event(
                    event,
                    &self.display_tz,
                    self.buffer_minutes,
                )?);
            }
        }

        debug!(?role, occupied = occupied.len(), "collected occupied slots");
        Ok(occupied)
    }

    /// Union of host and applicant occupied ticks.
    pub fn occupied(&self, host: &Party, applicant: Option<&Party>) -> Result<BTreeSet<Instant>> {
        let mut all = self.collect(applicant, Role::Applicant)?;
        all.extend(self.collect(Some(host), Role::Host)?);
        Ok(all)
    }
}
