//! Domain records supplied by collaborators and produced by the engine.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::instant::{self, Instant};

/// A participant in a meeting negotiation (host or applicant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: u64,
    #[serde(default)]
    pub full_name: String,
    /// Whole-hour UTC offset as recorded on the account.
    pub utc_offset_hours: i32,
    /// IANA timezone identifier, e.g. "Europe/London".
    #[serde(default)]
    pub timezone: String,
}

impl Party {
    /// The zone used for this party's calendar days.
    ///
    /// The timezone identifier wins when it names a real IANA zone; otherwise
    /// the day boundary falls back to the recorded whole-hour offset.
    pub fn zone(&self) -> Result<Tz> {
        instant::parse_timezone(&self.timezone)
            .or_else(|_| instant::fixed_hour_zone(self.utc_offset_hours))
    }
}

/// Lightweight reference to a party attached to a commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRef {
    pub id: u64,
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub street_number: String,
    #[serde(default)]
    pub city: String,
}

/// A meeting already booked in the persisted store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub id: u64,
    pub host: PartyRef,
    #[serde(default)]
    pub applicant: Option<PartyRef>,
    /// Raw store timestamp, parsed lazily by [`Commitment::start`].
    pub starting_at: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub address: Address,
    /// Id of the party that created the meeting.
    pub created_by: u64,
}

impl Commitment {
    pub fn start(&self) -> Result<DateTime<FixedOffset>> {
        instant::parse_instant(&self.starting_at)
    }

    pub fn end(&self, meeting_minutes: i64) -> Result<DateTime<FixedOffset>> {
        instant::shift_minutes(self.start()?, meeting_minutes)
    }

    /// True when the commitment involves the given party in any role.
    pub fn involves(&self, party_id: u64) -> bool {
        self.host.id == party_id
            || self.created_by == party_id
            || self.applicant.as_ref().is_some_and(|a| a.id == party_id)
    }
}

/// An event as listed by an external calendar provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEvent {
    #[serde(default)]
    pub summary: String,
    pub start: String,
    pub end: String,
}

impl ProviderEvent {
    pub fn start_instant(&self) -> Result<DateTime<FixedOffset>> {
        instant::parse_instant(&self.start)
    }

    pub fn end_instant(&self) -> Result<DateTime<FixedOffset>> {
        instant::parse_instant(&self.end)
    }
}

/// An existing commitment shown next to a proposed slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyEvent {
    pub name: String,
    #[serde(serialize_with = "instant::serialize_instant")]
    pub starting_at: Instant,
    #[serde(serialize_with = "instant::serialize_instant")]
    pub ending_at: Instant,
}

/// A proposed slot together with the commitments around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedTime {
    #[serde(serialize_with = "instant::serialize_instant")]
    pub suggested_time: Instant,
    pub other_events: Vec<NearbyEvent>,
}
