//! # slot-engine
//!
//! Mutual meeting availability for a host and an applicant in different time
//! zones.
//!
//! The engine builds a grid of quarter-hour slots over a rolling 20-day window,
//! keeps only the slots that fall inside both parties' 10:00-20:00 working
//! hours, removes slots occupied by existing meetings (from the persisted store
//! and, optionally, each party's external calendar), and buckets the rest into
//! a month -> week -> date calendar. The current moment is always passed in;
//! nothing here reads the wall clock.
//!
//! ## Modules
//!
//! - [`availability`] — `SlotCalculator`, grid minus occupied, `AvailabilityMap`
//! - [`grid`] — Candidate slot grid filtered by host working hours
//! - [`collector`] — Occupied slots per party role from both sources
//! - [`expander`] — Buffered busy interval → occupied quarter-hour ticks
//! - [`suggest`] — Earliest slot of the first available days
//! - [`nearby`] — Existing commitments around a proposed slot
//! - [`source`] — Calendar provider and meeting store interfaces
//! - [`memory`] — In-memory store and provider
//! - [`instant`] — Parsing, canonical formatting, quarter-hour rounding
//! - [`model`] — Parties, commitments, provider events
//! - [`config`] — Tunables
//! - [`error`] — Error types

pub mod availability;
pub mod collector;
pub mod config;
pub mod error;
pub mod expander;
pub mod grid;
pub mod instant;
pub mod memory;
pub mod model;
pub mod nearby;
pub mod source;
pub mod suggest;

pub use availability::{compute_availability, AvailabilityMap, SlotCalculator};
pub use config::{NearbyOrdering, SlotConfig};
pub use error::SlotError;
pub use instant::Instant;
pub use model::{Commitment, NearbyEvent, Party, ProviderEvent, SuggestedTime};
pub use nearby::NearbyEventFinder;
pub use source::{CalendarProvider, ListParams, MeetingStore};
pub use suggest::select_suggestions;
