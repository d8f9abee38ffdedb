//! Mutual availability: grid minus occupied slots, bucketed by month, ISO week
//! and calendar date.
//!
//! [`SlotCalculator`] is the entry point. It wires the grid generator and the
//! event collector together for one host/applicant pair and returns an
//! [`AvailabilityMap`] whose buckets preserve chronological insertion order.
//! A horizon that crosses New Year therefore lists month 12 before month 1.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::collector::EventCollector;
use crate::config::SlotConfig;
use crate::error::Result;
use crate::grid;
use crate::instant::{self, Instant};
use crate::model::Party;
use crate::source::{CalendarProvider, ListParams, MeetingStore, MemoizedProvider};
use crate::suggest;

/// Available slots of one calendar date, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub slots: Vec<Instant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    /// ISO 8601 week number.
    pub week: u32,
    pub days: Vec<DayBucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// Month number, 1-12.
    pub month: u32,
    pub weeks: Vec<WeekBucket>,
}

/// Month -> ISO week -> date -> slots, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AvailabilityMap {
    months: Vec<MonthBucket>,
}

impl AvailabilityMap {
    /// Append a slot to the bucket for its own local month, week and date.
    pub fn insert(&mut self, slot: Instant) {
        let date = slot.date_naive();
        let month = date.month();
        let week = date.iso_week().week();

        let month_bucket = match self.months.iter().position(|m| m.month == month) {
            Some(i) => &mut self.months[i],
            None => {
                self.months.push(MonthBucket { month, weeks: Vec::new() });
                let last = self.months.len() - 1;
                &mut self.months[last]
            }
        };

        let week_bucket = match month_bucket.weeks.iter().position(|w| w.week == week) {
            Some(i) => &mut month_bucket.weeks[i],
            None => {
                month_bucket.weeks.push(WeekBucket { week, days: Vec::new() });
                let last = month_bucket.weeks.len() - 1;
                &mut month_bucket.weeks[last]
            }
        };

        match week_bucket.days.iter_mut().find(|d| d.date == date) {
            Some(day) => day.slots.push(slot),
            None => week_bucket.days.push(DayBucket { date, slots: vec![slot] }),
        }
    }

    pub fn months(&self) -> &[MonthBucket] {
        &self.months
    }

    /// Date buckets in iteration order (months, then weeks, then dates).
    pub fn days(&self) -> impl Iterator<Item = &DayBucket> {
        self.months
            .iter()
            .flat_map(|m| m.weeks.iter())
            .flat_map(|w| w.days.iter())
    }

    /// All slots in iteration order.
    pub fn slots(&self) -> impl Iterator<Item = &Instant> {
        self.days().flat_map(|d| d.slots.iter())
    }

    pub fn len(&self) -> usize {
        self.days().map(|d| d.slots.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl FromIterator<Instant> for AvailabilityMap {
    fn from_iter<I: IntoIterator<Item = Instant>>(iter: I) -> Self {
        let mut map = AvailabilityMap::default();
        for slot in iter {
            map.insert(slot);
        }
        map
    }
}

// ---------------------------------------------------------------------------
// Serialization: {"<month>": {"<week>": {"YYYY-MM-DD": ["<instant>", ...]}}}
// ---------------------------------------------------------------------------

struct Weeks<'a>(&'a [WeekBucket]);
struct Days<'a>(&'a [DayBucket]);
struct Slots<'a>(&'a [Instant]);

impl Serialize for AvailabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.months.len()))?;
        for month in &self.months {
            map.serialize_entry(&month.month, &Weeks(&month.weeks))?;
        }
        map.end()
    }
}

impl Serialize for Weeks<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for week in self.0 {
            map.serialize_entry(&week.week, &Days(&week.days))?;
        }
        map.end()
    }
}

impl Serialize for Days<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for day in self.0 {
            map.serialize_entry(&day.date.format("%Y-%m-%d").to_string(), &Slots(&day.slots))?;
        }
        map.end()
    }
}

impl Serialize for Slots<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for slot in self.0 {
            seq.serialize_element(&instant::format_instant(slot))?;
        }
        seq.end()
    }
}

/// Remove occupied slots from the grid and bucket the survivors.
///
/// The grid order is kept, so every date bucket is chronological as long as
/// the grid is.
pub fn compute_availability(grid: &[Instant], occupied: &BTreeSet<Instant>) -> AvailabilityMap {
    grid.iter()
        .filter(|slot| !occupied.contains(*slot))
        .copied()
        .collect()
}

/// Computes mutual availability for a host and an applicant.
///
/// The applicant's calendar provider and the host's are both optional; the
/// persisted meeting store is always consulted.
pub struct SlotCalculator<'a> {
    store: &'a dyn MeetingStore,
    applicant_calendar: Option<&'a dyn CalendarProvider>,
    host_calendar: Option<&'a dyn CalendarProvider>,
    timezone: Tz,
    config: SlotConfig,
}

impl<'a> SlotCalculator<'a> {
    /// Build a calculator displaying slots in `timezone` (the applicant's zone).
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if `timezone` is not an IANA identifier.
    pub fn new(store: &'a dyn MeetingStore, timezone: &str) -> Result<Self> {
        Ok(Self {
            store,
            applicant_calendar: None,
            host_calendar: None,
            timezone: instant::parse_timezone(timezone)?,
            config: SlotConfig::default(),
        })
    }

    pub fn with_applicant_calendar(mut self, calendar: &'a dyn CalendarProvider) -> Self {
        self.applicant_calendar = Some(calendar);
        self
    }

    pub fn with_host_calendar(mut self, calendar: &'a dyn CalendarProvider) -> Self {
        self.host_calendar = Some(calendar);
        self
    }

    pub fn with_config(mut self, config: SlotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Slots free for both parties over the configured horizon.
    ///
    /// `applicant` is `None` for an anonymous visitor; only their calendar
    /// provider (if any) is then consulted.
    ///
    /// # Errors
    /// Returns `SlotError::Config` for an invalid [`SlotConfig`] before any
    /// collaborator is called, and propagates store, provider and parse
    /// failures.
    pub fn available_slots(
        &self,
        host: &Party,
        applicant: Option<&Party>,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityMap> {
        self.config.validate()?;
        let params = ListParams::upcoming(now, self.config.provider_max_results);
        let collector = EventCollector::new(
            self.store,
            MemoizedProvider::new(self.applicant_calendar, params.clone()),
            MemoizedProvider::new(self.host_calendar, params),
            self.timezone,
            &self.config,
        );

        let occupied = collector.occupied(host, applicant)?;
        let grid = grid::generate(host, &self.timezone, now, &self.config)?;
        let available = compute_availability(&grid, &occupied);

        debug!(
            grid = grid.len(),
            occupied = occupied.len(),
            available = available.len(),
            "computed availability"
        );
        Ok(available)
    }

    /// Up to `suggestion_limit` suggestions drawn from `slots`.
    pub fn suggested_slots(&self, slots: &AvailabilityMap) -> Vec<Instant> {
        suggest::select_suggestions(slots, self.config.suggestion_limit)
    }
}
