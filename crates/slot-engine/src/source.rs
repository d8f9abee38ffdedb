//! Collaborator interfaces: the external calendar provider and the persisted
//! meeting store.
//!
//! A party role either has a provider or it does not; the absence is modelled
//! as `Option<&dyn CalendarProvider>` and degrades to "no provider events".

use std::cell::OnceCell;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::model::{Commitment, Party, ProviderEvent};

/// Query parameters sent with every provider listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub max_results: u32,
    /// Ask the provider to order by start time.
    pub order_by_start_time: bool,
    /// Expand recurring series into single instances.
    pub single_events: bool,
    /// Lower bound on event end time.
    pub time_min: DateTime<Utc>,
}

impl ListParams {
    /// Upcoming single events from `now` on, ordered by start time.
    pub fn upcoming(now: DateTime<Utc>, max_results: u32) -> Self {
        Self {
            max_results,
            order_by_start_time: true,
            single_events: true,
            time_min: now,
        }
    }
}

/// An external calendar (e.g. a Google account) that can list events.
pub trait CalendarProvider {
    /// List events in provider order. Failures map to `SlotError::Provider`.
    fn list_events(&self, params: &ListParams) -> Result<Vec<ProviderEvent>>;
}

/// Read access to meetings booked through the application.
pub trait MeetingStore {
    /// Every meeting the party takes part in.
    fn meetings_for_party(&self, party: &Party) -> Result<Vec<Commitment>>;

    /// Meetings the party attends starting within `[min, max]`, at most `limit`.
    fn attended_meetings(
        &self,
        party: &Party,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Commitment>>;
}

/// A provider listing fetched at most once per top-level computation.
pub struct MemoizedProvider<'a> {
    inner: Option<&'a dyn CalendarProvider>,
    params: ListParams,
    cache: OnceCell<Vec<ProviderEvent>>,
}

impl<'a> MemoizedProvider<'a> {
    pub fn new(inner: Option<&'a dyn CalendarProvider>, params: ListParams) -> Self {
        Self {
            inner,
            params,
            cache: OnceCell::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// The provider's events, listing it on first use.
    pub fn events(&self) -> Result<&[ProviderEvent]> {
        if self.cache.get().is_none() {
            let events = match self.inner {
                Some(provider) => provider.list_events(&self.params)?,
                None => Vec::new(),
            };
            debug!(count = events.len(), "listed provider events");
            let _ = self.cache.set(events);
        }
        Ok(self.cache.get().map(Vec::as_slice).unwrap_or(&[]))
    }
}
