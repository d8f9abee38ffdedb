//! Tunables for slot computation.
//!
//! Every field has a default matching the production behaviour, so an empty
//! JSON object (`{}`) deserializes to [`SlotConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Longest horizon whose dates never repeat a month number.
///
/// From the last day of a 31-day month, day 335 is the first day of the same
/// month one year later.
pub const MAX_HORIZON_DAYS: u32 = 335;

const MINUTES_PER_DAY: i64 = 24 * 60;
const MAX_NEARBY_WINDOW_HOURS: i64 = 7 * 24;

/// How nearby events are ranked before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearbyOrdering {
    /// Ascending by start time, regardless of distance to the target.
    #[default]
    Chronological,
    /// Ascending by absolute distance between start time and the target.
    Proximity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Number of days in the grid, starting today.
    pub horizon_days: u32,
    /// First bookable local hour for both parties.
    pub day_start_hour: u32,
    /// Last bookable local hour (the tick on this hour is included).
    pub day_end_hour: u32,
    /// Length of a persisted meeting.
    pub meeting_minutes: i64,
    /// Setup time blocked before every busy interval.
    pub buffer_minutes: i64,
    /// Half-width of the window searched for nearby events.
    pub nearby_window_hours: i64,
    pub nearby_limit: usize,
    pub suggestion_limit: usize,
    pub nearby_ordering: NearbyOrdering,
    /// Page size requested from calendar providers.
    pub provider_max_results: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            horizon_days: 20,
            day_start_hour: 10,
            day_end_hour: 20,
            meeting_minutes: 30,
            buffer_minutes: 15,
            nearby_window_hours: 8,
            nearby_limit: 3,
            suggestion_limit: 3,
            nearby_ordering: NearbyOrdering::Chronological,
            provider_max_results: 100,
        }
    }
}

impl SlotConfig {
    /// Reject values the engine cannot compute with.
    ///
    /// # Errors
    /// Returns `SlotError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.day_start_hour > 23 || self.day_end_hour > 23 {
            return Err(SlotError::Config(format!(
                "working hours {}-{} must lie within 0-23",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.day_start_hour > self.day_end_hour {
            return Err(SlotError::Config(format!(
                "day_start_hour {} is after day_end_hour {}",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(SlotError::Config(format!(
                "horizon_days {} exceeds {}",
                self.horizon_days, MAX_HORIZON_DAYS
            )));
        }
        check_range("meeting_minutes", self.meeting_minutes, 1, MINUTES_PER_DAY)?;
        check_range("buffer_minutes", self.buffer_minutes, 0, MINUTES_PER_DAY)?;
        check_range(
            "nearby_window_hours",
            self.nearby_window_hours,
            0,
            MAX_NEARBY_WINDOW_HOURS,
        )
    }
}

fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SlotError::Config(format!(
            "{} {} is outside {}..={}",
            field, value, min, max
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: SlotConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SlotConfig::default());
    }

    #[test]
    fn ordering_is_snake_case() {
        let config: SlotConfig =
            serde_json::from_str(r#"{"nearby_ordering":"proximity","horizon_days":5}"#).unwrap();
        assert_eq!(config.nearby_ordering, NearbyOrdering::Proximity);
        assert_eq!(config.horizon_days, 5);
        assert_eq!(config.day_start_hour, 10);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SlotConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        for json in [
            r#"{"nearby_window_hours":9223372036854775807}"#,
            r#"{"meeting_minutes":0}"#,
            r#"{"buffer_minutes":-15}"#,
            r#"{"day_end_hour":24}"#,
            r#"{"day_start_hour":21}"#,
        ] {
            let config: SlotConfig = serde_json::from_str(json).unwrap();
            assert!(
                matches!(config.validate(), Err(SlotError::Config(_))),
                "{} should be rejected",
                json
            );
        }
    }

    #[test]
    fn horizon_may_not_repeat_a_month() {
        let longest = SlotConfig {
            horizon_days: MAX_HORIZON_DAYS,
            ..SlotConfig::default()
        };
        assert!(longest.validate().is_ok());

        let too_long = SlotConfig {
            horizon_days: MAX_HORIZON_DAYS + 1,
            ..SlotConfig::default()
        };
        assert!(matches!(too_long.validate(), Err(SlotError::Config(_))));
    }
}
