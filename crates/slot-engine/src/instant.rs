//! Instant parsing, canonical formatting, and quarter-hour rounding.
//!
//! Every slot the engine produces or compares is a [`Instant`]: a
//! `chrono::DateTime` pinned to an IANA zone from `chrono-tz`. Raw timestamps
//! arriving from collaborators (store rows, provider payloads) are parsed here
//! and nowhere else, so a malformed value always surfaces as
//! [`SlotError::Parse`].

use crate::error::{Result, SlotError};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::Serializer;

/// A timezone-aware point in time on the slot grid.
pub type Instant = DateTime<Tz>;

/// Grid resolution in minutes.
pub const SLOT_MINUTES: i64 = 15;

/// Parse a timestamp delivered by a collaborator.
///
/// Accepts RFC 3339 (`2026-10-19T12:00:00+01:00`) and the naive forms
/// `2026-10-19 12:00:00` / `2026-10-19T12:00:00`, which are read as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|ndt| ndt.and_utc().fixed_offset())
        .ok_or_else(|| SlotError::Parse(format!("'{}' is not an RFC 3339 or naive datetime", s)))
}

/// Parse an IANA timezone identifier.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Zone with a constant whole-hour offset, expressed as an `Etc/GMT` zone.
///
/// `Etc/GMT` names use inverted signs: UTC+3 is `Etc/GMT-3`. Offsets outside
/// the tz database's `-12..=14` range are rejected.
pub fn fixed_hour_zone(offset_hours: i32) -> Result<Tz> {
    let name = match offset_hours {
        0 => "Etc/GMT".to_string(),
        h if h > 0 => format!("Etc/GMT-{}", h),
        h => format!("Etc/GMT+{}", -h),
    };
    parse_timezone(&name)
}

/// Canonical text form of an instant: RFC 3339, whole seconds, numeric offset.
pub fn format_instant<Z: TimeZone>(dt: &DateTime<Z>) -> String {
    dt.fixed_offset()
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Serde adapter writing an instant in its canonical text form.
pub fn serialize_instant<Z, S>(dt: &DateTime<Z>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    Z: TimeZone,
    S: Serializer,
{
    serializer.serialize_str(&format_instant(dt))
}

/// Whole-hour UTC offset of `tz` at `at`, truncated toward zero.
pub fn offset_hours_at(tz: &Tz, at: &DateTime<chrono::Utc>) -> i32 {
    use chrono::Offset;
    tz.offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc()
        / 3600
}

/// Time elapsed since the last quarter-hour mark on the local wall clock.
fn past_quarter<Z: TimeZone>(dt: &DateTime<Z>) -> Duration {
    let minutes = i64::from(dt.minute()) % SLOT_MINUTES;
    Duration::minutes(minutes)
        + Duration::seconds(i64::from(dt.second()))
        + Duration::nanoseconds(i64::from(dt.nanosecond()))
}

/// Round down to the previous quarter hour (unchanged if already aligned).
pub fn round_down_to_quarter_hour<Z: TimeZone>(dt: &DateTime<Z>) -> DateTime<Z> {
    dt.clone() - past_quarter(dt)
}

/// Round up to the next quarter hour (unchanged if already aligned).
pub fn round_up_to_quarter_hour<Z: TimeZone>(dt: &DateTime<Z>) -> DateTime<Z> {
    let past = past_quarter(dt);
    if past.is_zero() {
        dt.clone()
    } else {
        dt.clone() - past + Duration::minutes(SLOT_MINUTES)
    }
}

/// True when the instant sits exactly on the quarter-hour grid.
pub fn is_quarter_aligned<Z: TimeZone>(dt: &DateTime<Z>) -> bool {
    past_quarter(dt).is_zero()
}

/// `at` moved by `minutes`, or `SlotError::Config` when the result is not
/// representable.
pub fn shift_minutes(at: DateTime<FixedOffset>, minutes: i64) -> Result<DateTime<FixedOffset>> {
    Duration::try_minutes(minutes)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| SlotError::Config(format!("cannot shift {} by {} minutes", at, minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_rejects_unrepresentable_offsets() {
        let dt = parse_instant("2026-10-19T12:00:00+00:00").unwrap();
        assert_eq!(
            format_instant(&shift_minutes(dt, -15).unwrap()),
            "2026-10-19T11:45:00+00:00"
        );
        assert!(matches!(shift_minutes(dt, i64::MAX), Err(SlotError::Config(_))));
    }

    #[test]
    fn parses_rfc3339_and_naive_forms() {
        let a = parse_instant("2026-10-19T12:00:00+01:00").unwrap();
        let b = parse_instant("2026-10-19 11:00:00").unwrap();
        let c = parse_instant("2026-10-19T11:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_instant("next tuesday"), Err(SlotError::Parse(_))));
    }

    #[test]
    fn rounding_keeps_aligned_values() {
        let dt = parse_instant("2026-10-19T12:15:00+00:00").unwrap();
        assert_eq!(round_down_to_quarter_hour(&dt), dt);
        assert_eq!(round_up_to_quarter_hour(&dt), dt);
    }

    #[test]
    fn rounding_moves_to_grid() {
        let dt = parse_instant("2026-10-19T12:07:30+00:00").unwrap();
        assert_eq!(
            format_instant(&round_down_to_quarter_hour(&dt)),
            "2026-10-19T12:00:00+00:00"
        );
        assert_eq!(
            format_instant(&round_up_to_quarter_hour(&dt)),
            "2026-10-19T12:15:00+00:00"
        );
    }

    #[test]
    fn fixed_hour_zone_inverts_sign() {
        let tz = fixed_hour_zone(3).unwrap();
        assert_eq!(tz.name(), "Etc/GMT-3");
        assert_eq!(fixed_hour_zone(0).unwrap().name(), "Etc/GMT");
        assert!(fixed_hour_zone(20).is_err());
    }
}
