//! Candidate slot grid for the applicant's viewing window.
//!
//! For every day of the horizon the applicant's 10:00-20:00 window is walked in
//! quarter-hour steps. A tick is kept only when the same moment, shifted by the
//! whole-hour difference between the parties' UTC offsets, also lands inside
//! the host's own 10:00-20:00 working day.
//!
//! Example: host at UTC+0, applicant at UTC+1. The applicant's 10:00 is 09:00
//! for the host, so the applicant's first bookable tick is 11:00.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::config::SlotConfig;
use crate::error::{Result, SlotError};
use crate::instant::{offset_hours_at, round_up_to_quarter_hour, Instant, SLOT_MINUTES};
use crate::model::Party;

/// Generate the chronologically ordered candidate grid.
///
/// # Arguments
/// - `host` -- supplies the whole-hour offset and the zone anchoring host days
/// - `applicant_tz` -- the zone the grid is generated (and displayed) in
/// - `now` -- the current moment; day 0 is today in `applicant_tz`
///
/// # Errors
/// Returns `SlotError::Config` if `config` fails [`SlotConfig::validate`],
/// and `SlotError::InvalidTimezone` if the host has neither a
/// valid zone nor a representable offset.
pub fn generate(
    host: &Party,
    applicant_tz: &Tz,
    now: DateTime<Utc>,
    config: &SlotConfig,
) -> Result<Vec<Instant>> {
    config.validate()?;
    let day_start = hour_of_day(config.day_start_hour)?;
    let day_end = hour_of_day(config.day_end_hour)?;

    let now_local = now.with_timezone(applicant_tz);
    let applicant_today = now_local.date_naive();

    // Integer offsets only: half-hour zones are truncated toward zero.
    let timezone_diff_hours = host.utc_offset_hours - offset_hours_at(applicant_tz, &now);
    let host_shift = Duration::hours(i64::from(timezone_diff_hours));

    let host_today = now.with_timezone(&host.zone()?).date_naive();
    let step = Duration::minutes(SLOT_MINUTES);

    let mut slots = Vec::new();

    for d in 0..config.horizon_days {
        let (Some(date), Some(host_date)) = (add_days(applicant_today, d), add_days(host_today, d))
        else {
            break;
        };

        let (Some(window_open), Some(window_close)) = (
            resolve_local(applicant_tz, date.and_time(day_start)),
            resolve_local(applicant_tz, date.and_time(day_end)),
        ) else {
            debug!(%date, "working window does not exist locally, skipping day");
            continue;
        };

        // Today, once the window has opened, starts at the next quarter hour.
        let window_start = if d == 0 && now_local >= window_open {
            round_up_to_quarter_hour(&now_local)
        } else {
            window_open
        };

        let host_open = host_date.and_time(day_start);
        let host_close = host_date.and_time(day_end);

        let mut current = window_start;
        while current <= window_close {
            let host_wall = current.naive_local() + host_shift;
            if host_open <= host_wall && host_wall <= host_close {
                slots.push(current);
            } else {
                trace!(slot = %current, %host_wall, "outside host working hours");
            }
            current += step;
        }
    }

    debug!(
        slots = slots.len(),
        timezone_diff_hours,
        horizon_days = config.horizon_days,
        "generated slot grid"
    );
    Ok(slots)
}

fn hour_of_day(hour: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| SlotError::Config(format!("{} is not an hour of the day", hour)))
}

fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

/// Map a local wall-clock time to an instant, taking the earlier reading of an
/// ambiguous time and skipping forward an hour across a gap.
fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Option<Instant> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
}
