//! Tests for the candidate slot grid.

use chrono::{Datelike, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use slot_engine::grid::generate;
use slot_engine::instant::format_instant;
use slot_engine::{Party, SlotConfig};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn host(utc_offset_hours: i32, timezone: &str) -> Party {
    Party {
        id: 1,
        full_name: "Hana Host".to_string(),
        utc_offset_hours,
        timezone: timezone.to_string(),
    }
}

fn tz(name: &str) -> Tz {
    name.parse().unwrap()
}

fn one_day() -> SlotConfig {
    SlotConfig {
        horizon_days: 1,
        ..SlotConfig::default()
    }
}

// ── Applicant ahead of host ─────────────────────────────────────────────────

#[test]
fn applicant_one_hour_ahead_starts_at_eleven() {
    // 08:00 UTC = 09:00 in Berlin, before the window opens.
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 8, 0, 0).unwrap();
    let slots = generate(&host(0, "UTC"), &tz("Europe/Berlin"), now, &one_day()).unwrap();

    // Applicant 10:00 is host 09:00, excluded; applicant 11:00 is host 10:00.
    assert_eq!(format_instant(&slots[0]), "2026-01-12T11:00:00+01:00");
    assert_eq!(format_instant(slots.last().unwrap()), "2026-01-12T20:00:00+01:00");
    assert_eq!(slots.len(), 37);
}

#[test]
fn applicant_behind_host_ends_early() {
    // Applicant in New York (UTC-5), host in London (UTC+0) in January.
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 12, 0, 0).unwrap(); // 07:00 in New York
    let slots = generate(&host(0, "Europe/London"), &tz("America/New_York"), now, &one_day()).unwrap();

    // Host 20:00 is applicant 15:00, the last included tick.
    assert_eq!(format_instant(&slots[0]), "2026-01-12T10:00:00-05:00");
    assert_eq!(format_instant(slots.last().unwrap()), "2026-01-12T15:00:00-05:00");
    assert_eq!(slots.len(), 21);
}

#[test]
fn fourteen_hours_apart_meet_at_one_tick() {
    // Tokyo (UTC+9) applicant, New York (UTC-5) host. Tokyo 10:00 on the 12th
    // is 20:00 on the 11th in New York, the host's last working tick.
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 0, 0, 0).unwrap();
    let slots = generate(&host(-5, "America/New_York"), &tz("Asia/Tokyo"), now, &one_day()).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(format_instant(&slots[0]), "2026-01-12T10:00:00+09:00");
}

// ── Day zero clipping ───────────────────────────────────────────────────────

#[test]
fn window_already_open_starts_at_next_quarter() {
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 13, 7, 12).unwrap();
    let slots = generate(&host(0, "UTC"), &tz("UTC"), now, &one_day()).unwrap();
    assert_eq!(format_instant(&slots[0]), "2026-01-12T13:15:00+00:00");
    assert_eq!(format_instant(slots.last().unwrap()), "2026-01-12T20:00:00+00:00");
}

#[test]
fn aligned_now_is_kept() {
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap();
    let slots = generate(&host(0, "UTC"), &tz("UTC"), now, &one_day()).unwrap();
    assert_eq!(format_instant(&slots[0]), "2026-01-12T10:00:00+00:00");
    assert_eq!(slots.len(), 41);
}

#[test]
fn after_window_closes_today_is_empty() {
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 20, 1, 0).unwrap();
    let config = SlotConfig {
        horizon_days: 2,
        ..SlotConfig::default()
    };
    let slots = generate(&host(0, "UTC"), &tz("UTC"), now, &config).unwrap();
    assert!(slots.iter().all(|s| s.day() == 13));
    assert_eq!(format_instant(&slots[0]), "2026-01-13T10:00:00+00:00");
}

#[test]
fn clipping_only_applies_to_day_zero() {
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 15, 0, 0).unwrap();
    let config = SlotConfig {
        horizon_days: 2,
        ..SlotConfig::default()
    };
    let slots = generate(&host(0, "UTC"), &tz("UTC"), now, &config).unwrap();
    let tomorrow: Vec<_> = slots.iter().filter(|s| s.day() == 13).collect();
    assert_eq!(tomorrow[0].hour(), 10);
    assert_eq!(tomorrow.len(), 41);
}

// ── Horizon ─────────────────────────────────────────────────────────────────

#[test]
fn default_horizon_covers_twenty_days() {
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 6, 0, 0).unwrap();
    let slots = generate(&host(0, "UTC"), &tz("UTC"), now, &SlotConfig::default()).unwrap();
    let first = slots[0].date_naive();
    let last = slots.last().unwrap().date_naive();
    assert_eq!(first, now.date_naive());
    assert_eq!(last - first, Duration::days(19));
    assert_eq!(slots.len(), 20 * 41);
}

#[test]
fn grid_is_strictly_ascending() {
    let now = Utc.with_ymd_and_hms(2026, 3, 20, 6, 0, 0).unwrap();
    let slots = generate(&host(1, "Europe/Berlin"), &tz("Europe/London"), now, &SlotConfig::default()).unwrap();
    assert!(slots.windows(2).all(|w| w[0] < w[1]));
}

// ── Host day anchoring ──────────────────────────────────────────────────────

#[test]
fn host_without_zone_falls_back_to_offset() {
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 8, 0, 0).unwrap();
    let with_zone = generate(&host(0, "UTC"), &tz("Europe/Berlin"), now, &one_day()).unwrap();
    let without_zone = generate(&host(0, ""), &tz("Europe/Berlin"), now, &one_day()).unwrap();
    assert_eq!(with_zone, without_zone);
}

#[test]
fn host_day_is_anchored_on_host_date() {
    // 23:30 UTC on the 12th is already the 13th in Tokyo but still the 12th
    // for a UTC host. Applicant day 0 (the 13th, 10:00-20:00) maps to host
    // wall times 01:00-11:00 on the 13th, none of which fall in host day 0.
    let now = Utc.with_ymd_and_hms(2026, 1, 12, 23, 30, 0).unwrap();
    let slots = generate(&host(0, "UTC"), &tz("Asia/Tokyo"), now, &one_day()).unwrap();
    assert!(slots.is_empty());
}
