//! `slots` CLI: compute meeting availability from a JSON scenario.
//!
//! ## Usage
//!
//! ```sh
//! # Month -> week -> date availability (stdin → stdout)
//! slots availability < scenario.json
//!
//! # Three suggested slots, reading from a file
//! slots suggest -i scenario.json
//!
//! # Events around a moment, from the host's point of view
//! slots nearby -i scenario.json --party host --at 2026-10-19T12:00:00Z
//!
//! # Suggested slots with the applicant's nearby events attached
//! slots suggested-times -i scenario.json --party applicant
//!
//! # Override tunables
//! slots availability -i scenario.json --config slots.json
//! ```
//!
//! A scenario looks like:
//!
//! ```json
//! {
//!   "now": "2026-10-19T08:00:00Z",
//!   "timezone": "Europe/Berlin",
//!   "host": {"id": 1, "full_name": "Hana", "utc_offset_hours": 0, "timezone": "UTC"},
//!   "applicant": {"id": 2, "full_name": "Abe", "utc_offset_hours": 1, "timezone": "Europe/Berlin"},
//!   "meetings": [],
//!   "applicant_events": [{"summary": "Gym", "start": "...", "end": "..."}],
//!   "host_events": null
//! }
//! ```
//!
//! Set `RUST_LOG=slot_engine=debug` to trace the computation on stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use slot_engine::instant::parse_instant;
use slot_engine::memory::{InMemoryStore, StaticCalendar};
use slot_engine::{
    CalendarProvider, Commitment, NearbyEventFinder, Party, ProviderEvent, SlotCalculator,
    SlotConfig,
};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Mutual meeting availability for a host and an applicant"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scenario JSON file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// JSON file with tunables (horizon_days, nearby_ordering, ...)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print available slots bucketed by month, ISO week and date
    Availability,
    /// Print the earliest slot of the first available days
    Suggest,
    /// Print existing events near a moment
    Nearby {
        /// Whose calendar and meetings to look at
        #[arg(long, value_enum)]
        party: Side,
        /// Target moment (RFC 3339)
        #[arg(long)]
        at: String,
    },
    /// Print suggested slots with their nearby events
    SuggestedTimes {
        /// Whose calendar and meetings to look at
        #[arg(long, value_enum)]
        party: Side,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Host,
    Applicant,
}

#[derive(Deserialize)]
struct Scenario {
    now: String,
    timezone: String,
    host: Party,
    #[serde(default)]
    applicant: Option<Party>,
    #[serde(default)]
    meetings: Vec<Commitment>,
    #[serde(default)]
    applicant_events: Option<Vec<ProviderEvent>>,
    #[serde(default)]
    host_events: Option<Vec<ProviderEvent>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let raw = read_input(cli.input.as_deref())?;
    let scenario: Scenario =
        serde_json::from_str(&raw).context("Failed to parse scenario JSON")?;
    let now: DateTime<Utc> = parse_instant(&scenario.now)
        .context("Invalid 'now' in scenario")?
        .with_timezone(&Utc);
    debug!(
        timezone = %scenario.timezone,
        meetings = scenario.meetings.len(),
        %now,
        "loaded scenario"
    );

    let store = InMemoryStore::new(scenario.meetings.clone());
    let applicant_calendar = scenario.applicant_events.clone().map(StaticCalendar::new);
    let host_calendar = scenario.host_events.clone().map(StaticCalendar::new);

    let mut calculator = SlotCalculator::new(&store, &scenario.timezone)
        .context("Invalid scenario timezone")?
        .with_config(config.clone());
    if let Some(calendar) = &applicant_calendar {
        calculator = calculator.with_applicant_calendar(calendar);
    }
    if let Some(calendar) = &host_calendar {
        calculator = calculator.with_host_calendar(calendar);
    }

    let json = match cli.command {
        Commands::Availability => {
            let slots = calculator
                .available_slots(&scenario.host, scenario.applicant.as_ref(), now)
                .context("Failed to compute availability")?;
            serde_json::to_string_pretty(&slots)?
        }
        Commands::Suggest => {
            let slots = calculator
                .available_slots(&scenario.host, scenario.applicant.as_ref(), now)
                .context("Failed to compute availability")?;
            let suggestions: Vec<String> = calculator
                .suggested_slots(&slots)
                .iter()
                .map(slot_engine::instant::format_instant)
                .collect();
            serde_json::to_string_pretty(&suggestions)?
        }
        Commands::Nearby { party, at } => {
            let (who, calendar) = side(&scenario, party, &applicant_calendar, &host_calendar)?;
            let target = parse_instant(&at).with_context(|| format!("Invalid --at: {}", at))?;
            let events = NearbyEventFinder::new(&store, calendar)
                .with_config(config)
                .other_events(who, &target, now)
                .context("Failed to look up nearby events")?;
            serde_json::to_string_pretty(&events)?
        }
        Commands::SuggestedTimes { party } => {
            let slots = calculator
                .available_slots(&scenario.host, scenario.applicant.as_ref(), now)
                .context("Failed to compute availability")?;
            let suggestions = calculator.suggested_slots(&slots);
            let (who, calendar) = side(&scenario, party, &applicant_calendar, &host_calendar)?;
            let times = NearbyEventFinder::new(&store, calendar)
                .with_config(config)
                .suggested_times(who, &suggestions, now)
                .context("Failed to look up nearby events")?;
            serde_json::to_string_pretty(&times)?
        }
    };

    write_output(cli.output.as_deref(), &json)
}

/// The party and calendar for the requested side of the scenario.
fn side<'a>(
    scenario: &'a Scenario,
    which: Side,
    applicant_calendar: &'a Option<StaticCalendar>,
    host_calendar: &'a Option<StaticCalendar>,
) -> Result<(&'a Party, Option<&'a dyn CalendarProvider>)> {
    match which {
        Side::Host => Ok((
            &scenario.host,
            host_calendar.as_ref().map(|c| c as &dyn CalendarProvider),
        )),
        Side::Applicant => {
            let applicant = scenario
                .applicant
                .as_ref()
                .context("Scenario has no applicant")?;
            Ok((
                applicant,
                applicant_calendar.as_ref().map(|c| c as &dyn CalendarProvider),
            ))
        }
    }
}

fn load_config(path: Option<&str>) -> Result<SlotConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            let config: SlotConfig = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid config: {}", path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config: {}", path))?;
            Ok(config)
        }
        None => Ok(SlotConfig::default()),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
