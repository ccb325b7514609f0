//! `staycal` CLI — inspect a listing's booking calendar from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Disabled days of a listing for August (config from file)
//! staycal disabled -c listing.json --from 2025-08-01 --to 2025-08-31
//!
//! # Same, with a pending check-in, as JSON, at a fixed listing-local time
//! staycal disabled -c listing.json --from 2025-08-01 --to 2025-08-31 \
//!   --check-in 2025-08-10 --now 2025-08-01T10:00:00 --json
//!
//! # Replay a sequence of clicks and show every transition
//! cat listing.json | staycal select --clicks 2025-08-10,2025-08-15
//!
//! # Check whether a range is bookable (exit code 1 if not)
//! staycal check -c listing.json --from 2025-08-10 --to 2025-08-12
//! ```
//!
//! Logging goes to stderr; set `STAYCAL_LOG=debug` to see engine decisions.

use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use stay_calendar::{
    is_bookable, is_disabled, is_range_free_of_blocked_nights, is_valid_complete_range, nights,
    BookingCalendar, CalendarDay, Clock, ListingConfig, RangeChange, SelectionState,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "staycal",
    version,
    about = "Booking calendar availability inspector"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ListingArgs {
    /// Listing config JSON (reads from stdin if omitted)
    #[arg(short, long)]
    config: Option<String>,
    /// Current time: RFC 3339 instant, or a listing-local `YYYY-MM-DDTHH:MM:SS`.
    /// Defaults to the system clock.
    #[arg(long)]
    now: Option<String>,
    /// Emit JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List disabled days in an inclusive span
    Disabled {
        #[command(flatten)]
        listing: ListingArgs,
        /// First day of the span (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day of the span (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Pending or committed check-in to evaluate against
        #[arg(long)]
        check_in: Option<String>,
        /// Committed check-out to evaluate against
        #[arg(long)]
        check_out: Option<String>,
    },
    /// Replay day clicks through the selection state machine
    Select {
        #[command(flatten)]
        listing: ListingArgs,
        /// Comma-separated days to click, in order
        #[arg(long)]
        clicks: String,
        /// Initial check-in (as if deep-linked)
        #[arg(long)]
        seed_in: Option<String>,
        /// Initial check-out (as if deep-linked)
        #[arg(long)]
        seed_out: Option<String>,
    },
    /// Check whether a complete range is bookable
    Check {
        #[command(flatten)]
        listing: ListingArgs,
        /// Check-in day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Check-out day (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Disabled {
            listing,
            from,
            to,
            check_in,
            check_out,
        } => {
            let (first, last) = (parse_day(&from)?, parse_day(&to)?);
            let calendar = load_calendar(&listing)?
                .with_seed(parse_opt_day(check_in.as_deref())?, parse_opt_day(check_out.as_deref())?);
            let days = calendar.disabled_days(first, last);

            if listing.json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                for day in days {
                    println!("{}", day);
                }
            }
        }
        Commands::Select {
            listing,
            clicks,
            seed_in,
            seed_out,
        } => {
            let clicks = parse_clicks(&clicks)?;
            let mut calendar = load_calendar(&listing)?
                .with_seed(parse_opt_day(seed_in.as_deref())?, parse_opt_day(seed_out.as_deref())?);

            let mut steps = Vec::new();
            for day in clicks {
                let emitted = calendar.select(day);
                steps.push((day, calendar.state(), emitted));
            }

            if listing.json {
                let steps: Vec<_> = steps
                    .iter()
                    .map(|(day, state, emitted)| json!({ "click": day, "state": state, "emitted": emitted }))
                    .collect();
                let out = json!({ "steps": steps, "final": calendar.state() });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (day, state, emitted) in &steps {
                    println!("{} -> {} ({})", day, describe_state(state), describe_change(emitted));
                }
                println!("final: {}", describe_state(&calendar.state()));
            }
        }
        Commands::Check { listing, from, to } => {
            let (from, to) = (parse_day(&from)?, parse_day(&to)?);
            let calendar = load_calendar(&listing)?;
            let ctx = calendar.context();

            let check_in_open = !is_disabled(&ctx, SelectionState::Empty, from);
            let valid_length = is_valid_complete_range(&ctx, from, to);
            let free = is_range_free_of_blocked_nights(&ctx, from, to);
            let bookable = is_bookable(&ctx, from, to);

            if listing.json {
                let out = json!({
                    "from": from,
                    "to": to,
                    "nights": nights(from, to),
                    "checkInAvailable": check_in_open,
                    "validLength": valid_length,
                    "freeOfBlockedNights": free,
                    "bookable": bookable,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if bookable {
                println!("bookable: {} -> {} ({} nights)", from, to, nights(from, to));
            } else {
                println!("not bookable: {} -> {}", from, to);
                if from >= to {
                    println!("  check-out must be after check-in");
                }
                if !check_in_open {
                    println!("  check-in day is not available");
                }
                if !valid_length {
                    println!("  length or check-out weekday violates listing rules");
                }
                if !free {
                    println!("  range crosses unavailable nights");
                }
                if from < to && check_in_open && valid_length && free {
                    println!("  check-out day is beyond the booking window");
                }
            }

            if !bookable {
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("STAYCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_calendar(args: &ListingArgs) -> Result<BookingCalendar> {
    let raw = read_input(args.config.as_deref())?;
    let config = ListingConfig::from_json(&raw).context("Failed to parse listing config")?;
    let clock = build_clock(&config, args.now.as_deref())?;
    tracing::debug!(now = %clock.now(), timezone = config.timezone(), "loaded listing");
    Ok(BookingCalendar::from_config(&config, clock))
}

/// RFC 3339 instants are converted into the listing timezone; naive datetimes
/// are taken as listing-local already.
fn build_clock(config: &ListingConfig, now: Option<&str>) -> Result<Clock> {
    let Some(now) = now else {
        return Clock::system(config.timezone()).context("Failed to read system clock");
    };
    if let Ok(instant) = DateTime::parse_from_rfc3339(now) {
        return Clock::in_timezone(instant.with_timezone(&Utc), config.timezone())
            .context("Failed to resolve listing timezone");
    }
    let local = NaiveDateTime::parse_from_str(now, "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("Invalid --now value: {}", now))?;
    Ok(Clock::at(local))
}

fn parse_day(s: &str) -> Result<CalendarDay> {
    CalendarDay::parse(s).with_context(|| format!("Invalid day: {}", s))
}

fn parse_opt_day(s: Option<&str>) -> Result<Option<CalendarDay>> {
    s.map(parse_day).transpose()
}

/// Split `--clicks`; empty segments are skipped.
fn parse_clicks(raw: &str) -> Result<Vec<CalendarDay>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_day)
        .collect()
}

fn describe_state(state: &SelectionState) -> String {
    match state {
        SelectionState::Empty => "empty".to_string(),
        SelectionState::PartialFrom { from } => format!("check-in {}", from),
        SelectionState::Complete { from, to } => {
            format!("{} -> {} ({} nights)", from, to, nights(*from, *to))
        }
    }
}

fn describe_change(change: &Option<RangeChange>) -> String {
    let Some(change) = change else {
        return "ignored".to_string();
    };
    let show = |d: Option<CalendarDay>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!("emitted {} / {}", show(change.check_in), show(change.check_out))
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
