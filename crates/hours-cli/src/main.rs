//! `hours` CLI — validate and resolve site schedule files from the command
//! line.
//!
//! A schedule file is JSON with a `base_hours` array (one entry per weekday),
//! a `rules` array of wide-form exception drafts, and an optional
//! `occurrences` array of standalone one-date overrides.
//!
//! ## Usage
//!
//! ```sh
//! # Validate every exception rule in a file
//! hours check -i site.json
//!
//! # Resolve the day-by-day manifest for a week
//! hours manifest -i site.json --from 2025-07-01 --to 2025-07-07
//!
//! # Same, as JSON
//! hours manifest -i site.json --from 2025-07-01 --to 2025-07-07 --json
//!
//! # Past/upcoming occurrence buckets
//! hours occurrences -i site.json --today 2025-07-01
//!
//! # The change log produced by loading the file, newest first
//! hours log -i site.json
//! ```

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use hours_engine::{DayHours, DayOfWeek, ManifestRow, Occurrence, RuleDraft, WeeklyHours};
use hours_store::{ChangeLogEntry, MemoryStore, NewOccurrence, ScheduleService, SiteId};
use serde::Deserialize;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hours", version, about = "Site operating-hours schedule resolver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every exception rule in a schedule file
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Resolve the day-by-day manifest for a date range
    Manifest {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// First date of the range (inclusive)
        #[arg(long)]
        from: NaiveDate,
        /// Last date of the range (inclusive)
        #[arg(long)]
        to: NaiveDate,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Expand every rule and split occurrences into past and upcoming
    Occurrences {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Reference date for the past/upcoming split (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the change log produced by loading the file, newest first
    Log {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// A site schedule file as parsed from disk or stdin.
#[derive(Debug, Deserialize)]
struct SiteFile {
    base_hours: Vec<BaseDayEntry>,
    #[serde(default)]
    rules: Vec<RuleDraft>,
    #[serde(default)]
    occurrences: Vec<OccurrenceEntry>,
}

/// One weekday's base hours in the file. Days left out are closed.
#[derive(Debug, Deserialize)]
struct BaseDayEntry {
    day_of_week: DayOfWeek,
    #[serde(default)]
    is_closed: bool,
    open_time: Option<NaiveTime>,
    close_time: Option<NaiveTime>,
}

impl BaseDayEntry {
    fn to_day_hours(&self) -> Result<DayHours> {
        if self.is_closed {
            return Ok(DayHours::CLOSED);
        }
        match (self.open_time, self.close_time) {
            (Some(open), Some(close)) => Ok(DayHours::open_between(open, close)),
            _ => bail!(
                "base hours for {} need both open_time and close_time (or is_closed)",
                self.day_of_week
            ),
        }
    }
}

/// A standalone one-date override in the file.
#[derive(Debug, Deserialize)]
struct OccurrenceEntry {
    date: NaiveDate,
    name: String,
    #[serde(default)]
    is_closed: bool,
    open_time: Option<NaiveTime>,
    close_time: Option<NaiveTime>,
}

impl OccurrenceEntry {
    fn into_new(self) -> NewOccurrence {
        NewOccurrence {
            date: self.date,
            name: self.name,
            closed: self.is_closed,
            open: self.open_time,
            close: self.close_time,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { input } => {
            let file = parse_site_file(&read_input(input.as_deref())?)?;
            check_rules(&file)
        }
        Commands::Manifest {
            input,
            from,
            to,
            json,
        } => {
            if to < from {
                bail!("--to {to} precedes --from {from}");
            }
            let file = parse_site_file(&read_input(input.as_deref())?)?;
            let (service, site) = load_site(file)?;
            let rows = service.manifest(site, from, to)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_manifest(&rows);
            }
            Ok(())
        }
        Commands::Occurrences { input, today, json } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let file = parse_site_file(&read_input(input.as_deref())?)?;
            let (service, site) = load_site(file)?;
            let buckets = service.occurrences(site, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&buckets)?);
            } else {
                println!("upcoming:");
                print_occurrences(&buckets.upcoming);
                println!("past:");
                print_occurrences(&buckets.past);
            }
            Ok(())
        }
        Commands::Log { input } => {
            let file = parse_site_file(&read_input(input.as_deref())?)?;
            let (service, site) = load_site(file)?;
            for entry in service.change_log(site)? {
                print_log_entry(&entry);
            }
            Ok(())
        }
    }
}

/// Validate every rule draft, reporting each failure on stderr.
fn check_rules(file: &SiteFile) -> Result<()> {
    let mut invalid = 0usize;
    for (index, draft) in file.rules.iter().enumerate() {
        if let Err(error) = draft.validate() {
            invalid += 1;
            let name = draft.name.as_deref().unwrap_or("<unnamed>");
            eprintln!("rule {} \"{}\": {}", index + 1, name, error);
        }
    }
    if invalid > 0 {
        bail!("{invalid} of {} rules failed validation", file.rules.len());
    }
    println!("{} rules ok", file.rules.len());
    Ok(())
}

/// Seed an in-memory store with the file's schedule and return the service.
fn load_site(file: SiteFile) -> Result<(ScheduleService<MemoryStore>, SiteId)> {
    let service = ScheduleService::new(MemoryStore::new());
    let site = SiteId::new();

    let mut week = WeeklyHours::closed();
    for entry in &file.base_hours {
        week.set(entry.day_of_week, entry.to_day_hours()?);
    }
    service.seed_base_hours(site, &week, None)?;

    for (index, draft) in file.rules.iter().enumerate() {
        let name = draft.name.as_deref().unwrap_or("<unnamed>");
        service
            .create_rule(site, draft, None)
            .with_context(|| format!("rule {} \"{}\" was rejected", index + 1, name))?;
    }
    for entry in file.occurrences {
        service.create_occurrence(site, entry.into_new(), None)?;
    }
    Ok((service, site))
}

fn print_manifest(rows: &[ManifestRow]) {
    println!("{:<12} {:<10} {:<20} exception", "date", "day", "hours");
    for row in rows {
        let exception = row
            .exception
            .as_ref()
            .map(|applied| applied.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<12} {:<10} {:<20} {}",
            row.date.to_string(),
            row.day_of_week.to_string(),
            format_hours(row.closed, row.open, row.close),
            exception
        );
    }
}

fn print_occurrences(occurrences: &[Occurrence]) {
    for occurrence in occurrences {
        println!(
            "  {:<12} {:<10} {:<20} {}",
            occurrence.date.to_string(),
            occurrence.day_of_week.to_string(),
            format_hours(occurrence.closed, occurrence.open, occurrence.close),
            occurrence.name
        );
    }
}

fn print_log_entry(entry: &ChangeLogEntry) {
    println!(
        "{}  {:<8} {:<10} {:<20} {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.action.to_string(),
        entry.source.to_string(),
        entry.changed_by,
        entry.message
    );
}

fn format_hours(closed: bool, open: Option<NaiveTime>, close: Option<NaiveTime>) -> String {
    if closed {
        return "closed".to_string();
    }
    match (open, close) {
        (Some(open), Some(close)) => format!("{open} - {close}"),
        _ => "(no hours set)".to_string(),
    }
}

fn parse_site_file(raw: &str) -> Result<SiteFile> {
    serde_json::from_str(raw).context("failed to parse schedule file")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read file {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}
