//! Read-model projections over manifests and expanded occurrences.
//!
//! Everything here is a pure reshaping of already-resolved rows. `today` is
//! always a parameter, never read from a clock, so projections stay
//! reproducible.

use crate::expand::Occurrence;
use crate::manifest::ManifestRow;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// How many days of base-only history the past view keeps.
pub const PAST_BASE_WINDOW_DAYS: i64 = 7;

/// Default lookback start for the past view: January 1 of the prior year.
pub fn past_view_start(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).unwrap_or(today)
}

/// Default forward horizon for the future view: December 31 of next year.
pub fn future_view_end(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year() + 1, 12, 31).unwrap_or(today)
}

/// Historical slice of a manifest, most recent first.
///
/// Keeps every exception row up to `today`. Base-only rows are noise at a
/// distance: they survive only within the trailing
/// [`PAST_BASE_WINDOW_DAYS`]-day window.
pub fn past_view(rows: Vec<ManifestRow>, today: NaiveDate) -> Vec<ManifestRow> {
    let window_start = today - Duration::days(PAST_BASE_WINDOW_DAYS);
    let mut rows: Vec<ManifestRow> = rows
        .into_iter()
        .filter(|row| row.date <= today)
        .filter(|row| row.has_exception() || row.date >= window_start)
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

/// Forward slice of a manifest: rows dated `today` or later, ascending.
pub fn future_view(rows: Vec<ManifestRow>, today: NaiveDate) -> Vec<ManifestRow> {
    let mut rows: Vec<ManifestRow> = rows
        .into_iter()
        .filter(|row| row.date >= today)
        .collect();
    rows.sort_by_key(|row| row.date);
    rows
}

/// Expanded occurrences split around `today` for calendar-style UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceBuckets {
    /// Strictly before `today`, most recent first.
    pub past: Vec<Occurrence>,
    /// `today` and later, ascending.
    pub upcoming: Vec<Occurrence>,
}

/// Split occurrences around `today`. Today itself counts as upcoming.
pub fn split_occurrences(occurrences: Vec<Occurrence>, today: NaiveDate) -> OccurrenceBuckets {
    let (mut past, mut upcoming): (Vec<_>, Vec<_>) = occurrences
        .into_iter()
        .partition(|occurrence| occurrence.date < today);
    past.sort_by(|a, b| b.date.cmp(&a.date));
    upcoming.sort_by_key(|occurrence| occurrence.date);
    OccurrenceBuckets { past, upcoming }
}
