//! Manifest building -- merges weekly base hours with resolved occurrences
//! into exactly one row per calendar date.

use crate::expand::{Occurrence, OccurrenceOrigin};
use crate::types::{DayOfWeek, RuleId, WeeklyHours};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The override that won a manifest date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedException {
    pub origin: OccurrenceOrigin,
    pub name: String,
}

/// The resolved schedule for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub closed: bool,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
    /// Present when an exception superseded the base hours for this date.
    pub exception: Option<AppliedException>,
}

impl ManifestRow {
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// Id of the overriding rule, when the winner was rule-produced.
    pub fn exception_rule_id(&self) -> Option<RuleId> {
        match &self.exception {
            Some(applied) => match applied.origin {
                OccurrenceOrigin::Rule { id, .. } => Some(id),
                OccurrenceOrigin::Standalone { .. } => None,
            },
            None => None,
        }
    }
}

/// Build one [`ManifestRow`] per date of the inclusive `[from, to]` range.
///
/// `candidates` holds every occurrence that may apply: rule expansions over
/// the same range plus standalone override rows. Occurrences dated outside
/// the range are ignored. When several land on the same date the most
/// specific wins -- see [`pick_winner`]'s precedence.
///
/// Fields resolve per-field: the winner's `closed` flag always applies, and
/// each time the winner leaves unset falls back to the base hours of that
/// weekday.
pub fn build_manifest(
    week: &WeeklyHours,
    candidates: &[Occurrence],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ManifestRow> {
    if from > to {
        return Vec::new();
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<&Occurrence>> = BTreeMap::new();
    for occurrence in candidates {
        if occurrence.date >= from && occurrence.date <= to {
            by_date.entry(occurrence.date).or_default().push(occurrence);
        }
    }

    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|date| {
            let day = DayOfWeek::of(date);
            let base = week.day(day);
            match by_date.get(&date).and_then(|group| pick_winner(group)) {
                Some(winner) => ManifestRow {
                    date,
                    day_of_week: day,
                    closed: winner.closed,
                    open: winner.open.or(base.open),
                    close: winner.close.or(base.close),
                    exception: Some(AppliedException {
                        origin: winner.origin,
                        name: winner.name.clone(),
                    }),
                },
                None => ManifestRow {
                    date,
                    day_of_week: day,
                    closed: base.closed,
                    open: base.open,
                    close: base.close,
                    exception: None,
                },
            }
        })
        .collect()
}

/// Same-date precedence: standalone overrides are more specific than rule
/// expansions, and within a class the most recently created source (highest
/// id) wins.
fn pick_winner<'a>(group: &[&'a Occurrence]) -> Option<&'a Occurrence> {
    group
        .iter()
        .copied()
        .max_by_key(|occurrence| precedence(occurrence.origin))
}

fn precedence(origin: OccurrenceOrigin) -> (u8, u64) {
    match origin {
        OccurrenceOrigin::Rule { id, .. } => (0, id.0),
        OccurrenceOrigin::Standalone { id } => (1, id.0),
    }
}
