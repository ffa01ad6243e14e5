//! Occurrence expansion -- turns one exception rule into concrete dated
//! occurrences.
//!
//! Expansion is a pure function of the rule and the requested window:
//! deterministic, idempotent, and total. Configurations that cannot land in a
//! given year (February 29 outside leap years, a missing 5th weekday) simply
//! contribute nothing for that year instead of failing.

use crate::rule::{ExceptionRule, IntervalUnit, RuleKind};
use crate::types::{DayOfWeek, HoursOverride, OccurrenceId, RuleId};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Where a resolved occurrence came from.
///
/// Manifest precedence keys on this: standalone rows outrank rule expansions,
/// and within a class the higher id (the more recently created row) wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum OccurrenceOrigin {
    /// Produced by expanding an exception rule.
    Rule { id: RuleId, recurring: bool },
    /// A standalone one-date override row.
    Standalone { id: OccurrenceId },
}

/// One concrete calendar date an exception applies to.
///
/// `open`/`close` are override values: `None` means the field was not
/// overridden, and the base hours stay in charge when the manifest is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub name: String,
    pub closed: bool,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
    pub origin: OccurrenceOrigin,
}

/// Default candidate years for calendar-style callers: previous, current,
/// next.
pub fn candidate_years(today: NaiveDate) -> [i32; 3] {
    let year = today.year();
    [year - 1, year, year + 1]
}

/// Expand `rule` across whole candidate years.
///
/// Each year is expanded over its full January 1 .. December 31 window (still
/// clipped by the rule's effective window); results are merged, sorted by
/// date, and deduplicated.
pub fn expand_rule(id: RuleId, rule: &ExceptionRule, years: &[i32]) -> Vec<Occurrence> {
    let mut out = Vec::new();
    for &year in years {
        let bounds = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        );
        let (Some(from), Some(to)) = bounds else {
            continue;
        };
        out.extend(expand_rule_between(id, rule, from, to));
    }
    out.sort_by_key(|occ| occ.date);
    out.dedup_by_key(|occ| occ.date);
    out
}

/// Expand `rule` to every applicable date in the inclusive window
/// `[from, to]`.
///
/// The window is first clipped to the rule's effective window; an empty
/// intersection yields no occurrences. Output is sorted by date.
pub fn expand_rule_between(
    id: RuleId,
    rule: &ExceptionRule,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Occurrence> {
    let lo = from.max(rule.effective_from);
    let hi = match rule.effective_to {
        Some(end) => to.min(end),
        None => to,
    };
    if lo > hi {
        return Vec::new();
    }

    let mut dated: Vec<(NaiveDate, HoursOverride)> = Vec::new();
    match &rule.kind {
        RuleKind::SingleDate { date, hours } => {
            if *date >= lo && *date <= hi {
                dated.push((*date, *hours));
            }
        }
        RuleKind::FixedYearly { month, day, hours } => {
            for year in lo.year()..=hi.year() {
                // Invalid combinations (Feb 29 off-leap-year) resolve to
                // None and are skipped for that year.
                if let Some(date) = NaiveDate::from_ymd_opt(year, *month, *day) {
                    if date >= lo && date <= hi {
                        dated.push((date, *hours));
                    }
                }
            }
        }
        RuleKind::NthWeekday {
            month,
            weekday,
            nth,
            hours,
        } => {
            for year in lo.year()..=hi.year() {
                let nth_day =
                    NaiveDate::from_weekday_of_month_opt(year, *month, (*weekday).into(), *nth);
                if let Some(date) = nth_day {
                    if date >= lo && date <= hi {
                        dated.push((date, *hours));
                    }
                }
            }
        }
        RuleKind::WeeklyDays { days, hours } => {
            for date in lo.iter_days().take_while(|d| *d <= hi) {
                if days.contains(&DayOfWeek::of(date)) {
                    dated.push((date, *hours));
                }
            }
        }
        RuleKind::Interval {
            every,
            unit,
            start,
            hours,
        } => {
            expand_interval(&mut dated, *every, *unit, *start, *hours, lo, hi);
        }
        RuleKind::DateRangeDaily { profiles } => {
            // The range is the effective window itself; roles come from the
            // full range even when the requested window only covers part of
            // it.
            if let Some(range_end) = rule.effective_to {
                let range_start = rule.effective_from;
                for date in range_start.iter_days().take_while(|d| *d <= range_end) {
                    if date < lo || date > hi {
                        continue;
                    }
                    let profile = if date == range_start {
                        profiles.start_day
                    } else if date == range_end {
                        profiles.end_day
                    } else {
                        profiles.middle_days
                    };
                    dated.push((date, profile));
                }
            }
        }
    }

    let origin = OccurrenceOrigin::Rule {
        id,
        recurring: rule.recurring(),
    };
    dated
        .into_iter()
        .map(|(date, hours)| Occurrence {
            date,
            day_of_week: DayOfWeek::of(date),
            name: rule.name.clone(),
            closed: hours.closed,
            open: hours.open,
            close: hours.close,
            origin,
        })
        .collect()
}

/// Step through an interval rule's occurrences inside `[lo, hi]`.
///
/// Occurrences stay anchored at `start` regardless of clipping, so the
/// window never shifts the phase. Month steps clamp to the last day of
/// shorter months, matching [`chrono::Months`] arithmetic.
fn expand_interval(
    out: &mut Vec<(NaiveDate, HoursOverride)>,
    every: u32,
    unit: IntervalUnit,
    start: NaiveDate,
    hours: HoursOverride,
    lo: NaiveDate,
    hi: NaiveDate,
) {
    if every == 0 || start > hi {
        return;
    }
    match unit {
        IntervalUnit::Days | IntervalUnit::Weeks => {
            let step = match unit {
                IntervalUnit::Days => i64::from(every),
                IntervalUnit::Weeks => i64::from(every) * 7,
                IntervalUnit::Months => unreachable!(),
            };
            // First multiple of the step that lands at or after `lo`.
            let mut k = if lo <= start {
                0
            } else {
                let gap = (lo - start).num_days();
                (gap + step - 1) / step
            };
            loop {
                let offset = Days::new((k * step) as u64);
                let Some(date) = start.checked_add_days(offset) else {
                    break;
                };
                if date > hi {
                    break;
                }
                out.push((date, hours));
                k += 1;
            }
        }
        IntervalUnit::Months => {
            let mut k: u32 = 0;
            loop {
                let Some(months) = k.checked_mul(every) else {
                    break;
                };
                let Some(date) = start.checked_add_months(chrono::Months::new(months)) else {
                    break;
                };
                if date > hi {
                    break;
                }
                if date >= lo {
                    out.push((date, hours));
                }
                k += 1;
            }
        }
    }
}
