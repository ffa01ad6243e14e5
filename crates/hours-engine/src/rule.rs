//! The exception-rule model -- a closed union of recurrence families.
//!
//! Each variant of [`RuleKind`] carries exactly the parameters its family
//! needs, so "populated fields match the rule type" holds by construction.
//! Wide-form client payloads are checked and converted by
//! [`RuleDraft::validate`](crate::draft::RuleDraft::validate) before anything
//! of this shape exists.

use crate::types::{DayOfWeek, HoursOverride};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step unit of an [`RuleKind::Interval`] rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalUnit::Days => "days",
            IntervalUnit::Weeks => "weeks",
            IntervalUnit::Months => "months",
        };
        f.write_str(name)
    }
}

/// The three per-day profiles of a date-range rule.
///
/// The first and last day of the range get their own open/close times; every
/// day in between shares the middle profile, whose `closed` flag is the
/// "closed during the stay" switch. A one-day range uses the start profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProfiles {
    pub start_day: HoursOverride,
    pub middle_days: HoursOverride,
    pub end_day: HoursOverride,
}

/// Type-specific parameters of an exception rule.
///
/// Serialized with an internal `rule_type` tag so the JSON form matches the
/// wide-row wire shape clients already speak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleKind {
    /// One concrete calendar date.
    SingleDate { date: NaiveDate, hours: HoursOverride },
    /// The same month/day every year (e.g. December 25).
    FixedYearly {
        month: u32,
        day: u32,
        hours: HoursOverride,
    },
    /// The nth weekday of a month, every year (e.g. 3rd Monday of January).
    NthWeekday {
        month: u32,
        weekday: DayOfWeek,
        nth: u8,
        hours: HoursOverride,
    },
    /// Every date falling on one of the listed weekdays.
    WeeklyDays {
        days: Vec<DayOfWeek>,
        hours: HoursOverride,
    },
    /// Every `every` days/weeks/months, anchored at `start`.
    Interval {
        every: u32,
        unit: IntervalUnit,
        start: NaiveDate,
        hours: HoursOverride,
    },
    /// A multi-day span with distinct first/middle/last-day profiles. The
    /// span itself is the rule's effective window.
    DateRangeDaily { profiles: RangeProfiles },
}

impl RuleKind {
    /// The wire discriminator for this kind.
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::SingleDate { .. } => RuleType::SingleDate,
            RuleKind::FixedYearly { .. } => RuleType::FixedYearly,
            RuleKind::NthWeekday { .. } => RuleType::NthWeekday,
            RuleKind::WeeklyDays { .. } => RuleType::WeeklyDays,
            RuleKind::Interval { .. } => RuleType::Interval,
            RuleKind::DateRangeDaily { .. } => RuleType::DateRangeDaily,
        }
    }
}

/// Rule-family discriminator, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    SingleDate,
    FixedYearly,
    NthWeekday,
    WeeklyDays,
    Interval,
    DateRangeDaily,
}

impl RuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::SingleDate => "single_date",
            RuleType::FixedYearly => "fixed_yearly",
            RuleType::NthWeekday => "nth_weekday",
            RuleType::WeeklyDays => "weekly_days",
            RuleType::Interval => "interval",
            RuleType::DateRangeDaily => "date_range_daily",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative override of base hours, bounded by an effective window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRule {
    pub name: String,
    /// Free-form label ("holiday", "maintenance", ...). Carried, not
    /// interpreted.
    pub event_type: String,
    /// First date the rule may produce occurrences on.
    pub effective_from: NaiveDate,
    /// Inclusive end of the effective window. Required for
    /// [`RuleKind::DateRangeDaily`], optional for every other kind.
    pub effective_to: Option<NaiveDate>,
    #[serde(flatten)]
    pub kind: RuleKind,
}

impl ExceptionRule {
    /// Whether expansion of this rule can land on more than one date.
    pub fn recurring(&self) -> bool {
        !matches!(self.kind, RuleKind::SingleDate { .. })
    }
}
