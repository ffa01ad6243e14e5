//! Wide-form rule payloads and their validation into typed rules.
//!
//! Clients submit exception rules in a flat shape: every type-specific
//! parameter optional, discriminated by `rule_type`. [`RuleDraft::validate`]
//! checks that the populated fields are exactly the ones the discriminator
//! calls for and builds the typed [`ExceptionRule`]. Nothing reaches storage
//! or expansion without passing through here.

use crate::error::{Result, RuleError};
use crate::rule::{ExceptionRule, IntervalUnit, RangeProfiles, RuleKind, RuleType};
use crate::types::{DayOfWeek, HoursOverride};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// An unvalidated exception rule as submitted by a client.
///
/// Field names follow the wire payload (`effective_from_date`, `is_closed`,
/// `open_time`, ...); the typed model uses shorter names once validation has
/// pinned the shape down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub rule_type: RuleType,
    pub effective_from_date: Option<NaiveDate>,
    pub effective_to_date: Option<NaiveDate>,

    // Standard hours payload, shared by every family except date ranges.
    pub is_closed: Option<bool>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,

    // Family-specific parameters.
    pub date: Option<NaiveDate>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday: Option<DayOfWeek>,
    pub nth: Option<u8>,
    pub days: Option<Vec<DayOfWeek>>,
    pub interval: Option<u32>,
    pub unit: Option<IntervalUnit>,
    pub start_date: Option<NaiveDate>,

    // Date-range profiles.
    pub start_day_open: Option<NaiveTime>,
    pub start_day_close: Option<NaiveTime>,
    pub middle_days_closed: Option<bool>,
    pub middle_days_open: Option<NaiveTime>,
    pub middle_days_close: Option<NaiveTime>,
    pub end_day_open: Option<NaiveTime>,
    pub end_day_close: Option<NaiveTime>,
}

impl RuleDraft {
    /// An empty draft of the given family, every optional field unset.
    pub fn new(rule_type: RuleType) -> Self {
        RuleDraft {
            name: None,
            event_type: None,
            rule_type,
            effective_from_date: None,
            effective_to_date: None,
            is_closed: None,
            open_time: None,
            close_time: None,
            date: None,
            month: None,
            day: None,
            weekday: None,
            nth: None,
            days: None,
            interval: None,
            unit: None,
            start_date: None,
            start_day_open: None,
            start_day_close: None,
            middle_days_closed: None,
            middle_days_open: None,
            middle_days_close: None,
            end_day_open: None,
            end_day_close: None,
        }
    }

    /// Validate the draft and build the typed rule.
    ///
    /// Checks, in order: required identity fields, window ordering, that no
    /// parameter of a *different* family is populated, and the family's own
    /// parameter requirements.
    ///
    /// # Errors
    /// Returns [`RuleError::MissingField`] / [`RuleError::InvalidField`] for
    /// absent or out-of-domain values, [`RuleError::ForeignField`] when the
    /// payload mixes families, [`RuleError::MissingRangeEnd`] for a date
    /// range without `effective_to_date`, and [`RuleError::InvertedWindow`]
    /// when the effective window runs backwards.
    pub fn validate(&self) -> Result<ExceptionRule> {
        let name = required_text(self.name.as_deref(), "name")?;
        let event_type = required_text(self.event_type.as_deref(), "event_type")?;
        let effective_from = self
            .effective_from_date
            .ok_or(RuleError::MissingField("effective_from_date"))?;
        if let Some(to) = self.effective_to_date {
            if to < effective_from {
                return Err(RuleError::InvertedWindow {
                    from: effective_from,
                    to,
                });
            }
        }
        self.check_foreign_fields()?;
        let kind = self.kind()?;
        Ok(ExceptionRule {
            name,
            event_type,
            effective_from,
            effective_to: self.effective_to_date,
            kind,
        })
    }

    fn kind(&self) -> Result<RuleKind> {
        let hours = HoursOverride {
            closed: self.is_closed.unwrap_or(false),
            open: self.open_time,
            close: self.close_time,
        };
        match self.rule_type {
            RuleType::SingleDate => {
                let date = self.date.ok_or(RuleError::MissingField("date"))?;
                Ok(RuleKind::SingleDate { date, hours })
            }
            RuleType::FixedYearly => {
                let month = self.require_month()?;
                let day = self.day.ok_or(RuleError::MissingField("day"))?;
                if !(1..=31).contains(&day) {
                    return Err(invalid("day", "must be between 1 and 31"));
                }
                Ok(RuleKind::FixedYearly { month, day, hours })
            }
            RuleType::NthWeekday => {
                let month = self.require_month()?;
                let weekday = self.weekday.ok_or(RuleError::MissingField("weekday"))?;
                let nth = self.nth.ok_or(RuleError::MissingField("nth"))?;
                if !(1..=5).contains(&nth) {
                    return Err(invalid("nth", "must be between 1 and 5"));
                }
                Ok(RuleKind::NthWeekday {
                    month,
                    weekday,
                    nth,
                    hours,
                })
            }
            RuleType::WeeklyDays => {
                let mut days = self
                    .days
                    .clone()
                    .ok_or(RuleError::MissingField("days"))?;
                if days.is_empty() {
                    return Err(invalid("days", "must list at least one weekday"));
                }
                days.sort();
                days.dedup();
                Ok(RuleKind::WeeklyDays { days, hours })
            }
            RuleType::Interval => {
                let every = self.interval.ok_or(RuleError::MissingField("interval"))?;
                if every == 0 {
                    return Err(invalid("interval", "must be at least 1"));
                }
                let unit = self.unit.ok_or(RuleError::MissingField("unit"))?;
                let start = self
                    .start_date
                    .ok_or(RuleError::MissingField("start_date"))?;
                Ok(RuleKind::Interval {
                    every,
                    unit,
                    start,
                    hours,
                })
            }
            RuleType::DateRangeDaily => {
                if self.effective_to_date.is_none() {
                    return Err(RuleError::MissingRangeEnd);
                }
                Ok(RuleKind::DateRangeDaily {
                    profiles: RangeProfiles {
                        start_day: HoursOverride {
                            closed: false,
                            open: self.start_day_open,
                            close: self.start_day_close,
                        },
                        middle_days: HoursOverride {
                            closed: self.middle_days_closed.unwrap_or(false),
                            open: self.middle_days_open,
                            close: self.middle_days_close,
                        },
                        end_day: HoursOverride {
                            closed: false,
                            open: self.end_day_open,
                            close: self.end_day_close,
                        },
                    },
                })
            }
        }
    }

    fn require_month(&self) -> Result<u32> {
        let month = self.month.ok_or(RuleError::MissingField("month"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month", "must be between 1 and 12"));
        }
        Ok(month)
    }

    /// Reject parameters that belong to a different rule family.
    fn check_foreign_fields(&self) -> Result<()> {
        let allowed = allowed_fields(self.rule_type);
        let populated: [(&'static str, bool); 19] = [
            ("is_closed", self.is_closed.is_some()),
            ("open_time", self.open_time.is_some()),
            ("close_time", self.close_time.is_some()),
            ("date", self.date.is_some()),
            ("month", self.month.is_some()),
            ("day", self.day.is_some()),
            ("weekday", self.weekday.is_some()),
            ("nth", self.nth.is_some()),
            ("days", self.days.is_some()),
            ("interval", self.interval.is_some()),
            ("unit", self.unit.is_some()),
            ("start_date", self.start_date.is_some()),
            ("start_day_open", self.start_day_open.is_some()),
            ("start_day_close", self.start_day_close.is_some()),
            ("middle_days_closed", self.middle_days_closed.is_some()),
            ("middle_days_open", self.middle_days_open.is_some()),
            ("middle_days_close", self.middle_days_close.is_some()),
            ("end_day_open", self.end_day_open.is_some()),
            ("end_day_close", self.end_day_close.is_some()),
        ];
        for (field, set) in populated {
            if set && !allowed.contains(&field) {
                return Err(RuleError::ForeignField {
                    field,
                    rule_type: self.rule_type.as_str(),
                });
            }
        }
        Ok(())
    }
}

/// Which draft fields each family may populate. The standard hours trio
/// (`is_closed`, `open_time`, `close_time`) is shared by every family except
/// date ranges, which carry their own profile fields.
fn allowed_fields(rule_type: RuleType) -> &'static [&'static str] {
    match rule_type {
        RuleType::SingleDate => &["date", "is_closed", "open_time", "close_time"],
        RuleType::FixedYearly => &["month", "day", "is_closed", "open_time", "close_time"],
        RuleType::NthWeekday => &[
            "month",
            "weekday",
            "nth",
            "is_closed",
            "open_time",
            "close_time",
        ],
        RuleType::WeeklyDays => &["days", "is_closed", "open_time", "close_time"],
        RuleType::Interval => &[
            "interval",
            "unit",
            "start_date",
            "is_closed",
            "open_time",
            "close_time",
        ],
        RuleType::DateRangeDaily => &[
            "start_day_open",
            "start_day_close",
            "middle_days_closed",
            "middle_days_open",
            "middle_days_close",
            "end_day_open",
            "end_day_close",
        ],
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(RuleError::MissingField(field)),
    }
}

fn invalid(field: &'static str, reason: &str) -> RuleError {
    RuleError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}
