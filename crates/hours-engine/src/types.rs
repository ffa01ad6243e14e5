//! Shared vocabulary -- weekdays, daily hours, override payloads, identifiers.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week, Monday-first.
///
/// Serialized as lowercase names (`"monday"` .. `"sunday"`), the form base-hours
/// rows and rule payloads carry on the wire. Converts to and from
/// [`chrono::Weekday`] for calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All seven days in week order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// The weekday a calendar date falls on.
    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// Base opening hours for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub closed: bool,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
}

impl DayHours {
    /// A day with no service.
    pub const CLOSED: DayHours = DayHours {
        closed: true,
        open: None,
        close: None,
    };

    /// An open day with the given opening and closing times.
    pub fn open_between(open: NaiveTime, close: NaiveTime) -> Self {
        DayHours {
            closed: false,
            open: Some(open),
            close: Some(close),
        }
    }
}

/// A full week of base hours: exactly one [`DayHours`] per weekday.
///
/// The total shape (seven slots, Monday-first) is what makes manifest building
/// infallible -- every calendar date has a base row to fall back on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours([DayHours; 7]);

impl WeeklyHours {
    /// The same hours every day of the week.
    pub fn uniform(hours: DayHours) -> Self {
        WeeklyHours([hours; 7])
    }

    /// A week with no service at all.
    pub fn closed() -> Self {
        Self::uniform(DayHours::CLOSED)
    }

    pub fn day(&self, day: DayOfWeek) -> DayHours {
        self.0[day.index()]
    }

    pub fn set(&mut self, day: DayOfWeek, hours: DayHours) {
        self.0[day.index()] = hours;
    }

    /// Iterate the week in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, DayHours)> + '_ {
        DayOfWeek::ALL.iter().map(move |&day| (day, self.day(day)))
    }
}

/// The standard exception-hours payload: a closed flag plus optional
/// open/close times.
///
/// `None` times do not mean "no hours" -- they mean "no override". The manifest
/// falls back to the base hours for any field left unset here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursOverride {
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub open: Option<NaiveTime>,
    #[serde(default)]
    pub close: Option<NaiveTime>,
}

impl HoursOverride {
    /// Fully closed, no replacement times.
    pub fn closed_all_day() -> Self {
        HoursOverride {
            closed: true,
            open: None,
            close: None,
        }
    }

    /// Open with both times replaced.
    pub fn between(open: NaiveTime, close: NaiveTime) -> Self {
        HoursOverride {
            closed: false,
            open: Some(open),
            close: Some(close),
        }
    }
}

/// Store-assigned identifier of an exception rule.
///
/// Ids come from a monotonic sequence, so ordering ids orders rules by
/// creation time. Same-date precedence relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identifier of a standalone occurrence row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceId(pub u64);

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
