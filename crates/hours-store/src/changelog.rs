//! The append-only change log -- the audit trail behind every schedule
//! mutation.
//!
//! Entries are immutable: they are never updated or deleted, and corrections
//! are new entries. The store assigns ids and timestamps when it applies the
//! owning mutation, so a mutation and its audit rows always land together.

use crate::store::SiteId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hours_engine::{DayHours, DayOfWeek, ExceptionRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor recorded when no authenticated identity accompanies a mutation.
pub const SYSTEM_ACTOR: &str = "system";

/// Resolve an optional caller identity to the recorded actor.
pub(crate) fn actor_or_system(changed_by: Option<&str>) -> String {
    match changed_by.map(str::trim) {
        Some(actor) if !actor.is_empty() => actor.to_string(),
        _ => SYSTEM_ACTOR.to_string(),
    }
}

/// What a change-log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
    Comment,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
            ChangeAction::Deleted => "deleted",
            ChangeAction::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Which part of the schedule an entry concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    BaseHours,
    Exception,
    Comment,
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeSource::BaseHours => "base_hours",
            ChangeSource::Exception => "exception",
            ChangeSource::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Field-level before/after snapshot of one base-hours row update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHoursDiff {
    pub day_of_week: DayOfWeek,
    pub closed_before: bool,
    pub closed_after: bool,
    pub open_before: Option<NaiveTime>,
    pub open_after: Option<NaiveTime>,
    pub close_before: Option<NaiveTime>,
    pub close_after: Option<NaiveTime>,
}

impl BaseHoursDiff {
    pub fn between(day_of_week: DayOfWeek, before: DayHours, after: DayHours) -> Self {
        BaseHoursDiff {
            day_of_week,
            closed_before: before.closed,
            closed_after: after.closed,
            open_before: before.open,
            open_after: after.open,
            close_before: before.close,
            close_after: after.close,
        }
    }
}

/// Identifier of a change-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(pub u64);

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: ChangeId,
    pub site_id: SiteId,
    pub timestamp: DateTime<Utc>,
    pub action: ChangeAction,
    pub source: ChangeSource,
    pub message: String,
    pub changed_by: String,
    /// Before/after values, present for base-hours updates.
    pub diff: Option<BaseHoursDiff>,
}

/// A change entry waiting for the store to assign its id and timestamp.
#[derive(Debug, Clone)]
pub struct ChangeDraft {
    pub action: ChangeAction,
    pub source: ChangeSource,
    pub message: String,
    pub changed_by: String,
    pub diff: Option<BaseHoursDiff>,
}

impl ChangeDraft {
    fn new(
        action: ChangeAction,
        source: ChangeSource,
        message: String,
        changed_by: &str,
    ) -> Self {
        ChangeDraft {
            action,
            source,
            message,
            changed_by: changed_by.to_string(),
            diff: None,
        }
    }

    pub fn rule_created(rule: &ExceptionRule, changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Created,
            ChangeSource::Exception,
            format!(
                "created exception \"{}\" ({})",
                rule.name,
                rule.kind.rule_type()
            ),
            changed_by,
        )
    }

    pub fn rule_updated(rule: &ExceptionRule, changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Updated,
            ChangeSource::Exception,
            format!(
                "updated exception \"{}\" ({})",
                rule.name,
                rule.kind.rule_type()
            ),
            changed_by,
        )
    }

    pub fn rule_deleted(name: &str, changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Deleted,
            ChangeSource::Exception,
            format!("deleted exception \"{name}\""),
            changed_by,
        )
    }

    pub fn occurrence_created(name: &str, date: NaiveDate, changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Created,
            ChangeSource::Exception,
            format!("created occurrence \"{name}\" on {date}"),
            changed_by,
        )
    }

    pub fn occurrence_updated(name: &str, date: NaiveDate, changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Updated,
            ChangeSource::Exception,
            format!("updated occurrence \"{name}\" on {date}"),
            changed_by,
        )
    }

    pub fn base_hours_seeded(changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Created,
            ChangeSource::BaseHours,
            "created weekly base hours".to_string(),
            changed_by,
        )
    }

    pub fn base_hours_updated(diff: BaseHoursDiff, changed_by: &str) -> Self {
        let mut draft = Self::new(
            ChangeAction::Updated,
            ChangeSource::BaseHours,
            format!("updated {} base hours", diff.day_of_week),
            changed_by,
        );
        draft.diff = Some(diff);
        draft
    }

    pub fn comment(message: &str, changed_by: &str) -> Self {
        Self::new(
            ChangeAction::Comment,
            ChangeSource::Comment,
            message.to_string(),
            changed_by,
        )
    }
}
