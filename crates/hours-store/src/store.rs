//! The durable-store contract and its row types.
//!
//! [`ScheduleStore`] is the seam between schedule operations and whatever
//! holds the rows. Implementations must apply each write together with its
//! audit entries as one atomic unit: a mutation is never visible without its
//! change-log rows, and a rejected write leaves the store untouched.

use crate::changelog::ChangeLogEntry;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hours_engine::{
    DayHours, DayOfWeek, ExceptionRule, Occurrence, OccurrenceId, OccurrenceOrigin, RuleId,
    WeeklyHours,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a site, supplied by the external site registry.
///
/// Newtype over a UUID (v4) so site identifiers cannot be confused with
/// other UUIDs floating through a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(uuid::Uuid);

impl SiteId {
    /// A new random `SiteId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for SiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for SiteId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SiteId> for uuid::Uuid {
    fn from(id: SiteId) -> Self {
        id.0
    }
}

/// Identifier of a stored base-hours row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseHoursId(pub u64);

impl fmt::Display for BaseHoursId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored base-hours row: the default hours for one weekday of a site.
///
/// A seeded site has exactly seven of these, one per weekday. Rows are
/// updated in place; the weekday itself never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHoursRow {
    pub id: BaseHoursId,
    pub site_id: SiteId,
    pub day_of_week: DayOfWeek,
    pub hours: DayHours,
}

/// A stored exception rule with its storage identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRule {
    pub id: RuleId,
    pub site_id: SiteId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub rule: ExceptionRule,
}

/// A one-date override row.
///
/// `exception_id` is a back-reference to a producing rule and is `None` for
/// standalone overrides. Only standalone rows act as merge candidates;
/// rule-tied rows are derived data and the rule itself is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub id: OccurrenceId,
    pub site_id: SiteId,
    pub exception_id: Option<RuleId>,
    pub date: NaiveDate,
    pub name: String,
    pub closed: bool,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl OccurrenceRecord {
    /// Whether this row stands on its own rather than mirroring a rule.
    pub fn is_standalone(&self) -> bool {
        self.exception_id.is_none()
    }

    /// The merge-candidate form of this record.
    pub fn to_occurrence(&self) -> Occurrence {
        let origin = match self.exception_id {
            None => OccurrenceOrigin::Standalone { id: self.id },
            Some(rule_id) => OccurrenceOrigin::Rule {
                id: rule_id,
                recurring: false,
            },
        };
        Occurrence {
            date: self.date,
            day_of_week: DayOfWeek::of(self.date),
            name: self.name.clone(),
            closed: self.closed,
            open: self.open,
            close: self.close,
            origin,
        }
    }
}

/// One row of a base-hours batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHoursChange {
    pub id: BaseHoursId,
    pub day_of_week: DayOfWeek,
    pub hours: DayHours,
}

/// Payload for creating a standalone override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOccurrence {
    pub date: NaiveDate,
    pub name: String,
    pub closed: bool,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
}

/// Payload for editing a standalone override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceUpdate {
    pub id: OccurrenceId,
    pub date: NaiveDate,
    pub name: String,
    pub closed: bool,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
}

/// Row-level persistence for site schedules.
///
/// Every write method takes the acting identity and appends the matching
/// change-log entries in the same atomic unit as the mutation. Batch writes
/// validate fully before applying anything: one bad row rejects the batch
/// and leaves the store untouched.
pub trait ScheduleStore {
    // Reads.
    fn base_hours(&self, site: SiteId) -> Result<Vec<BaseHoursRow>>;
    fn rules(&self, site: SiteId) -> Result<Vec<StoredRule>>;
    fn rule(&self, site: SiteId, id: RuleId) -> Result<StoredRule>;
    fn occurrence_records(&self, site: SiteId) -> Result<Vec<OccurrenceRecord>>;
    /// The full audit trail for a site, newest entry first.
    fn change_log(&self, site: SiteId) -> Result<Vec<ChangeLogEntry>>;

    // Writes (mutation + audit, atomically).
    /// Create the seven weekly rows for a site that has none yet.
    fn seed_base_hours(
        &self,
        site: SiteId,
        week: &WeeklyHours,
        changed_by: &str,
    ) -> Result<Vec<BaseHoursRow>>;
    /// Apply a batch of per-day edits. One audit entry per row, each with a
    /// before/after diff.
    fn update_base_hours(
        &self,
        site: SiteId,
        changes: &[BaseHoursChange],
        changed_by: &str,
    ) -> Result<Vec<BaseHoursRow>>;
    fn insert_rule(
        &self,
        site: SiteId,
        rule: ExceptionRule,
        changed_by: &str,
    ) -> Result<StoredRule>;
    fn update_rule(
        &self,
        site: SiteId,
        id: RuleId,
        rule: ExceptionRule,
        changed_by: &str,
    ) -> Result<StoredRule>;
    fn delete_rule(&self, site: SiteId, id: RuleId, changed_by: &str) -> Result<StoredRule>;
    fn insert_occurrence(
        &self,
        site: SiteId,
        new: NewOccurrence,
        changed_by: &str,
    ) -> Result<OccurrenceRecord>;
    fn update_occurrence(
        &self,
        site: SiteId,
        update: &OccurrenceUpdate,
        changed_by: &str,
    ) -> Result<OccurrenceRecord>;
    fn append_comment(
        &self,
        site: SiteId,
        message: &str,
        changed_by: &str,
    ) -> Result<ChangeLogEntry>;
}
