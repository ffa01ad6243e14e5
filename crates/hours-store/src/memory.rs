//! In-memory [`ScheduleStore`] implementation.
//!
//! The reference backend for tests, tools, and single-process embedding. One
//! `RwLock` guards the whole state, so each write applies its mutation and
//! audit entries inside a single critical section -- the trait's atomicity
//! contract for free.

use crate::changelog::{ChangeDraft, ChangeId, ChangeLogEntry};
use crate::error::{Result, StoreError};
use crate::store::{
    BaseHoursChange, BaseHoursId, BaseHoursRow, NewOccurrence, OccurrenceRecord, OccurrenceUpdate,
    ScheduleStore, SiteId, StoredRule,
};
use chrono::Utc;
use hours_engine::{DayHours, DayOfWeek, ExceptionRule, OccurrenceId, RuleId, WeeklyHours};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory schedule store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    base: BTreeMap<u64, BaseHoursRow>,
    rules: BTreeMap<u64, StoredRule>,
    occurrences: BTreeMap<u64, OccurrenceRecord>,
    changes: Vec<ChangeLogEntry>,
    base_seq: u64,
    rule_seq: u64,
    occurrence_seq: u64,
    change_seq: u64,
}

impl Inner {
    /// Stamp and append a change entry inside the caller's critical section.
    fn record(&mut self, site: SiteId, draft: ChangeDraft) -> ChangeLogEntry {
        self.change_seq += 1;
        let entry = ChangeLogEntry {
            id: ChangeId(self.change_seq),
            site_id: site,
            timestamp: Utc::now(),
            action: draft.action,
            source: draft.source,
            message: draft.message,
            changed_by: draft.changed_by,
            diff: draft.diff,
        };
        self.changes.push(entry.clone());
        entry
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds consistent data here; absorb it.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScheduleStore for MemoryStore {
    fn base_hours(&self, site: SiteId) -> Result<Vec<BaseHoursRow>> {
        let inner = self.read();
        Ok(inner
            .base
            .values()
            .filter(|row| row.site_id == site)
            .cloned()
            .collect())
    }

    fn rules(&self, site: SiteId) -> Result<Vec<StoredRule>> {
        let inner = self.read();
        Ok(inner
            .rules
            .values()
            .filter(|stored| stored.site_id == site)
            .cloned()
            .collect())
    }

    fn rule(&self, site: SiteId, id: RuleId) -> Result<StoredRule> {
        let inner = self.read();
        inner
            .rules
            .get(&id.0)
            .filter(|stored| stored.site_id == site)
            .cloned()
            .ok_or_else(|| StoreError::not_found("exception rule", id))
    }

    fn occurrence_records(&self, site: SiteId) -> Result<Vec<OccurrenceRecord>> {
        let inner = self.read();
        Ok(inner
            .occurrences
            .values()
            .filter(|record| record.site_id == site)
            .cloned()
            .collect())
    }

    fn change_log(&self, site: SiteId) -> Result<Vec<ChangeLogEntry>> {
        let inner = self.read();
        Ok(inner
            .changes
            .iter()
            .rev()
            .filter(|entry| entry.site_id == site)
            .cloned()
            .collect())
    }

    fn seed_base_hours(
        &self,
        site: SiteId,
        week: &WeeklyHours,
        changed_by: &str,
    ) -> Result<Vec<BaseHoursRow>> {
        let mut inner = self.write();
        if inner.base.values().any(|row| row.site_id == site) {
            return Err(StoreError::Validation(format!(
                "base hours already seeded for site {site}"
            )));
        }
        let mut rows = Vec::with_capacity(DayOfWeek::ALL.len());
        for (day, hours) in week.iter() {
            inner.base_seq += 1;
            let row = BaseHoursRow {
                id: BaseHoursId(inner.base_seq),
                site_id: site,
                day_of_week: day,
                hours,
            };
            inner.base.insert(row.id.0, row.clone());
            rows.push(row);
        }
        inner.record(site, ChangeDraft::base_hours_seeded(changed_by));
        Ok(rows)
    }

    fn update_base_hours(
        &self,
        site: SiteId,
        changes: &[BaseHoursChange],
        changed_by: &str,
    ) -> Result<Vec<BaseHoursRow>> {
        let mut inner = self.write();

        // Validate the whole batch before touching any row.
        let mut staged: Vec<(u64, DayHours)> = Vec::with_capacity(changes.len());
        for change in changes {
            let row = inner
                .base
                .get(&change.id.0)
                .filter(|row| row.site_id == site)
                .ok_or_else(|| StoreError::not_found("base hours row", change.id))?;
            if row.day_of_week != change.day_of_week {
                return Err(StoreError::Validation(format!(
                    "base hours row {} holds {}, not {}",
                    change.id, row.day_of_week, change.day_of_week
                )));
            }
            staged.push((change.id.0, row.hours));
        }

        // Apply the edits, one audit entry per row.
        let mut updated = Vec::with_capacity(changes.len());
        for (change, (key, before)) in changes.iter().zip(staged) {
            if let Some(row) = inner.base.get_mut(&key) {
                row.hours = change.hours;
                updated.push(row.clone());
            }
            let diff = crate::changelog::BaseHoursDiff::between(
                change.day_of_week,
                before,
                change.hours,
            );
            inner.record(site, ChangeDraft::base_hours_updated(diff, changed_by));
        }
        Ok(updated)
    }

    fn insert_rule(
        &self,
        site: SiteId,
        rule: ExceptionRule,
        changed_by: &str,
    ) -> Result<StoredRule> {
        let mut inner = self.write();
        inner.rule_seq += 1;
        let now = Utc::now();
        let stored = StoredRule {
            id: RuleId(inner.rule_seq),
            site_id: site,
            created_at: now,
            updated_at: now,
            rule,
        };
        inner.record(site, ChangeDraft::rule_created(&stored.rule, changed_by));
        inner.rules.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    fn update_rule(
        &self,
        site: SiteId,
        id: RuleId,
        rule: ExceptionRule,
        changed_by: &str,
    ) -> Result<StoredRule> {
        let mut inner = self.write();
        let entry = inner
            .rules
            .get_mut(&id.0)
            .filter(|stored| stored.site_id == site)
            .ok_or_else(|| StoreError::not_found("exception rule", id))?;
        entry.rule = rule;
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        inner.record(site, ChangeDraft::rule_updated(&updated.rule, changed_by));
        Ok(updated)
    }

    fn delete_rule(&self, site: SiteId, id: RuleId, changed_by: &str) -> Result<StoredRule> {
        let mut inner = self.write();
        match inner.rules.get(&id.0) {
            Some(stored) if stored.site_id == site => {}
            _ => return Err(StoreError::not_found("exception rule", id)),
        }
        let Some(removed) = inner.rules.remove(&id.0) else {
            return Err(StoreError::not_found("exception rule", id));
        };
        inner.record(site, ChangeDraft::rule_deleted(&removed.rule.name, changed_by));
        Ok(removed)
    }

    fn insert_occurrence(
        &self,
        site: SiteId,
        new: NewOccurrence,
        changed_by: &str,
    ) -> Result<OccurrenceRecord> {
        let mut inner = self.write();
        inner.occurrence_seq += 1;
        let record = OccurrenceRecord {
            id: OccurrenceId(inner.occurrence_seq),
            site_id: site,
            exception_id: None,
            date: new.date,
            name: new.name,
            closed: new.closed,
            open: new.open,
            close: new.close,
            created_at: Utc::now(),
        };
        inner.record(
            site,
            ChangeDraft::occurrence_created(&record.name, record.date, changed_by),
        );
        inner.occurrences.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn update_occurrence(
        &self,
        site: SiteId,
        update: &OccurrenceUpdate,
        changed_by: &str,
    ) -> Result<OccurrenceRecord> {
        let mut inner = self.write();
        let record = inner
            .occurrences
            .get_mut(&update.id.0)
            .filter(|record| record.site_id == site)
            .ok_or_else(|| StoreError::not_found("occurrence", update.id))?;
        record.date = update.date;
        record.name = update.name.clone();
        record.closed = update.closed;
        record.open = update.open;
        record.close = update.close;
        let updated = record.clone();
        inner.record(
            site,
            ChangeDraft::occurrence_updated(&updated.name, updated.date, changed_by),
        );
        Ok(updated)
    }

    fn append_comment(
        &self,
        site: SiteId,
        message: &str,
        changed_by: &str,
    ) -> Result<ChangeLogEntry> {
        let mut inner = self.write();
        Ok(inner.record(site, ChangeDraft::comment(message, changed_by)))
    }
}
