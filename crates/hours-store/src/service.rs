//! Schedule service: ties validation, storage, expansion, and projections
//! together.
//!
//! Stateless coordinator over a [`ScheduleStore`]. Every mutation method
//! follows the same pattern: validate the payload, resolve the acting
//! identity, hand the typed value to the store (which applies mutation and
//! audit atomically), log, return. Read methods pull rows, expand rules, and
//! project -- `today` is always an argument, never a hidden clock read.

use crate::changelog::{actor_or_system, ChangeLogEntry};
use crate::error::{Result, StoreError};
use crate::store::{
    BaseHoursChange, BaseHoursRow, NewOccurrence, OccurrenceRecord, OccurrenceUpdate,
    ScheduleStore, SiteId, StoredRule,
};
use chrono::NaiveDate;
use hours_engine::{
    build_manifest, candidate_years, expand_rule, expand_rule_between, views, ManifestRow,
    Occurrence, OccurrenceBuckets, RuleDraft, RuleId, WeeklyHours,
};

/// Operation façade for one schedule store.
#[derive(Debug)]
pub struct ScheduleService<S> {
    store: S,
}

impl<S: ScheduleStore> ScheduleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------
    // Exception rules
    // ------------------------------------------------------------------

    pub fn list_rules(&self, site: SiteId) -> Result<Vec<StoredRule>> {
        self.store.rules(site)
    }

    pub fn rule(&self, site: SiteId, id: RuleId) -> Result<StoredRule> {
        self.store.rule(site, id)
    }

    /// Validate a wide-form payload and persist the typed rule.
    ///
    /// # Errors
    /// Any [`RuleError`](hours_engine::RuleError) from validation, unchanged;
    /// nothing is persisted in that case.
    pub fn create_rule(
        &self,
        site: SiteId,
        draft: &RuleDraft,
        changed_by: Option<&str>,
    ) -> Result<StoredRule> {
        let rule = draft.validate()?;
        let actor = actor_or_system(changed_by);
        let stored = self.store.insert_rule(site, rule, &actor)?;
        tracing::info!(%site, rule = %stored.id, name = %stored.rule.name, "exception rule created");
        Ok(stored)
    }

    pub fn update_rule(
        &self,
        site: SiteId,
        id: RuleId,
        draft: &RuleDraft,
        changed_by: Option<&str>,
    ) -> Result<StoredRule> {
        let rule = draft.validate()?;
        let actor = actor_or_system(changed_by);
        let stored = self.store.update_rule(site, id, rule, &actor)?;
        tracing::info!(%site, rule = %stored.id, name = %stored.rule.name, "exception rule updated");
        Ok(stored)
    }

    pub fn delete_rule(
        &self,
        site: SiteId,
        id: RuleId,
        changed_by: Option<&str>,
    ) -> Result<StoredRule> {
        let actor = actor_or_system(changed_by);
        let removed = self.store.delete_rule(site, id, &actor)?;
        tracing::info!(%site, rule = %removed.id, name = %removed.rule.name, "exception rule deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Base hours
    // ------------------------------------------------------------------

    pub fn base_hours(&self, site: SiteId) -> Result<Vec<BaseHoursRow>> {
        self.store.base_hours(site)
    }

    /// Create the seven weekly rows for a freshly onboarded site.
    pub fn seed_base_hours(
        &self,
        site: SiteId,
        week: &WeeklyHours,
        changed_by: Option<&str>,
    ) -> Result<Vec<BaseHoursRow>> {
        let actor = actor_or_system(changed_by);
        let rows = self.store.seed_base_hours(site, week, &actor)?;
        tracing::info!(%site, "base hours seeded");
        Ok(rows)
    }

    /// Apply a batch of per-day edits; all rows or none.
    pub fn update_base_hours(
        &self,
        site: SiteId,
        changes: &[BaseHoursChange],
        changed_by: Option<&str>,
    ) -> Result<Vec<BaseHoursRow>> {
        let actor = actor_or_system(changed_by);
        let rows = self.store.update_base_hours(site, changes, &actor)?;
        tracing::info!(%site, rows = rows.len(), "base hours updated");
        Ok(rows)
    }

    /// The seeded week as a total weekly pattern.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when the site has never been seeded.
    pub fn weekly_hours(&self, site: SiteId) -> Result<WeeklyHours> {
        let rows = self.store.base_hours(site)?;
        if rows.is_empty() {
            return Err(StoreError::not_found("base hours for site", site));
        }
        let mut week = WeeklyHours::closed();
        for row in rows {
            week.set(row.day_of_week, row.hours);
        }
        Ok(week)
    }

    // ------------------------------------------------------------------
    // Standalone occurrences
    // ------------------------------------------------------------------

    pub fn create_occurrence(
        &self,
        site: SiteId,
        new: NewOccurrence,
        changed_by: Option<&str>,
    ) -> Result<OccurrenceRecord> {
        if new.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "occurrence name must not be empty".to_string(),
            ));
        }
        let actor = actor_or_system(changed_by);
        let record = self.store.insert_occurrence(site, new, &actor)?;
        tracing::info!(%site, occurrence = %record.id, date = %record.date, "occurrence created");
        Ok(record)
    }

    pub fn update_occurrence(
        &self,
        site: SiteId,
        update: &OccurrenceUpdate,
        changed_by: Option<&str>,
    ) -> Result<OccurrenceRecord> {
        if update.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "occurrence name must not be empty".to_string(),
            ));
        }
        let actor = actor_or_system(changed_by);
        let record = self.store.update_occurrence(site, update, &actor)?;
        tracing::info!(%site, occurrence = %record.id, date = %record.date, "occurrence updated");
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Resolved views
    // ------------------------------------------------------------------

    /// Resolve the day-by-day manifest for `[from, to]`.
    pub fn manifest(&self, site: SiteId, from: NaiveDate, to: NaiveDate) -> Result<Vec<ManifestRow>> {
        let week = self.weekly_hours(site)?;
        let mut candidates = Vec::new();
        for stored in self.store.rules(site)? {
            candidates.extend(expand_rule_between(stored.id, &stored.rule, from, to));
        }
        candidates.extend(self.standalone_candidates(site)?);
        let rows = build_manifest(&week, &candidates, from, to);
        tracing::debug!(%site, %from, %to, rows = rows.len(), "manifest resolved");
        Ok(rows)
    }

    /// Historical manifest slice: exceptions back to January 1 of the prior
    /// year, base-only rows only for the trailing week. Most recent first.
    pub fn past_view(&self, site: SiteId, today: NaiveDate) -> Result<Vec<ManifestRow>> {
        let rows = self.manifest(site, views::past_view_start(today), today)?;
        Ok(views::past_view(rows, today))
    }

    /// Forward manifest from `today`, ascending. `until` defaults to
    /// December 31 of next year.
    pub fn future_view(
        &self,
        site: SiteId,
        today: NaiveDate,
        until: Option<NaiveDate>,
    ) -> Result<Vec<ManifestRow>> {
        let to = until.unwrap_or_else(|| views::future_view_end(today));
        let rows = self.manifest(site, today, to)?;
        Ok(views::future_view(rows, today))
    }

    /// Every expanded occurrence over the candidate years around `today`,
    /// split into past and upcoming buckets.
    pub fn occurrences(&self, site: SiteId, today: NaiveDate) -> Result<OccurrenceBuckets> {
        let years = candidate_years(today);
        let mut all = Vec::new();
        for stored in self.store.rules(site)? {
            all.extend(expand_rule(stored.id, &stored.rule, &years));
        }
        all.extend(self.standalone_candidates(site)?);
        Ok(views::split_occurrences(all, today))
    }

    fn standalone_candidates(&self, site: SiteId) -> Result<Vec<Occurrence>> {
        Ok(self
            .store
            .occurrence_records(site)?
            .iter()
            .filter(|record| record.is_standalone())
            .map(OccurrenceRecord::to_occurrence)
            .collect())
    }

    // ------------------------------------------------------------------
    // Change log
    // ------------------------------------------------------------------

    /// The site's audit trail, newest entry first.
    pub fn change_log(&self, site: SiteId) -> Result<Vec<ChangeLogEntry>> {
        self.store.change_log(site)
    }

    pub fn add_comment(
        &self,
        site: SiteId,
        message: &str,
        changed_by: Option<&str>,
    ) -> Result<ChangeLogEntry> {
        if message.trim().is_empty() {
            return Err(StoreError::Validation(
                "comment must not be empty".to_string(),
            ));
        }
        let actor = actor_or_system(changed_by);
        let entry = self.store.append_comment(site, message, &actor)?;
        tracing::info!(%site, entry = %entry.id, "comment recorded");
        Ok(entry)
    }
}
