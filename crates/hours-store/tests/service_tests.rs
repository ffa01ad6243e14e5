//! Tests for the [`ScheduleService`] operation contracts: validation before
//! storage, resolved views, and the audit trail behind every mutation.

use chrono::{NaiveDate, NaiveTime};
use hours_engine::{DayHours, DayOfWeek, RuleDraft, RuleType, WeeklyHours};
use hours_store::{
    ChangeAction, MemoryStore, NewOccurrence, ScheduleService, SiteId, StoreError, SYSTEM_ACTOR,
};

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn week_9_to_5() -> WeeklyHours {
    WeeklyHours::uniform(DayHours::open_between(t(9, 0), t(17, 0)))
}

/// A service over a fresh in-memory store, with one seeded site.
fn seeded() -> (ScheduleService<MemoryStore>, SiteId) {
    let service = ScheduleService::new(MemoryStore::new());
    let site = SiteId::new();
    service
        .seed_base_hours(site, &week_9_to_5(), Some("ops@example.com"))
        .expect("seed should succeed");
    (service, site)
}

fn closed_single_draft(name: &str, date: NaiveDate) -> RuleDraft {
    let mut draft = RuleDraft::new(RuleType::SingleDate);
    draft.name = Some(name.to_string());
    draft.event_type = Some("holiday".to_string());
    draft.effective_from_date = Some(d(2020, 1, 1));
    draft.date = Some(date);
    draft.is_closed = Some(true);
    draft
}

// ---------------------------------------------------------------------------
// Validation happens before storage
// ---------------------------------------------------------------------------

#[test]
fn invalid_draft_persists_nothing() {
    let (service, site) = seeded();
    let mut draft = closed_single_draft("Broken", d(2025, 7, 4));
    draft.date = None; // required for single_date

    let result = service.create_rule(site, &draft, None);
    assert!(matches!(result, Err(StoreError::Rule(_))));
    assert!(service.list_rules(site).unwrap().is_empty());
    // Only the seed entry exists; the rejected rule left no trace.
    assert_eq!(service.change_log(site).unwrap().len(), 1);
}

#[test]
fn empty_occurrence_name_is_rejected() {
    let (service, site) = seeded();
    let result = service.create_occurrence(
        site,
        NewOccurrence {
            date: d(2025, 3, 1),
            name: "   ".to_string(),
            closed: true,
            open: None,
            close: None,
        },
        None,
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[test]
fn empty_comment_is_rejected() {
    let (service, site) = seeded();
    let result = service.add_comment(site, "  ", None);
    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[test]
fn anonymous_mutations_record_the_system_actor() {
    let (service, site) = seeded();
    service
        .create_rule(site, &closed_single_draft("Holiday", d(2025, 7, 4)), None)
        .expect("create should succeed");
    let log = service.change_log(site).unwrap();
    assert_eq!(log[0].changed_by, SYSTEM_ACTOR);
    // The seed carried an identity.
    assert_eq!(log[1].changed_by, "ops@example.com");
}

// ---------------------------------------------------------------------------
// Manifest resolution
// ---------------------------------------------------------------------------

#[test]
fn manifest_unseeded_site_is_not_found() {
    let service = ScheduleService::new(MemoryStore::new());
    let site = SiteId::new();
    let result = service.manifest(site, d(2025, 7, 1), d(2025, 7, 7));
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[test]
fn july_fourth_closure_end_to_end() {
    let (service, site) = seeded();
    let stored = service
        .create_rule(
            site,
            &closed_single_draft("Independence Day", d(2025, 7, 4)),
            Some("ops@example.com"),
        )
        .expect("create should succeed");

    let rows = service
        .manifest(site, d(2025, 7, 1), d(2025, 7, 7))
        .expect("manifest should resolve");
    assert_eq!(rows.len(), 7);

    for row in &rows {
        if row.date == d(2025, 7, 4) {
            assert!(row.closed);
            assert_eq!(row.exception_rule_id(), Some(stored.id));
        } else {
            assert!(!row.closed);
            assert!(row.exception.is_none());
            assert_eq!(row.open, Some(t(9, 0)));
        }
    }
}

#[test]
fn standalone_override_beats_a_rule_on_the_same_date() {
    let (service, site) = seeded();
    service
        .create_rule(site, &closed_single_draft("Holiday", d(2025, 7, 4)), None)
        .unwrap();
    service
        .create_occurrence(
            site,
            NewOccurrence {
                date: d(2025, 7, 4),
                name: "Skeleton crew".to_string(),
                closed: false,
                open: Some(t(10, 0)),
                close: Some(t(14, 0)),
            },
            None,
        )
        .unwrap();

    let rows = service
        .manifest(site, d(2025, 7, 4), d(2025, 7, 4))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].closed);
    assert_eq!(rows[0].open, Some(t(10, 0)));
    let applied = rows[0].exception.as_ref().expect("override must apply");
    assert_eq!(applied.name, "Skeleton crew");
}

#[test]
fn rule_edits_show_on_the_next_read() {
    let (service, site) = seeded();
    let stored = service
        .create_rule(site, &closed_single_draft("Holiday", d(2025, 7, 4)), None)
        .unwrap();

    let moved = closed_single_draft("Holiday", d(2025, 7, 3));
    service.update_rule(site, stored.id, &moved, None).unwrap();

    let rows = service
        .manifest(site, d(2025, 7, 1), d(2025, 7, 7))
        .unwrap();
    assert!(rows.iter().any(|row| row.date == d(2025, 7, 3) && row.closed));
    assert!(rows
        .iter()
        .all(|row| row.date != d(2025, 7, 4) || !row.closed));
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

#[test]
fn past_view_keeps_exceptions_but_trims_old_base_rows() {
    let (service, site) = seeded();
    let today = d(2025, 6, 15);
    service
        .create_rule(site, &closed_single_draft("Spring closure", d(2025, 3, 1)), None)
        .unwrap();

    let rows = service.past_view(site, today).expect("past view");

    // Newest first, starting at today.
    assert_eq!(rows[0].date, today);
    for pair in rows.windows(2) {
        assert!(pair[0].date > pair[1].date);
    }

    // A base-only day 3 days back survives; one 10 days back does not.
    assert!(rows.iter().any(|row| row.date == d(2025, 6, 12)));
    assert!(!rows.iter().any(|row| row.date == d(2025, 6, 5)));

    // The March exception is retained well beyond the trailing window.
    let march = rows
        .iter()
        .find(|row| row.date == d(2025, 3, 1))
        .expect("exception row kept");
    assert!(march.closed);
    assert!(march.has_exception());
}

#[test]
fn future_view_runs_to_the_end_of_next_year() {
    let (service, site) = seeded();
    let today = d(2025, 6, 15);
    let rows = service.future_view(site, today, None).expect("future view");

    assert_eq!(rows.first().map(|row| row.date), Some(today));
    assert_eq!(rows.last().map(|row| row.date), Some(d(2026, 12, 31)));
    for pair in rows.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
}

#[test]
fn future_view_honors_an_explicit_bound() {
    let (service, site) = seeded();
    let today = d(2025, 6, 15);
    let rows = service
        .future_view(site, today, Some(d(2025, 6, 21)))
        .unwrap();
    assert_eq!(rows.len(), 7);
}

#[test]
fn occurrence_buckets_split_rules_and_standalones() {
    let (service, site) = seeded();
    let today = d(2025, 6, 15);

    let mut christmas = RuleDraft::new(RuleType::FixedYearly);
    christmas.name = Some("Christmas Day".to_string());
    christmas.event_type = Some("holiday".to_string());
    christmas.effective_from_date = Some(d(2024, 1, 1));
    christmas.month = Some(12);
    christmas.day = Some(25);
    christmas.is_closed = Some(true);
    service.create_rule(site, &christmas, None).unwrap();

    service
        .create_occurrence(
            site,
            NewOccurrence {
                date: d(2025, 8, 1),
                name: "Deep clean".to_string(),
                closed: true,
                open: None,
                close: None,
            },
            None,
        )
        .unwrap();

    let buckets = service.occurrences(site, today).expect("buckets");
    assert!(buckets
        .past
        .iter()
        .any(|occ| occ.date == d(2024, 12, 25) && occ.name == "Christmas Day"));
    assert!(buckets
        .upcoming
        .iter()
        .any(|occ| occ.date == d(2025, 12, 25)));
    assert!(buckets
        .upcoming
        .iter()
        .any(|occ| occ.date == d(2025, 8, 1) && occ.name == "Deep clean"));
    assert!(buckets.past.iter().all(|occ| occ.date < today));
    assert!(buckets.upcoming.iter().all(|occ| occ.date >= today));
}

// ---------------------------------------------------------------------------
// Audit completeness
// ---------------------------------------------------------------------------

#[test]
fn every_accepted_base_hours_row_gets_a_diffed_entry() {
    let (service, site) = seeded();
    let rows = service.base_hours(site).unwrap();
    let changes = vec![hours_store::BaseHoursChange {
        id: rows[0].id,
        day_of_week: DayOfWeek::Monday,
        hours: DayHours::open_between(t(8, 0), t(16, 0)),
    }];
    service
        .update_base_hours(site, &changes, Some("ops@example.com"))
        .expect("batch should apply");

    let log = service.change_log(site).unwrap();
    assert_eq!(log[0].action, ChangeAction::Updated);
    let diff = log[0].diff.expect("base-hours updates carry a diff");
    assert_eq!(diff.open_before, Some(t(9, 0)));
    assert_eq!(diff.open_after, Some(t(8, 0)));
    assert_eq!(diff.close_before, Some(t(17, 0)));
    assert_eq!(diff.close_after, Some(t(16, 0)));
}

#[test]
fn comments_land_on_top_of_the_log() {
    let (service, site) = seeded();
    service
        .add_comment(site, "switched to summer hours", Some("ops@example.com"))
        .expect("comment should append");
    let log = service.change_log(site).unwrap();
    assert_eq!(log[0].action, ChangeAction::Comment);
    assert_eq!(log[0].message, "switched to summer hours");
}
