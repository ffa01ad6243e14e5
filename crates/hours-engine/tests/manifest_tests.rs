//! Tests for manifest building: base hours plus occurrence candidates merged
//! into one resolved row per date.

use chrono::{NaiveDate, NaiveTime};
use hours_engine::{
    build_manifest, DayHours, DayOfWeek, Occurrence, OccurrenceId, OccurrenceOrigin, RuleId,
    WeeklyHours,
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

fn rule_occurrence(id: u64, date: NaiveDate, name: &str) -> Occurrence {
    Occurrence {
        date,
        day_of_week: DayOfWeek::of(date),
        name: name.to_string(),
        closed: true,
        open: None,
        close: None,
        origin: OccurrenceOrigin::Rule {
            id: RuleId(id),
            recurring: true,
        },
    }
}

fn standalone_occurrence(id: u64, date: NaiveDate, name: &str) -> Occurrence {
    Occurrence {
        date,
        day_of_week: DayOfWeek::of(date),
        name: name.to_string(),
        closed: true,
        open: None,
        close: None,
        origin: OccurrenceOrigin::Standalone {
            id: OccurrenceId(id),
        },
    }
}

// ---------------------------------------------------------------------------
// Completeness
// ---------------------------------------------------------------------------

#[test]
fn one_row_per_date_with_no_candidates() {
    let manifest = build_manifest(&week_9_to_5(), &[], d(2024, 7, 1), d(2024, 7, 31));
    assert_eq!(manifest.len(), 31);
    for (offset, row) in manifest.iter().enumerate() {
        assert_eq!(row.date, d(2024, 7, 1 + offset as u32));
        assert_eq!(row.day_of_week, DayOfWeek::of(row.date));
        assert!(!row.closed);
        assert_eq!(row.open, Some(t(9, 0)));
        assert_eq!(row.close, Some(t(17, 0)));
        assert!(row.exception.is_none());
    }
}

#[test]
fn inverted_range_is_empty() {
    let manifest = build_manifest(&week_9_to_5(), &[], d(2024, 7, 31), d(2024, 7, 1));
    assert!(manifest.is_empty());
}

#[test]
fn single_day_range_has_one_row() {
    let manifest = build_manifest(&week_9_to_5(), &[], d(2024, 7, 4), d(2024, 7, 4));
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest[0].day_of_week, DayOfWeek::Thursday);
}

#[test]
fn closed_base_day_passes_through() {
    let mut week = week_9_to_5();
    week.set(DayOfWeek::Sunday, DayHours::CLOSED);
    let manifest = build_manifest(&week, &[], d(2024, 7, 1), d(2024, 7, 7));
    // July 7, 2024 is a Sunday.
    let sunday = &manifest[6];
    assert_eq!(sunday.day_of_week, DayOfWeek::Sunday);
    assert!(sunday.closed);
    assert!(sunday.exception.is_none());
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn closed_override_wins_over_base() {
    let candidates = vec![rule_occurrence(1, d(2024, 7, 4), "Independence Day")];
    let manifest = build_manifest(&week_9_to_5(), &candidates, d(2024, 7, 1), d(2024, 7, 7));
    let row = &manifest[3];
    assert!(row.closed);
    let applied = row.exception.as_ref().expect("exception should be recorded");
    assert_eq!(applied.name, "Independence Day");
    assert_eq!(row.exception_rule_id(), Some(RuleId(1)));
}

#[test]
fn partial_override_falls_back_to_base_times() {
    // Only the closing time is overridden; opening stays the base 09:00.
    let mut occurrence = rule_occurrence(1, d(2024, 7, 3), "Early close");
    occurrence.closed = false;
    occurrence.open = None;
    occurrence.close = Some(t(15, 0));
    let manifest = build_manifest(&week_9_to_5(), &[occurrence], d(2024, 7, 3), d(2024, 7, 3));
    assert!(!manifest[0].closed);
    assert_eq!(manifest[0].open, Some(t(9, 0)));
    assert_eq!(manifest[0].close, Some(t(15, 0)));
}

#[test]
fn full_override_replaces_both_times() {
    let mut occurrence = rule_occurrence(1, d(2024, 7, 3), "Late start");
    occurrence.closed = false;
    occurrence.open = Some(t(12, 0));
    occurrence.close = Some(t(20, 0));
    let manifest = build_manifest(&week_9_to_5(), &[occurrence], d(2024, 7, 3), d(2024, 7, 3));
    assert_eq!(manifest[0].open, Some(t(12, 0)));
    assert_eq!(manifest[0].close, Some(t(20, 0)));
}

#[test]
fn closed_override_still_falls_back_times() {
    // The closed flag comes from the winner; unset times still resolve
    // against the base so the row stays fully populated.
    let manifest = build_manifest(
        &week_9_to_5(),
        &[rule_occurrence(1, d(2024, 7, 4), "Holiday")],
        d(2024, 7, 4),
        d(2024, 7, 4),
    );
    assert!(manifest[0].closed);
    assert_eq!(manifest[0].open, Some(t(9, 0)));
    assert_eq!(manifest[0].close, Some(t(17, 0)));
}

#[test]
fn candidates_outside_range_are_ignored() {
    let candidates = vec![rule_occurrence(1, d(2024, 8, 1), "Next month")];
    let manifest = build_manifest(&week_9_to_5(), &candidates, d(2024, 7, 1), d(2024, 7, 31));
    assert!(manifest.iter().all(|row| row.exception.is_none()));
}

// ---------------------------------------------------------------------------
// Same-date precedence
// ---------------------------------------------------------------------------

#[test]
fn standalone_beats_rule_on_same_date() {
    let date = d(2024, 7, 4);
    let candidates = vec![
        rule_occurrence(9, date, "Rule closure"),
        standalone_occurrence(1, date, "Manual override"),
    ];
    let manifest = build_manifest(&week_9_to_5(), &candidates, date, date);
    let applied = manifest[0].exception.as_ref().expect("winner expected");
    assert_eq!(applied.name, "Manual override");
    assert_eq!(
        applied.origin,
        OccurrenceOrigin::Standalone {
            id: OccurrenceId(1)
        }
    );
    assert_eq!(manifest[0].exception_rule_id(), None);
}

#[test]
fn higher_rule_id_wins_within_rules() {
    let date = d(2024, 7, 4);
    let candidates = vec![
        rule_occurrence(1, date, "Older rule"),
        rule_occurrence(2, date, "Newer rule"),
    ];
    let manifest = build_manifest(&week_9_to_5(), &candidates, date, date);
    let applied = manifest[0].exception.as_ref().expect("winner expected");
    assert_eq!(applied.name, "Newer rule");
}

#[test]
fn higher_standalone_id_wins_within_standalones() {
    let date = d(2024, 7, 4);
    let candidates = vec![
        standalone_occurrence(3, date, "First edit"),
        standalone_occurrence(8, date, "Second edit"),
    ];
    let manifest = build_manifest(&week_9_to_5(), &candidates, date, date);
    let applied = manifest[0].exception.as_ref().expect("winner expected");
    assert_eq!(applied.name, "Second edit");
}

#[test]
fn candidate_order_does_not_change_the_winner() {
    let date = d(2024, 7, 4);
    let forward = vec![
        rule_occurrence(5, date, "Rule"),
        standalone_occurrence(2, date, "Standalone"),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();
    let a = build_manifest(&week_9_to_5(), &forward, date, date);
    let b = build_manifest(&week_9_to_5(), &reversed, date, date);
    assert_eq!(a, b);
}
