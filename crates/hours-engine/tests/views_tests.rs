//! Tests for the past/future manifest projections and occurrence buckets.

use chrono::{NaiveDate, NaiveTime};
use hours_engine::{
    build_manifest, future_view, future_view_end, past_view, past_view_start, split_occurrences,
    DayHours, DayOfWeek, Occurrence, OccurrenceOrigin, RuleId, WeeklyHours,
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

fn closure(id: u64, date: NaiveDate, name: &str) -> Occurrence {
    Occurrence {
        date,
        day_of_week: DayOfWeek::of(date),
        name: name.to_string(),
        closed: true,
        open: None,
        close: None,
        origin: OccurrenceOrigin::Rule {
            id: RuleId(id),
            recurring: false,
        },
    }
}

const TODAY: (i32, u32, u32) = (2024, 7, 15);

fn today() -> NaiveDate {
    d(TODAY.0, TODAY.1, TODAY.2)
}

// ---------------------------------------------------------------------------
// Past view
// ---------------------------------------------------------------------------

#[test]
fn past_view_keeps_only_recent_base_rows() {
    let rows = build_manifest(&week_9_to_5(), &[], d(2024, 7, 1), d(2024, 7, 20));
    let past = past_view(rows, today());

    // Base-only rows survive for the trailing week: July 8 through 15.
    assert_eq!(past.len(), 8);
    assert_eq!(past[0].date, d(2024, 7, 15));
    assert_eq!(past[7].date, d(2024, 7, 8));

    // Ten days back is gone; three days back is kept.
    assert!(!past.iter().any(|row| row.date == d(2024, 7, 5)));
    assert!(past.iter().any(|row| row.date == d(2024, 7, 12)));
}

#[test]
fn past_view_keeps_exception_rows_beyond_window() {
    let occurrences = vec![closure(1, d(2024, 3, 15), "Spring maintenance")];
    let rows = build_manifest(&week_9_to_5(), &occurrences, d(2024, 3, 1), d(2024, 7, 20));
    let past = past_view(rows, today());

    let kept: Vec<NaiveDate> = past.iter().map(|row| row.date).collect();
    assert!(kept.contains(&d(2024, 3, 15)), "exception row must survive");
    assert!(!kept.contains(&d(2024, 3, 14)), "old base row must not");
    assert!(past.iter().all(|row| row.date <= today()));
}

#[test]
fn past_view_is_most_recent_first() {
    let rows = build_manifest(&week_9_to_5(), &[], d(2024, 7, 1), d(2024, 7, 20));
    let past = past_view(rows, today());
    for pair in past.windows(2) {
        assert!(pair[0].date > pair[1].date);
    }
}

// ---------------------------------------------------------------------------
// Future view
// ---------------------------------------------------------------------------

#[test]
fn future_view_starts_today_and_ascends() {
    let rows = build_manifest(&week_9_to_5(), &[], d(2024, 7, 1), d(2024, 7, 20));
    let future = future_view(rows, today());

    assert_eq!(future.first().map(|row| row.date), Some(d(2024, 7, 15)));
    assert_eq!(future.last().map(|row| row.date), Some(d(2024, 7, 20)));
    for pair in future.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
}

#[test]
fn future_view_keeps_base_and_exception_rows() {
    let occurrences = vec![closure(1, d(2024, 7, 18), "Stocktake")];
    let rows = build_manifest(&week_9_to_5(), &occurrences, d(2024, 7, 1), d(2024, 7, 20));
    let future = future_view(rows, today());

    assert_eq!(future.len(), 6); // July 15 through 20.
    let stocktake = future
        .iter()
        .find(|row| row.date == d(2024, 7, 18))
        .expect("July 18 should be present");
    assert!(stocktake.closed);
    assert!(stocktake.exception.is_some());
}

// ---------------------------------------------------------------------------
// Occurrence buckets
// ---------------------------------------------------------------------------

#[test]
fn split_counts_today_as_upcoming() {
    let occurrences = vec![
        closure(1, d(2024, 7, 10), "Past closure"),
        closure(2, today(), "Today closure"),
        closure(3, d(2024, 7, 20), "Future closure"),
    ];
    let buckets = split_occurrences(occurrences, today());
    assert_eq!(buckets.past.len(), 1);
    assert_eq!(buckets.upcoming.len(), 2);
    assert_eq!(buckets.upcoming[0].date, today());
}

#[test]
fn split_orders_past_desc_and_upcoming_asc() {
    let occurrences = vec![
        closure(1, d(2024, 7, 1), "A"),
        closure(2, d(2024, 7, 10), "B"),
        closure(3, d(2024, 7, 15), "C"),
        closure(4, d(2024, 7, 20), "D"),
    ];
    let buckets = split_occurrences(occurrences, today());
    let past: Vec<NaiveDate> = buckets.past.iter().map(|occ| occ.date).collect();
    let upcoming: Vec<NaiveDate> = buckets.upcoming.iter().map(|occ| occ.date).collect();
    assert_eq!(past, vec![d(2024, 7, 10), d(2024, 7, 1)]);
    assert_eq!(upcoming, vec![d(2024, 7, 15), d(2024, 7, 20)]);
}

// ---------------------------------------------------------------------------
// Default horizons
// ---------------------------------------------------------------------------

#[test]
fn default_horizons_span_prior_and_next_year() {
    assert_eq!(past_view_start(today()), d(2023, 1, 1));
    assert_eq!(future_view_end(today()), d(2025, 12, 31));
}
