//! # hours-engine
//!
//! Deterministic resolution of site operating hours: weekly base hours,
//! declarative exception rules, and the calendar arithmetic that merges them
//! into a day-by-day schedule.
//!
//! A site's schedule is a total weekly pattern ([`WeeklyHours`]) plus a set
//! of exception rules ([`ExceptionRule`]) -- holidays, seasonal closures,
//! recurring half-days. Rules are expanded into concrete dated
//! [`Occurrence`]s, and the manifest builder merges those with the base
//! pattern into exactly one [`ManifestRow`] per date. Everything is a pure
//! function of its inputs: no clocks, no I/O, no hidden state.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hours_engine::{
//!     build_manifest, expand_rule_between, DayHours, ExceptionRule, HoursOverride, RuleId,
//!     RuleKind, WeeklyHours,
//! };
//!
//! // Open 09:00-17:00 every day of the week.
//! let week = WeeklyHours::uniform(DayHours::open_between(
//!     "09:00:00".parse().unwrap(),
//!     "17:00:00".parse().unwrap(),
//! ));
//!
//! // Closed every July 4.
//! let rule = ExceptionRule {
//!     name: "Independence Day".into(),
//!     event_type: "holiday".into(),
//!     effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     effective_to: None,
//!     kind: RuleKind::FixedYearly {
//!         month: 7,
//!         day: 4,
//!         hours: HoursOverride::closed_all_day(),
//!     },
//! };
//!
//! let from = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
//! let to = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
//! let occurrences = expand_rule_between(RuleId(1), &rule, from, to);
//! let manifest = build_manifest(&week, &occurrences, from, to);
//!
//! assert_eq!(manifest.len(), 7);
//! assert!(manifest[0].exception.is_none()); // July 1: base hours
//! assert!(manifest[3].closed); // July 4: the rule won
//! assert!(manifest[3].exception.is_some());
//! ```
//!
//! ## Modules
//!
//! - [`types`] -- weekdays, daily hours, override payloads, identifiers
//! - [`rule`] -- the typed exception-rule model (six recurrence families)
//! - [`draft`] -- wide-form client payloads and validation into typed rules
//! - [`expand`] -- rule -> concrete dated occurrences
//! - [`manifest`] -- base hours + occurrences -> one row per date
//! - [`views`] -- past/future/occurrence projections
//! - [`error`] -- validation error types

pub mod draft;
pub mod error;
pub mod expand;
pub mod manifest;
pub mod rule;
pub mod types;
pub mod views;

pub use draft::RuleDraft;
pub use error::RuleError;
pub use expand::{candidate_years, expand_rule, expand_rule_between, Occurrence, OccurrenceOrigin};
pub use manifest::{build_manifest, AppliedException, ManifestRow};
pub use rule::{ExceptionRule, IntervalUnit, RangeProfiles, RuleKind, RuleType};
pub use types::{DayHours, DayOfWeek, HoursOverride, OccurrenceId, RuleId, WeeklyHours};
pub use views::{
    future_view, future_view_end, past_view, past_view_start, split_occurrences, OccurrenceBuckets,
    PAST_BASE_WINDOW_DAYS,
};
