//! Error types for rule validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a wide-form rule payload was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A field the rule type requires was not supplied.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A supplied field value is outside its valid domain.
    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// A parameter belonging to a different rule family was populated.
    #[error("`{field}` does not apply to rule type `{rule_type}`")]
    ForeignField {
        field: &'static str,
        rule_type: &'static str,
    },

    /// `date_range_daily` rules must carry an inclusive end date.
    #[error("rule type `date_range_daily` requires `effective_to_date`")]
    MissingRangeEnd,

    /// The effective window is inverted.
    #[error("`effective_to_date` {to} precedes `effective_from_date` {from}")]
    InvertedWindow { from: NaiveDate, to: NaiveDate },
}

pub type Result<T> = std::result::Result<T, RuleError>;
