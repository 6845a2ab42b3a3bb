//! Individual validation rules and their messages.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+([.-][a-zA-Z0-9]+)?$").expect("Invalid regex")
});

/// A single check applied to one field's raw JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, not null, and not blank.
    Required,
    /// A JSON string.
    String,
    /// A string holding a calendar date (see [`parse_date`]).
    Date,
    /// At least this many characters.
    MinLength(usize),
    /// Alphanumeric, optionally joined once by `.` or `-`.
    UsernameFormat,
    /// Contains a lowercase letter, an uppercase letter and a digit.
    PasswordFormat,
    /// Not already used by another record.
    Unique,
}

impl Rule {
    /// Whether `value` satisfies this rule.
    pub(crate) fn passes(self, value: &Value, is_taken: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Self::Required => match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                _ => true,
            },
            Self::String => value.is_string(),
            Self::Date => value.as_str().and_then(parse_date).is_some(),
            Self::MinLength(min) => match value {
                Value::Array(items) => items.len() >= min,
                other => as_text(other).is_some_and(|s| s.chars().count() >= min),
            },
            Self::UsernameFormat => as_text(value).is_some_and(|s| USERNAME_RE.is_match(&s)),
            Self::PasswordFormat => as_text(value).is_some_and(|s| {
                s.chars().any(|c| c.is_ascii_lowercase())
                    && s.chars().any(|c| c.is_ascii_uppercase())
                    && s.chars().any(|c| c.is_ascii_digit())
            }),
            Self::Unique => as_text(value).is_some_and(|s| !is_taken(&s)),
        }
    }

    /// Human-readable failure message for `field`.
    #[must_use]
    pub fn message(self, field: &str) -> String {
        let name = field.replace('_', " ");
        match self {
            Self::Required => format!("The {name} field is required."),
            Self::String => format!("The {name} field must be a string."),
            Self::Date => format!("The {name} field must be a valid date."),
            Self::MinLength(min) => format!("The {name} field must be at least {min} characters."),
            Self::UsernameFormat | Self::PasswordFormat => {
                format!("The {name} field format is invalid.")
            }
            Self::Unique => format!("The {name} has already been taken."),
        }
    }
}

/// Textual form of a scalar value; numbers count as their decimal text.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a date in `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339 form.
///
/// Date-times keep only their calendar date. Years outside `1..=9999` are
/// rejected, including signed years.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}

const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;
