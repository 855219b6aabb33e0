//! # Input Validation
//!
//! Predicates on the loosely typed values that arrive from the browser, plus
//! `require_*` helpers that turn a failed predicate into a
//! [`FarmError::Validation`] carrying a corrective message.
//!
//! Every service runs these before touching the database.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use shared::Scalar;

use crate::error::{FarmError, FarmResult};

pub const MAX_NAME_LEN: usize = 20;
pub const MAX_LOCATION_LEN: usize = 20;
pub const MAX_CONTACT_LEN: usize = 80;
pub const MAX_CROP_NAME_LEN: usize = 60;
pub const MAX_PESTICIDE_NAME_LEN: usize = 60;
pub const MAX_CERTIFICATION_NAME_LEN: usize = 80;
pub const MAX_SEASON_LEN: usize = 20;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_positive_integer(value: &Scalar) -> bool {
    matches!(value.as_i64(), Some(n) if n > 0)
}

pub fn is_non_negative_number(value: &Scalar) -> bool {
    matches!(value.as_f64(), Some(n) if n >= 0.0)
}

/// Non-blank after trimming and at most `max_len` characters once trimmed
pub fn is_valid_string(value: &str, max_len: usize) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= max_len
}

pub fn is_valid_email(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.chars().count() <= MAX_CONTACT_LEN && EMAIL_PATTERN.is_match(trimmed)
}

/// A `YYYY-MM-DD` calendar date between 1900 and 2100
pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

pub fn is_valid_ph(value: &Scalar) -> bool {
    matches!(value.as_f64(), Some(n) if (0.0..=14.0).contains(&n))
}

pub fn is_valid_health_rating(value: &Scalar) -> bool {
    matches!(value.as_i64(), Some(n) if (1..=10).contains(&n))
}

/// 0 or 1, as a number or as a string
pub fn is_valid_boolean(value: &Scalar) -> bool {
    match value {
        Scalar::Int(n) => *n == 0 || *n == 1,
        Scalar::Float(n) => *n == 0.0 || *n == 1.0,
        Scalar::Text(text) => text == "0" || text == "1",
    }
}

pub fn is_valid_percentage(value: &Scalar) -> bool {
    matches!(value.as_f64(), Some(n) if (0.0..=100.0).contains(&n))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
}

// ---------------------------------------------------------------------------
// Typed extraction
// ---------------------------------------------------------------------------

pub fn require_id(value: Option<&Scalar>, label: &str) -> FarmResult<i64> {
    value
        .filter(|v| is_positive_integer(v))
        .and_then(Scalar::as_i64)
        .ok_or_else(|| FarmError::validation(format!("{} must be a positive integer.", label)))
}

pub fn require_text(value: Option<&str>, label: &str, max_len: usize) -> FarmResult<String> {
    match value {
        Some(text) if is_valid_string(text, max_len) => Ok(text.trim().to_string()),
        _ => Err(FarmError::validation(format!(
            "{} is required and must be at most {} characters.",
            label, max_len
        ))),
    }
}

pub fn require_email(value: Option<&str>, label: &str) -> FarmResult<String> {
    match value {
        Some(text) if is_valid_email(text) => Ok(text.trim().to_string()),
        _ => Err(FarmError::validation(format!(
            "{} must be a valid email address of at most {} characters.",
            label, MAX_CONTACT_LEN
        ))),
    }
}

pub fn require_date(value: Option<&str>, label: &str) -> FarmResult<NaiveDate> {
    value.and_then(parse_date).ok_or_else(|| {
        FarmError::validation(format!(
            "{} must be a valid date (YYYY-MM-DD) between {} and {}.",
            label, MIN_YEAR, MAX_YEAR
        ))
    })
}

pub fn require_non_negative(value: Option<&Scalar>, label: &str) -> FarmResult<f64> {
    value
        .filter(|v| is_non_negative_number(v))
        .and_then(Scalar::as_f64)
        .ok_or_else(|| FarmError::validation(format!("{} must be a non-negative number.", label)))
}

/// Optional non-negative number; absent and blank values become `None`
pub fn optional_non_negative(value: Option<&Scalar>, label: &str) -> FarmResult<Option<f64>> {
    match value {
        None => Ok(None),
        Some(v) if v.is_blank() => Ok(None),
        Some(v) => require_non_negative(Some(v), label).map(Some),
    }
}

/// Optional percentage; absent and blank values become `None`
pub fn optional_percentage(value: Option<&Scalar>, label: &str) -> FarmResult<Option<f64>> {
    match value {
        None => Ok(None),
        Some(v) if v.is_blank() => Ok(None),
        Some(v) if is_valid_percentage(v) => Ok(v.as_f64()),
        Some(_) => Err(FarmError::validation(format!(
            "{} must be a percentage between 0 and 100.",
            label
        ))),
    }
}

pub fn require_ph(value: Option<&Scalar>) -> FarmResult<f64> {
    value
        .filter(|v| is_valid_ph(v))
        .and_then(Scalar::as_f64)
        .ok_or_else(|| FarmError::validation("pH must be a number between 0 and 14."))
}

pub fn require_health_rating(value: Option<&Scalar>) -> FarmResult<i64> {
    value
        .filter(|v| is_valid_health_rating(v))
        .and_then(Scalar::as_i64)
        .ok_or_else(|| FarmError::validation("healthRating must be an integer between 1 and 10."))
}

pub fn require_boolean(value: Option<&Scalar>, label: &str) -> FarmResult<bool> {
    match value {
        Some(v) if is_valid_boolean(v) => Ok(v.as_i64() == Some(1)),
        _ => Err(FarmError::validation(format!("{} must be 0 or 1.", label))),
    }
}

/// `later` must fall strictly after `earlier`
pub fn require_after(
    earlier: NaiveDate,
    later: NaiveDate,
    earlier_label: &str,
    later_label: &str,
) -> FarmResult<()> {
    if later > earlier {
        Ok(())
    } else {
        Err(FarmError::validation(format!(
            "{} must be after {}.",
            later_label, earlier_label
        )))
    }
}
