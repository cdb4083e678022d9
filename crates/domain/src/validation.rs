//! Structural validators shared by resource mappers.
//!
//! Each validator names the offending field in its message and returns
//! [`AppError::Validation`].

use chrono::{DateTime, Utc};
use oig_core::{AppError, AppResult};

use crate::parse_timestamp;

/// Requires `value` to be one of `allowed`.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> AppResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{field} must be one of [{}], got \"{value}\"",
        allowed.join(", ")
    )))
}

/// Caps the number of entries in a list.
pub fn at_most(field: &str, count: usize, max: usize) -> AppResult<()> {
    if count <= max {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{field} supports at most {max} entries, got {count}"
    )))
}

/// Requires an integer inside an inclusive range.
pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> AppResult<()> {
    if (min..=max).contains(&value) {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{field} must be between {min} and {max}, got {value}"
    )))
}

/// Requires an RFC3339 timestamp.
pub fn rfc3339(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    parse_timestamp(value).map_err(|_| {
        AppError::Validation(format!(
            "{field} must be an RFC3339 timestamp such as 2026-01-31T09:00:00Z, got \"{value}\""
        ))
    })
}

/// Requires an RFC3339 timestamp strictly after `now`.
pub fn future_timestamp(field: &str, value: &str, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let parsed = rfc3339(field, value)?;
    if parsed <= now {
        return Err(AppError::Validation(format!(
            "{field} must be a future timestamp"
        )));
    }

    Ok(parsed)
}

/// Requires a field to be present when a condition holds.
pub fn required_when(field: &str, present: bool, condition: &str) -> AppResult<()> {
    if present {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{field} is required when {condition}"
    )))
}

/// Requires an ISO-8601 duration such as `P1M`, `P2W`, or `P1DT12H`.
pub fn iso8601_duration(field: &str, value: &str) -> AppResult<()> {
    if is_iso8601_duration(value) {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{field} must be an ISO-8601 duration such as P1M or P3M, got \"{value}\""
    )))
}

fn is_iso8601_duration(value: &str) -> bool {
    let Some(body) = value.strip_prefix('P') else {
        return false;
    };
    let (date_part, time_part) = match body.split_once('T') {
        Some((date_part, time_part)) => (date_part, Some(time_part)),
        None => (body, None),
    };

    let Some(date_components) = count_components(date_part, &['Y', 'M', 'W', 'D']) else {
        return false;
    };
    let time_components = match time_part {
        Some(time_part) => match count_components(time_part, &['H', 'M', 'S']) {
            Some(0) | None => return false,
            Some(count) => count,
        },
        None => 0,
    };

    date_components + time_components > 0
}

/// Counts `<digits><designator>` pairs, requiring designators in order.
fn count_components(part: &str, designators: &[char]) -> Option<usize> {
    let mut remaining = designators;
    let mut digits = 0_usize;
    let mut count = 0_usize;

    for character in part.chars() {
        if character.is_ascii_digit() {
            digits += 1;
            continue;
        }
        if digits == 0 {
            return None;
        }
        let position = remaining.iter().position(|designator| *designator == character)?;
        remaining = &remaining[position + 1..];
        digits = 0;
        count += 1;
    }

    (digits == 0).then_some(count)
}
