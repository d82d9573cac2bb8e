//! `--max-age` duration parsing.
//!
//! Suffixes: `s` (or none) = second, `h` = hour, `d` = day, `w` = 7 days,
//! `m` = 30 days, `q` = 90 days, `y` = 365 days. Months, quarters and
//! years are fixed-day approximations here, unlike the calendar-true
//! retention granularities.

use crate::error::{Result, RetentionsError};

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;
const SECONDS_PER_MONTH: u64 = 30 * SECONDS_PER_DAY;
const SECONDS_PER_QUARTER: u64 = 90 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// A parsed `--max-age` limit. Keeps the original text for log rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxAge {
    pub raw: String,
    pub seconds: u64,
}

/// Parses a duration like `30d`, `12h` or a bare number of seconds.
///
/// # Errors
/// Returns a configuration error for an empty string, a missing number,
/// an unknown unit, a zero duration, or an overflowing value.
pub fn parse_max_age(input: &str) -> Result<MaxAge> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(RetentionsError::Config(
            "--max-age cannot be empty. Expected format: <number>[s|h|d|w|m|q|y]".to_string(),
        ));
    }

    let unit_start = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    if unit_start == 0 {
        return Err(RetentionsError::Config(format!(
            "invalid --max-age '{raw}': missing number. Expected format: <number>[s|h|d|w|m|q|y]"
        )));
    }

    let (num_str, unit) = raw.split_at(unit_start);
    let value: u64 = num_str.parse().map_err(|_| {
        RetentionsError::Config(format!(
            "invalid --max-age number '{num_str}': expected a positive integer"
        ))
    })?;
    if value == 0 {
        return Err(RetentionsError::Config(
            "--max-age must be greater than zero".to_string(),
        ));
    }

    let multiplier = match unit.to_lowercase().as_str() {
        "" | "s" => 1,
        "h" => SECONDS_PER_HOUR,
        "d" => SECONDS_PER_DAY,
        "w" => SECONDS_PER_WEEK,
        "m" => SECONDS_PER_MONTH,
        "q" => SECONDS_PER_QUARTER,
        "y" => SECONDS_PER_YEAR,
        _ => {
            return Err(RetentionsError::Config(format!(
                "invalid --max-age unit '{unit}'. Supported units: s, h, d, w, m, q, y"
            )));
        }
    };

    let seconds = value.checked_mul(multiplier).ok_or_else(|| {
        RetentionsError::Config(format!("--max-age '{raw}' is too large"))
    })?;

    Ok(MaxAge {
        raw: raw.to_string(),
        seconds,
    })
}

#[cfg(test)]
#[path = "age_tests.rs"]
mod tests;
