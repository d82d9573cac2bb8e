//! `--max-size` parsing.
//!
//! Suffixes K, M, G, T, P, E are powers of 1024; fractional values like
//! `1.5G` are accepted. A bare number is a byte count.

use crate::error::{Result, RetentionsError};

/// A parsed `--max-size` limit. Keeps the original text for log rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxSize {
    pub raw: String,
    pub bytes: u64,
}

/// Parses a size like `512M`, `1.5G` or a bare byte count.
///
/// # Errors
/// Returns a configuration error for an empty string, a missing or
/// malformed number, an unknown suffix, a zero size, or a value that
/// does not fit in 64 bits.
pub fn parse_max_size(input: &str) -> Result<MaxSize> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(RetentionsError::Config(
            "--max-size cannot be empty. Expected format: <number>[K|M|G|T|P|E]".to_string(),
        ));
    }

    let unit_start = raw
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(raw.len());
    if unit_start == 0 {
        return Err(RetentionsError::Config(format!(
            "invalid --max-size '{raw}': missing number. Expected format: <number>[K|M|G|T|P|E]"
        )));
    }

    let (num_str, unit) = raw.split_at(unit_start);
    let value: f64 = num_str.parse().map_err(|_| {
        RetentionsError::Config(format!(
            "invalid --max-size number '{num_str}': expected a positive value"
        ))
    })?;

    let exponent: i32 = match unit.to_uppercase().as_str() {
        "" => 0,
        "K" => 1,
        "M" => 2,
        "G" => 3,
        "T" => 4,
        "P" => 5,
        "E" => 6,
        _ => {
            return Err(RetentionsError::Config(format!(
                "invalid --max-size suffix '{unit}'. Supported suffixes: K, M, G, T, P, E"
            )));
        }
    };

    let bytes = value * 1024_f64.powi(exponent);
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(RetentionsError::Config(format!(
            "--max-size '{raw}' is too large"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bytes = bytes.round() as u64;
    if bytes == 0 {
        return Err(RetentionsError::Config(
            "--max-size must be greater than zero".to_string(),
        ));
    }

    Ok(MaxSize {
        raw: raw.to_string(),
        bytes,
    })
}

#[cfg(test)]
#[path = "size_tests.rs"]
mod tests;
