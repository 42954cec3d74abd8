use displaydoc::Display;

use crate::prelude::*;

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum DurationError {
    /// invalid duration `{0}`
    InvalidDuration(String),
    /// missing unit in duration `{0}`
    MissingUnit(String),
    /// unknown unit `{unit}` in duration `{duration}`
    UnknownUnit { unit: String, duration: String },
    /// duration `{0}` overflows
    Overflow(String),
}

#[cfg(feature = "std")]
impl std::error::Error for DurationError {}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(60 * 60 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Parses a duration string in the Go `time.ParseDuration` format, such as
/// `"300ms"`, `"1.5h"` or `"2h45m"`, into nanoseconds.
///
/// Negative durations are rejected.
pub fn parse_duration(duration: &str) -> Result<u64, DurationError> {
    let invalid = || DurationError::InvalidDuration(duration.to_string());
    let overflow = || DurationError::Overflow(duration.to_string());

    let mut rest = duration.strip_prefix('+').unwrap_or(duration);
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, tail) = rest.split_at(int_len);
        let whole = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse::<u64>().map_err(|_| overflow())?
        };
        rest = tail;

        // fractional digits past u64 precision are dropped
        let mut fraction: u64 = 0;
        let mut scale: u64 = 1;
        let mut frac_len = 0;
        if let Some(tail) = rest.strip_prefix('.') {
            frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
            let (frac_digits, tail) = tail.split_at(frac_len);
            for digit in frac_digits.bytes() {
                let Some(next_scale) = scale.checked_mul(10) else {
                    break;
                };
                fraction = fraction * 10 + u64::from(digit - b'0');
                scale = next_scale;
            }
            rest = tail;
        }
        if int_len == 0 && frac_len == 0 {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(duration.to_string()));
        }
        let (unit, tail) = rest.split_at(unit_len);
        let nanos = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            duration: duration.to_string(),
        })?;
        rest = tail;

        let whole_nanos = whole.checked_mul(nanos).ok_or_else(overflow)?;
        let frac_nanos =
            u64::try_from(u128::from(fraction) * u128::from(nanos) / u128::from(scale))
                .map_err(|_| overflow())?;
        total = total
            .checked_add(whole_nanos)
            .and_then(|total| total.checked_add(frac_nanos))
            .ok_or_else(overflow)?;
    }

    Ok(total)
}
