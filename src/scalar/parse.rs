//! Strict, allocation-free scanner for ISO 8601 durations.

use tracing::debug;

use super::{
    ScalarInterval, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_MONTH,
    NANOS_PER_SECOND, NANOS_PER_YEAR,
};
use crate::designators::{Designator, NEGATIVE_SIGN, START, TIME_SWITCH};
use crate::error::{DurationError, Result};

/// Digits of second fractions kept; the rest are truncated.
const FRACTION_DIGITS: usize = 9;

const YEAR_SLOT: usize = 0;
const MONTH_SLOT: usize = 1;
const DAY_SLOT: usize = 2;
const HOUR_SLOT: usize = 3;
const MINUTE_SLOT: usize = 4;
const WHOLE_SECOND_SLOT: usize = 5;
const SECOND_SLOT: usize = 6;

/// Digit runs indexed by designator, filled left to right.
type Components<'a> = [Option<&'a str>; 7];

/// Parse an ISO 8601 duration such as `P1Y2M3DT4H5M6.7S` into nanoseconds.
///
/// Negative durations are written with a leading `-` (ISO 8601-2). Years and
/// months are approximated as 365 and 30 days. Weeks are not part of this grammar.
pub fn parse_scalar(text: &str) -> Result<ScalarInterval> {
    let result = parse_signed(text);
    if let Err(err) = &result {
        debug!(input = text, %err, "Rejected scalar duration");
    }
    result
}

fn parse_signed(text: &str) -> Result<ScalarInterval> {
    let (negative, body) = match text.strip_prefix(NEGATIVE_SIGN as char) {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let components = scan(body)?;
    let magnitude = accumulate(&components)?;

    let nanos = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    nanos
        .map(ScalarInterval::from_nanos)
        .ok_or(DurationError::MagnitudeOverflow)
}

fn slot(designator: Designator) -> Option<usize> {
    match designator {
        Designator::Year => Some(YEAR_SLOT),
        Designator::Month => Some(MONTH_SLOT),
        Designator::Week => None,
        Designator::Day => Some(DAY_SLOT),
        Designator::Hour => Some(HOUR_SLOT),
        Designator::Minute => Some(MINUTE_SLOT),
        Designator::SecondSeparator => Some(WHOLE_SECOND_SLOT),
        Designator::Second => Some(SECOND_SLOT),
    }
}

/// Split `body` (without sign) into digit runs keyed by their designator.
fn scan(body: &str) -> Result<Components<'_>> {
    let bytes = body.as_bytes();
    // Shortest valid body is three bytes, e.g. "P3D".
    if bytes.len() < 3 || bytes[0] != START {
        return Err(DurationError::InvalidFormat);
    }

    let mut components: Components<'_> = [None; 7];
    let mut in_time = false;
    let mut time_pending = false;
    let mut last_rank: Option<u8> = None;
    let mut number_start = 1;

    for (idx, &byte) in bytes.iter().enumerate().skip(1) {
        if byte.is_ascii_digit() {
            continue;
        }

        if byte == TIME_SWITCH {
            if in_time || idx != number_start {
                return Err(DurationError::InvalidFormat);
            }
            in_time = true;
            time_pending = true;
            number_start = idx + 1;
            continue;
        }

        let designator = if in_time {
            Designator::time(byte)
        } else {
            Designator::date(byte)
        }
        .ok_or(DurationError::InvalidFormat)?;
        let slot = slot(designator).ok_or(DurationError::InvalidFormat)?;

        // wrong order or duplicate
        if last_rank.is_some_and(|rank| rank >= designator.rank()) {
            return Err(DurationError::InvalidFormat);
        }
        if idx == number_start {
            return Err(DurationError::InvalidFormat);
        }

        components[slot] = Some(&body[number_start..idx]);
        last_rank = Some(designator.rank());
        number_start = idx + 1;
        time_pending = false;
    }

    let dangling_separator =
        components[WHOLE_SECOND_SLOT].is_some() && components[SECOND_SLOT].is_none();
    if number_start != bytes.len() || last_rank.is_none() || time_pending || dangling_separator {
        return Err(DurationError::InvalidFormat);
    }

    Ok(components)
}

fn accumulate(components: &Components<'_>) -> Result<u64> {
    let mut total: u64 = 0;

    for (slot, unit) in [
        (YEAR_SLOT, NANOS_PER_YEAR),
        (MONTH_SLOT, NANOS_PER_MONTH),
        (DAY_SLOT, NANOS_PER_DAY),
        (HOUR_SLOT, NANOS_PER_HOUR),
        (MINUTE_SLOT, NANOS_PER_MINUTE),
    ] {
        if let Some(digits) = components[slot] {
            total = add_scaled(total, parse_digits(digits)?, unit)?;
        }
    }

    match (components[WHOLE_SECOND_SLOT], components[SECOND_SLOT]) {
        (Some(whole), Some(fraction)) => {
            total = add_scaled(total, parse_digits(whole)?, NANOS_PER_SECOND)?;
            total = add_scaled(total, fraction_nanos(fraction)?, 1)?;
        }
        (None, Some(whole)) => {
            total = add_scaled(total, parse_digits(whole)?, NANOS_PER_SECOND)?;
        }
        _ => {}
    }

    Ok(total)
}

fn add_scaled(total: u64, count: u64, unit: u64) -> Result<u64> {
    count
        .checked_mul(unit)
        .and_then(|nanos| total.checked_add(nanos))
        .ok_or(DurationError::MagnitudeOverflow)
}

fn parse_digits(digits: &str) -> Result<u64> {
    digits
        .bytes()
        .try_fold(0u64, |acc, byte| {
            acc.checked_mul(10)?.checked_add(u64::from(byte - b'0'))
        })
        .ok_or(DurationError::MagnitudeOverflow)
}

/// Nanoseconds for the digits after the decimal point, truncated to 9 places.
fn fraction_nanos(digits: &str) -> Result<u64> {
    let kept = &digits[..digits.len().min(FRACTION_DIGITS)];
    let scale = 10u64.pow((FRACTION_DIGITS - kept.len()) as u32);
    Ok(parse_digits(kept)? * scale)
}
