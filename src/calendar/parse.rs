//! Pattern-based parser for calendar durations.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use super::{CalendarInterval, Sign};
use crate::error::{DurationError, Result};

/// Anchored grammar; each unit accepts an integer or decimal value.
static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<negative>-)?P",
        r"(?:(?P<years>[0-9]+(?:\.[0-9]+)?)Y)?",
        r"(?:(?P<months>[0-9]+(?:\.[0-9]+)?)M)?",
        r"(?:(?P<weeks>[0-9]+(?:\.[0-9]+)?)W)?",
        r"(?:(?P<days>[0-9]+(?:\.[0-9]+)?)D)?",
        r"(?:(?P<time>T)",
        r"(?:(?P<hours>[0-9]+(?:\.[0-9]+)?)H)?",
        r"(?:(?P<minutes>[0-9]+(?:\.[0-9]+)?)M)?",
        r"(?:(?P<seconds>[0-9]+(?:\.[0-9]+)?)S)?",
        r")?$",
    ))
    .expect("duration pattern is a valid regex")
});

const DATE_GROUPS: [&str; 4] = ["years", "months", "weeks", "days"];
const TIME_GROUPS: [&str; 3] = ["hours", "minutes", "seconds"];

/// Parse text such as `P1.5Y2MT0.25H` into a [`CalendarInterval`].
///
/// Every unit may carry a fraction. A leading `-` makes the interval negative.
/// Text that does not match the grammar exactly fails with
/// [`DurationError::InvalidFormat`].
pub fn parse_calendar(text: &str) -> Result<CalendarInterval> {
    let result = DURATION_PATTERN
        .captures(text)
        .ok_or(DurationError::InvalidFormat)
        .and_then(|caps| from_captures(&caps));
    if let Err(err) = &result {
        debug!(input = text, %err, "Rejected calendar duration");
    }
    result
}

fn from_captures(caps: &Captures<'_>) -> Result<CalendarInterval> {
    let has_date = DATE_GROUPS.iter().any(|name| caps.name(name).is_some());
    let has_time = TIME_GROUPS.iter().any(|name| caps.name(name).is_some());
    // "P", "PT" and "P1YT" carry no component after their designator
    if !(has_date || has_time) || (caps.name("time").is_some() && !has_time) {
        return Err(DurationError::InvalidFormat);
    }

    let sign = if caps.name("negative").is_some() {
        Sign::Negative
    } else {
        Sign::Positive
    };

    CalendarInterval::new(
        sign,
        value(caps, "years")?,
        value(caps, "months")?,
        value(caps, "weeks")?,
        value(caps, "days")?,
        value(caps, "hours")?,
        value(caps, "minutes")?,
        value(caps, "seconds")?,
    )
}

fn value(caps: &Captures<'_>, name: &str) -> Result<f64> {
    match caps.name(name) {
        Some(m) => m
            .as_str()
            .parse::<f64>()
            .map_err(|_| DurationError::InvalidFormat),
        None => Ok(0.0),
    }
}
