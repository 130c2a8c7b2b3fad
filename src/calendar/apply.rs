//! Applying a [`CalendarInterval`] to a timestamp.
//!
//! Fractions are carried from each unit into the next finer one before
//! truncation: weeks, days, hours, minutes, seconds, then nanoseconds. Years and
//! months go through chrono's calendar arithmetic and must be whole.

use chrono::{DateTime, Days, Months, TimeDelta, TimeZone};
use tracing::{debug, trace};

use super::CalendarInterval;
use crate::error::{DurationError, Result, Unit};
use crate::scalar::NANOS_PER_SECOND;

const DAYS_PER_WEEK: f64 = 7.0;
const HOURS_PER_DAY: f64 = 24.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Float error allowed on a nanosecond count, in ulps of the seconds it was
/// derived from.
const NANOS_SLACK_ULPS: f64 = 16.0;

/// Whole-unit offsets left over after carry propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Offsets {
    months: u32,
    days: u64,
    clock: TimeDelta,
}

/// Add `interval` to `base`, honouring its sign.
///
/// Returns `base` unchanged for a zero interval.
pub fn add_to_timestamp<Tz: TimeZone>(
    interval: CalendarInterval,
    base: DateTime<Tz>,
) -> Result<DateTime<Tz>> {
    if interval.is_zero() {
        return Ok(base);
    }

    let result = offsets(&interval).and_then(|offsets| shift(base, &interval, offsets));
    match &result {
        Ok(shifted) => trace!(%interval, to = ?shifted.naive_utc(), "Applied calendar duration"),
        Err(err) => debug!(%interval, %err, "Failed to apply calendar duration"),
    }
    result
}

impl CalendarInterval {
    /// Method form of [`add_to_timestamp`].
    pub fn add_to<Tz: TimeZone>(&self, base: DateTime<Tz>) -> Result<DateTime<Tz>> {
        add_to_timestamp(*self, base)
    }
}

fn offsets(interval: &CalendarInterval) -> Result<Offsets> {
    let years = whole(Unit::Years, interval.years())?;
    let months = whole(Unit::Months, interval.months())?;
    let months = years
        .checked_mul(12)
        .and_then(|m| m.checked_add(months))
        .and_then(|m| u32::try_from(m).ok())
        .ok_or(DurationError::MagnitudeOverflow)?;

    check_second_precision(interval.seconds())?;

    let (weeks, carry) = split(interval.weeks());
    let (days, carry) = split(interval.days() + carry * DAYS_PER_WEEK);
    let (hours, carry) = split(interval.hours() + carry * HOURS_PER_DAY);
    let (minutes, carry) = split(interval.minutes() + carry * MINUTES_PER_HOUR);
    let (seconds, carry) = split(interval.seconds() + carry * SECONDS_PER_MINUTE);
    let nanos = sub_second_nanos(carry, total_seconds(interval))?;

    let days = count(weeks)?
        .checked_mul(7)
        .and_then(|d| d.checked_add(count(days).ok()?))
        .ok_or(DurationError::MagnitudeOverflow)?;

    let clock = clock_offset(count(hours)?, count(minutes)?, count(seconds)?, nanos)
        .ok_or(DurationError::MagnitudeOverflow)?;

    Ok(Offsets {
        months,
        days,
        clock,
    })
}

fn shift<Tz: TimeZone>(
    base: DateTime<Tz>,
    interval: &CalendarInterval,
    offsets: Offsets,
) -> Result<DateTime<Tz>> {
    let months = Months::new(offsets.months);
    let days = Days::new(offsets.days);

    let shifted = if interval.sign().is_negative() {
        base.checked_sub_months(months)
            .and_then(|t| t.checked_sub_days(days))
            .and_then(|t| t.checked_sub_signed(offsets.clock))
    } else {
        base.checked_add_months(months)
            .and_then(|t| t.checked_add_days(days))
            .and_then(|t| t.checked_add_signed(offsets.clock))
    };

    shifted.ok_or(DurationError::MagnitudeOverflow)
}

fn split(value: f64) -> (f64, f64) {
    (value.trunc(), value.fract())
}

/// A unit that must be integral when handed to calendar arithmetic.
fn whole(unit: Unit, value: f64) -> Result<u64> {
    if value.fract() != 0.0 {
        return Err(DurationError::UnsupportedFraction { unit });
    }
    count(value)
}

fn count(value: f64) -> Result<u64> {
    // u64::MAX as f64 rounds up to 2^64, which is itself out of range
    if value.is_finite() && value >= 0.0 && value < u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(DurationError::MagnitudeOverflow)
    }
}

/// Reject a seconds value with more than 9 fractional digits.
///
/// Float error is sized from `seconds` alone, so other fields never widen it.
fn check_second_precision(seconds: f64) -> Result<()> {
    sub_second_nanos(seconds.fract(), seconds).map(|_| ())
}

/// Whole nanoseconds for a fractional second.
///
/// Residue finer than a nanosecond, beyond what float error over `scale`
/// seconds explains, is rejected rather than truncated.
fn sub_second_nanos(fraction: f64, scale: f64) -> Result<i64> {
    let nanos = fraction * NANOS_PER_SECOND as f64;
    let rounded = nanos.round();
    let slack = scale * f64::EPSILON * NANOS_PER_SECOND as f64 * NANOS_SLACK_ULPS;
    if (nanos - rounded).abs() > slack {
        return Err(DurationError::MagnitudeOverflow);
    }
    Ok(rounded as i64)
}

/// Length of the fixed-length units in seconds, used only to size float error.
fn total_seconds(interval: &CalendarInterval) -> f64 {
    let minutes = interval.minutes()
        + MINUTES_PER_HOUR
            * (interval.hours()
                + HOURS_PER_DAY * (interval.days() + DAYS_PER_WEEK * interval.weeks()));
    interval.seconds() + SECONDS_PER_MINUTE * minutes
}

fn clock_offset(hours: u64, minutes: u64, seconds: u64, nanos: i64) -> Option<TimeDelta> {
    TimeDelta::try_hours(i64::try_from(hours).ok()?)?
        .checked_add(&TimeDelta::try_minutes(i64::try_from(minutes).ok()?)?)?
        .checked_add(&TimeDelta::try_seconds(i64::try_from(seconds).ok()?)?)?
        .checked_add(&TimeDelta::nanoseconds(nanos))
}
