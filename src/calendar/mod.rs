//! Calendar-relative durations.
//!
//! A [`CalendarInterval`] keeps every unit separately, since a month or a day
//! only gets a concrete length once it is applied to a timestamp.

mod apply;
mod parse;

pub use apply::*;
pub use parse::*;

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::designators::{Designator, NEGATIVE_SIGN, START, TIME_SWITCH};
use crate::error::{DurationError, Result, Unit};
use crate::scalar::{ScalarInterval, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND};

/// Direction of a duration, applied to all of its units at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn is_negative(&self) -> bool {
        matches!(self, Sign::Negative)
    }
}

/// A signed combination of years, months, weeks, days, hours, minutes and seconds.
///
/// Every magnitude is finite and non-negative; the sign lives in [`Sign`]. An
/// all-zero interval is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalendarInterval {
    sign: Sign,
    years: f64,
    months: f64,
    weeks: f64,
    days: f64,
    hours: f64,
    minutes: f64,
    seconds: f64,
}

impl CalendarInterval {
    /// Build a validated interval.
    ///
    /// Fails with [`DurationError::NegativeMagnitude`] for a negative field and
    /// [`DurationError::MagnitudeOverflow`] for NaN or infinity.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sign: Sign,
        years: f64,
        months: f64,
        weeks: f64,
        days: f64,
        hours: f64,
        minutes: f64,
        seconds: f64,
    ) -> Result<Self> {
        let mut interval = Self {
            sign,
            years: magnitude(Unit::Years, years)?,
            months: magnitude(Unit::Months, months)?,
            weeks: magnitude(Unit::Weeks, weeks)?,
            days: magnitude(Unit::Days, days)?,
            hours: magnitude(Unit::Hours, hours)?,
            minutes: magnitude(Unit::Minutes, minutes)?,
            seconds: magnitude(Unit::Seconds, seconds)?,
        };
        if interval.is_zero() {
            interval.sign = Sign::Positive;
        }
        Ok(interval)
    }

    pub fn builder() -> CalendarIntervalBuilder {
        CalendarIntervalBuilder::default()
    }

    /// Convert a nanosecond interval into hours, minutes and fractional seconds.
    ///
    /// Date units stay zero, as a scalar interval carries no calendar context.
    pub fn from_scalar(value: ScalarInterval) -> Self {
        let mut rest = value.unsigned_abs();
        let hours = rest / NANOS_PER_HOUR;
        rest %= NANOS_PER_HOUR;
        let minutes = rest / NANOS_PER_MINUTE;
        rest %= NANOS_PER_MINUTE;

        Self {
            sign: if value.is_negative() {
                Sign::Negative
            } else {
                Sign::Positive
            },
            hours: hours as f64,
            minutes: minutes as f64,
            seconds: rest as f64 / NANOS_PER_SECOND as f64,
            ..Self::default()
        }
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn is_positive(&self) -> bool {
        !self.sign.is_negative()
    }

    pub fn years(&self) -> f64 {
        self.years
    }

    pub fn months(&self) -> f64 {
        self.months
    }

    pub fn weeks(&self) -> f64 {
        self.weeks
    }

    pub fn days(&self) -> f64 {
        self.days
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.date_units().iter().all(|(_, v)| *v == 0.0)
            && self.time_units().iter().all(|(_, v)| *v == 0.0)
    }

    fn date_units(&self) -> [(Designator, f64); 4] {
        [
            (Designator::Year, self.years),
            (Designator::Month, self.months),
            (Designator::Week, self.weeks),
            (Designator::Day, self.days),
        ]
    }

    fn time_units(&self) -> [(Designator, f64); 3] {
        [
            (Designator::Hour, self.hours),
            (Designator::Minute, self.minutes),
            (Designator::Second, self.seconds),
        ]
    }
}

fn magnitude(unit: Unit, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(DurationError::MagnitudeOverflow);
    }
    if value < 0.0 {
        return Err(DurationError::NegativeMagnitude { unit });
    }
    // folds -0.0 into 0.0
    Ok(value.abs())
}

impl From<ScalarInterval> for CalendarInterval {
    fn from(value: ScalarInterval) -> Self {
        Self::from_scalar(value)
    }
}

/// Renders the canonical text, e.g. `-P1Y2M3W4DT5H6M7.89S`.
impl fmt::Display for CalendarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }

        if self.sign.is_negative() {
            f.write_char(NEGATIVE_SIGN as char)?;
        }
        f.write_char(START as char)?;

        for (designator, value) in self.date_units() {
            if value != 0.0 {
                write!(f, "{}{}", value, designator.symbol())?;
            }
        }

        let time_units = self.time_units();
        if time_units.iter().any(|(_, v)| *v != 0.0) {
            f.write_char(TIME_SWITCH as char)?;
            for (designator, value) in time_units {
                if value != 0.0 {
                    write!(f, "{}{}", value, designator.symbol())?;
                }
            }
        }

        Ok(())
    }
}

/// Render the canonical ISO 8601 text of `value`.
pub fn render_calendar(value: &CalendarInterval) -> String {
    value.to_string()
}

impl FromStr for CalendarInterval {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self> {
        parse_calendar(s)
    }
}

impl Serialize for CalendarInterval {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarInterval {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_calendar(&s).map_err(serde::de::Error::custom)
    }
}

/// Field-by-field construction of a [`CalendarInterval`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarIntervalBuilder {
    sign: Sign,
    years: f64,
    months: f64,
    weeks: f64,
    days: f64,
    hours: f64,
    minutes: f64,
    seconds: f64,
}

impl CalendarIntervalBuilder {
    pub fn sign(mut self, sign: Sign) -> Self {
        self.sign = sign;
        self
    }

    pub fn negative(self) -> Self {
        self.sign(Sign::Negative)
    }

    pub fn years(mut self, years: f64) -> Self {
        self.years = years;
        self
    }

    pub fn months(mut self, months: f64) -> Self {
        self.months = months;
        self
    }

    pub fn weeks(mut self, weeks: f64) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn days(mut self, days: f64) -> Self {
        self.days = days;
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.hours = hours;
        self
    }

    pub fn minutes(mut self, minutes: f64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn seconds(mut self, seconds: f64) -> Self {
        self.seconds = seconds;
        self
    }

    /// Validate and build; same rules as [`CalendarInterval::new`].
    pub fn build(self) -> Result<CalendarInterval> {
        CalendarInterval::new(
            self.sign,
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        )
    }
}
