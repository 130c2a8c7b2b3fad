//! Flat nanosecond intervals and their ISO 8601 text form.
//!
//! A [`ScalarInterval`] is a signed 64-bit count of nanoseconds. Units without a
//! fixed length are approximated when parsed into it:
//! - a month is [`NANOS_PER_MONTH`] (30 days)
//! - a year is [`NANOS_PER_YEAR`] (365 days)

mod format;
mod parse;

pub use format::*;
pub use parse::*;

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DurationError, Result};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: u64 = 24 * NANOS_PER_HOUR;
/// Fixed approximation used when no timestamp is available.
pub const NANOS_PER_MONTH: u64 = 30 * NANOS_PER_DAY;
/// Fixed approximation used when no timestamp is available.
pub const NANOS_PER_YEAR: u64 = 365 * NANOS_PER_DAY;

/// A signed elapsed-time value with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScalarInterval(i64);

impl ScalarInterval {
    pub const ZERO: Self = Self(0);
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Magnitude in nanoseconds. Defined for [`ScalarInterval::MIN`] as well.
    pub const fn unsigned_abs(self) -> u64 {
        self.0.unsigned_abs()
    }
}

impl From<i64> for ScalarInterval {
    fn from(nanos: i64) -> Self {
        Self(nanos)
    }
}

impl From<ScalarInterval> for i64 {
    fn from(value: ScalarInterval) -> Self {
        value.0
    }
}

impl From<ScalarInterval> for TimeDelta {
    fn from(value: ScalarInterval) -> Self {
        TimeDelta::nanoseconds(value.0)
    }
}

impl TryFrom<TimeDelta> for ScalarInterval {
    type Error = DurationError;

    fn try_from(delta: TimeDelta) -> Result<Self> {
        delta
            .num_nanoseconds()
            .map(Self)
            .ok_or(DurationError::MagnitudeOverflow)
    }
}

impl TryFrom<std::time::Duration> for ScalarInterval {
    type Error = DurationError;

    fn try_from(duration: std::time::Duration) -> Result<Self> {
        i64::try_from(duration.as_nanos())
            .map(Self)
            .map_err(|_| DurationError::MagnitudeOverflow)
    }
}

impl FromStr for ScalarInterval {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self> {
        parse_scalar(s)
    }
}

/// Renders the hours/minutes/seconds form, e.g. `PT1H2M3.456S`.
impl fmt::Display for ScalarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write_broken())
    }
}

impl Serialize for ScalarInterval {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.write_broken())
    }
}

impl<'de> Deserialize<'de> for ScalarInterval {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_scalar(&s).map_err(serde::de::Error::custom)
    }
}
