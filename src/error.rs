//! Error taxonomy shared by the parsers, the calendar type and the timestamp applier.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A duration unit, used to point at the field that caused an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Years => write!(f, "years"),
            Unit::Months => write!(f, "months"),
            Unit::Weeks => write!(f, "weeks"),
            Unit::Days => write!(f, "days"),
            Unit::Hours => write!(f, "hours"),
            Unit::Minutes => write!(f, "minutes"),
            Unit::Seconds => write!(f, "seconds"),
        }
    }
}

/// Errors that can occur while parsing, building or applying durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The text does not follow the ISO 8601 duration grammar.
    #[error("Invalid ISO 8601 duration format")]
    InvalidFormat,

    #[error("Negative magnitude for {unit}: all unit values must be >= 0")]
    NegativeMagnitude { unit: Unit },

    /// Years and months must be whole numbers when applied to a timestamp.
    #[error("Fractional {unit} are not supported here")]
    UnsupportedFraction { unit: Unit },

    #[error("Duration magnitude exceeds the representable range")]
    MagnitudeOverflow,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_display() {
        assert_eq!(Unit::Years.to_string(), "years");
        assert_eq!(Unit::Minutes.to_string(), "minutes");
        assert_eq!(Unit::Seconds.to_string(), "seconds");
    }

    #[test]
    fn test_error_messages_name_the_unit() {
        let err = DurationError::UnsupportedFraction { unit: Unit::Months };
        assert_eq!(err.to_string(), "Fractional months are not supported here");

        let err = DurationError::NegativeMagnitude { unit: Unit::Days };
        assert!(err.to_string().contains("days"));
    }

    #[test]
    fn test_unit_serialization() {
        let json = serde_json::to_string(&Unit::Weeks).unwrap();
        assert_eq!(json, "\"weeks\"");

        let unit: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(unit, Unit::Weeks);
    }
}
