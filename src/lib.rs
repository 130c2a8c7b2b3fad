//! # ISO Duration
//!
//! Parsing and formatting of ISO 8601 durations, e.g. `P1Y2M3DT4H5M6.7S`.
//!
//! ## Architecture
//!
//! - **designators**: The designator letters and their canonical order
//! - **scalar**: Signed nanosecond intervals, a strict parser and allocation-free formatters
//! - **calendar**: Calendar-relative intervals, their parser and the timestamp applier
//! - **error**: Error taxonomy shared by all of the above
//! - **config**: Configuration loading and validation for the `isodur` binary
//!
//! ## Example
//! ```rust
//! use iso_duration::{format_compact, parse_calendar, parse_scalar};
//!
//! let value = parse_scalar("PT1H2M3.5S").unwrap();
//! assert_eq!(value.to_string(), "PT1H2M3.5S");
//! assert_eq!(format_compact(value), "PT3723.5S");
//!
//! let calendar = parse_calendar("-P1.5W").unwrap();
//! assert_eq!(calendar.to_string(), "-P1.5W");
//! ```

pub mod calendar;
pub mod config;
pub mod designators;
pub mod error;
pub mod scalar;

pub use calendar::{
    add_to_timestamp, parse_calendar, render_calendar, CalendarInterval, CalendarIntervalBuilder,
    Sign,
};
pub use error::{DurationError, Result, Unit};
pub use scalar::{format_broken, format_compact, parse_scalar, FormattedScalar, ScalarInterval};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const SCALAR_SAMPLES: [i64; 12] = [
        0,
        1,
        -1,
        999_999_999,
        1_000_000_000,
        -3_000_000_000,
        59_999_999_999,
        3_723_456_000_000,
        -172_800_000_000_007,
        31_536_000_000_000_000,
        i64::MIN,
        i64::MAX,
    ];

    #[test]
    fn test_scalar_round_trip_compact() {
        for nanos in SCALAR_SAMPLES {
            let value = ScalarInterval::from_nanos(nanos);
            assert_eq!(parse_scalar(&format_compact(value)), Ok(value));
        }
    }

    #[test]
    fn test_scalar_round_trip_broken() {
        for nanos in SCALAR_SAMPLES {
            let value = ScalarInterval::from_nanos(nanos);
            assert_eq!(parse_scalar(&format_broken(value)), Ok(value));
        }
    }

    #[test]
    fn test_scalar_boundaries() {
        assert_eq!(
            format_compact(ScalarInterval::MIN),
            "-PT9223372036.854775808S"
        );
        assert_eq!(format_compact(ScalarInterval::MAX), "PT9223372036.854775807S");
        assert_eq!(format_compact(ScalarInterval::ZERO), "PT0S");
    }

    #[test]
    fn test_calendar_round_trip() {
        let samples = [
            "PT0S",
            "P1Y",
            "-P2M",
            "P3W",
            "P1Y2M3W4DT5H6M7.89S",
            "-P1Y2M3W4DT5H6M7.89S",
            "P9.12Y0.5D",
            "PT0.000000003S",
            "P981MT44H",
        ];

        for text in samples {
            let value = parse_calendar(text).unwrap();
            assert_eq!(render_calendar(&value), text);
            assert_eq!(parse_calendar(&value.to_string()), Ok(value));
        }
    }

    #[test]
    fn test_calendar_zero_renders_fixed_literal() {
        assert_eq!(render_calendar(&CalendarInterval::default()), "PT0S");
    }

    #[test]
    fn test_both_parsers_reject_malformed_text() {
        for text in ["1Y2M3DT4H5M6S", "PT5M4H6S", "P1Y2M3DT4H3H5M6S", " P7Y3M4D", "P7Y3M4D "] {
            assert_eq!(parse_scalar(text), Err(DurationError::InvalidFormat), "{text}");
            assert_eq!(parse_calendar(text), Err(DurationError::InvalidFormat), "{text}");
        }
    }

    #[test]
    fn test_calendar_from_parsed_scalar() {
        let scalar = parse_scalar("P1DT0.5S").unwrap();
        let calendar = CalendarInterval::from_scalar(scalar);
        assert_eq!(calendar.to_string(), "PT24H0.5S");
    }

    #[test]
    fn test_apply_parsed_calendar() {
        let base = Utc.with_ymd_and_hms(2003, 3, 3, 15, 15, 15).unwrap();
        let interval = parse_calendar("P1Y1M1DT3H3M3S").unwrap();
        assert_eq!(
            add_to_timestamp(interval, base),
            Ok(Utc.with_ymd_and_hms(2004, 4, 4, 18, 18, 18).unwrap())
        );

        let fractional_year = parse_calendar("P1.1Y").unwrap();
        assert_eq!(
            add_to_timestamp(fractional_year, base),
            Err(DurationError::UnsupportedFraction { unit: Unit::Years })
        );
    }

    #[test]
    fn test_week_fraction_equals_day_fraction() {
        let base = Utc.with_ymd_and_hms(2024, 2, 27, 6, 30, 0).unwrap();
        let weeks = parse_calendar("P0.5W1D").unwrap();
        let days = parse_calendar("P4.5D").unwrap();
        assert_eq!(add_to_timestamp(weeks, base), add_to_timestamp(days, base));
        assert_eq!(
            add_to_timestamp(days, base),
            Ok(Utc.with_ymd_and_hms(2024, 3, 2, 18, 30, 0).unwrap())
        );
    }
}
