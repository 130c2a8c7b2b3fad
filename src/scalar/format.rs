//! Allocation-free rendering of [`ScalarInterval`] values.
//!
//! Output is written backward into a stack buffer sized for the widest
//! possible value, and the populated suffix is handed out as `&str`.

use std::fmt;
use std::ops::Deref;

use super::ScalarInterval;
use crate::designators::{Designator, NEGATIVE_SIGN, START, TIME_SWITCH};

/// Widest compact output: `-PT9223372036.854775808S`.
pub const COMPACT_WIDTH: usize = 24;

/// Widest broken-down output: `-PT2562047H47M16.854775808S`.
pub const BROKEN_WIDTH: usize = 27;

const FRACTION_DIGITS: usize = 9;

/// A rendered duration backed by a fixed-size stack buffer.
#[derive(Clone, Copy)]
pub struct FormattedScalar<const N: usize> {
    buf: [u8; N],
    start: usize,
}

impl<const N: usize> FormattedScalar<N> {
    pub fn as_str(&self) -> &str {
        // only ASCII is ever written into `buf`
        std::str::from_utf8(&self.buf[self.start..]).unwrap_or_default()
    }
}

impl<const N: usize> Deref for FormattedScalar<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> AsRef<str> for FormattedScalar<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> fmt::Display for FormattedScalar<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for FormattedScalar<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormattedScalar({})", self.as_str())
    }
}

impl ScalarInterval {
    /// Render as whole seconds only, e.g. `PT345.15S`.
    ///
    /// Cheaper than [`ScalarInterval::write_broken`], at the cost of readability.
    pub fn write_compact(self) -> FormattedScalar<COMPACT_WIDTH> {
        let mut buf = [0u8; COMPACT_WIDTH];
        let mut idx = buf.len();
        let mut value = self.unsigned_abs();

        idx = push(&mut buf[..idx], Designator::Second.symbol() as u8);
        (idx, value) = write_fraction(&mut buf[..idx], value, FRACTION_DIGITS);
        // value is now whole seconds
        idx = write_int(&mut buf[..idx], value);
        idx = write_prefix(&mut buf[..idx], self.is_negative());

        FormattedScalar { buf, start: idx }
    }

    /// Render with hours as the coarsest unit, e.g. `PT44H7M3.15S`.
    ///
    /// Days are never emitted since their length depends on the calendar.
    pub fn write_broken(self) -> FormattedScalar<BROKEN_WIDTH> {
        let mut buf = [0u8; BROKEN_WIDTH];
        let mut idx = buf.len();
        let mut value = self.unsigned_abs();

        idx = push(&mut buf[..idx], Designator::Second.symbol() as u8);
        (idx, value) = write_fraction(&mut buf[..idx], value, FRACTION_DIGITS);
        // value is now whole seconds
        idx = write_int(&mut buf[..idx], value % 60);
        value /= 60;

        if value > 0 {
            idx = push(&mut buf[..idx], Designator::Minute.symbol() as u8);
            idx = write_int(&mut buf[..idx], value % 60);
            value /= 60;

            if value > 0 {
                idx = push(&mut buf[..idx], Designator::Hour.symbol() as u8);
                idx = write_int(&mut buf[..idx], value);
            }
        }

        idx = write_prefix(&mut buf[..idx], self.is_negative());

        FormattedScalar { buf, start: idx }
    }
}

/// Format as seconds only, e.g. `PT345.15S`.
pub fn format_compact(value: ScalarInterval) -> String {
    value.write_compact().as_str().to_owned()
}

/// Format with hours, minutes and seconds, e.g. `PT1H2M3.456S`.
pub fn format_broken(value: ScalarInterval) -> String {
    value.write_broken().as_str().to_owned()
}

/// Write `byte` just before the end of `buf` and return its index.
fn push(buf: &mut [u8], byte: u8) -> usize {
    let idx = buf.len() - 1;
    buf[idx] = byte;
    idx
}

fn write_prefix(buf: &mut [u8], negative: bool) -> usize {
    let mut idx = push(buf, TIME_SWITCH);
    idx = push(&mut buf[..idx], START);
    if negative {
        idx = push(&mut buf[..idx], NEGATIVE_SIGN);
    }
    idx
}

/// Write the fraction `value / 10^precision` (e.g. `.12345`) into the tail of
/// `buf`, dropping trailing zeros and the point itself when the fraction is zero.
///
/// Returns the start index and `value / 10^precision`.
fn write_fraction(buf: &mut [u8], mut value: u64, precision: usize) -> (usize, u64) {
    let mut idx = buf.len();
    if value == 0 {
        return (idx, value);
    }

    let mut printing = false;
    for _ in 0..precision {
        let digit = (value % 10) as u8;
        printing = printing || digit != 0;
        if printing {
            idx -= 1;
            buf[idx] = b'0' + digit;
        }
        value /= 10;
    }

    if printing {
        idx -= 1;
        buf[idx] = Designator::SecondSeparator.symbol() as u8;
    }

    (idx, value)
}

/// Write `value` in decimal into the tail of `buf` and return the start index.
fn write_int(buf: &mut [u8], mut value: u64) -> usize {
    let mut idx = buf.len();
    if value == 0 {
        idx -= 1;
        buf[idx] = b'0';
        return idx;
    }

    while value > 0 {
        idx -= 1;
        buf[idx] = b'0' + (value % 10) as u8;
        value /= 10;
    }

    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECOND: i64 = 1_000_000_000;
    const MINUTE: i64 = 60 * SECOND;
    const HOUR: i64 = 60 * MINUTE;
    const MILLI: i64 = 1_000_000;

    fn broken(nanos: i64) -> String {
        format_broken(ScalarInterval::from_nanos(nanos))
    }

    fn compact(nanos: i64) -> String {
        format_compact(ScalarInterval::from_nanos(nanos))
    }

    #[test]
    fn test_format_broken_table() {
        let cases = [
            (0, "PT0S"),
            (3, "PT0.000000003S"),
            (40, "PT0.00000004S"),
            (500, "PT0.0000005S"),
            (7 * MILLI, "PT0.007S"),
            (345 * MILLI, "PT0.345S"),
            (10 * SECOND, "PT10S"),
            (-3 * SECOND, "-PT3S"),
            (3 * MINUTE, "PT3M0S"),
            (4 * HOUR, "PT4H0M0S"),
            (44 * HOUR, "PT44H0M0S"),
            (3 * HOUR + 40 * MINUTE, "PT3H40M0S"),
            (HOUR + 2 * MINUTE + 3 * SECOND + 456 * MILLI, "PT1H2M3.456S"),
            (HOUR + 5 * SECOND, "PT1H0M5S"),
            (i64::MIN, "-PT2562047H47M16.854775808S"),
            (i64::MAX, "PT2562047H47M16.854775807S"),
        ];

        for (nanos, expected) in cases {
            assert_eq!(broken(nanos), expected);
        }
    }

    #[test]
    fn test_format_compact_table() {
        let cases = [
            (0, "PT0S"),
            (3, "PT0.000000003S"),
            (345 * MILLI, "PT0.345S"),
            (-3 * SECOND, "-PT3S"),
            (3 * MINUTE, "PT180S"),
            (HOUR + 2 * MINUTE + 3 * SECOND + 456 * MILLI, "PT3723.456S"),
            (i64::MIN, "-PT9223372036.854775808S"),
            (i64::MAX, "PT9223372036.854775807S"),
        ];

        for (nanos, expected) in cases {
            assert_eq!(compact(nanos), expected);
        }
    }

    #[test]
    fn test_boundaries_fill_the_buffer() {
        assert_eq!(ScalarInterval::MIN.write_compact().len(), COMPACT_WIDTH);
        assert_eq!(ScalarInterval::MIN.write_broken().len(), BROKEN_WIDTH);
        assert_eq!(ScalarInterval::MAX.write_broken().len(), BROKEN_WIDTH - 1);
    }

    #[test]
    fn test_formatted_scalar_derefs_to_str() {
        let formatted = ScalarInterval::from_nanos(90 * SECOND).write_broken();
        assert!(formatted.starts_with("PT"));
        assert_eq!(&*formatted, "PT1M30S");
        assert_eq!(format!("{formatted}"), "PT1M30S");
        assert_eq!(format!("{formatted:?}"), "FormattedScalar(PT1M30S)");
    }

    #[test]
    fn test_write_fraction_omits_trailing_zeros() {
        let mut buf = [0u8; 10];
        let (idx, whole) = write_fraction(&mut buf, 1_500_000_000, 9);
        assert_eq!(&buf[idx..], b".5");
        assert_eq!(whole, 1);

        let (idx, whole) = write_fraction(&mut buf, 2_000_000_000, 9);
        assert_eq!(idx, buf.len());
        assert_eq!(whole, 2);
    }

    #[test]
    fn test_write_int_zero() {
        let mut buf = [0u8; 4];
        let idx = write_int(&mut buf, 0);
        assert_eq!(&buf[idx..], b"0");
    }
}
