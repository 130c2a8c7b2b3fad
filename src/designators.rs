//! ISO 8601 duration designators.
//!
//! A designator is the letter following a number (`3D`, `4H`) or a structural
//! marker (`P`, `T`). Date and time parts reuse `M`, so lookups are keyed by
//! the part currently being scanned.

/// Marks the start of every duration.
pub const START: u8 = b'P';

/// Switches from the date part to the time part.
pub const TIME_SWITCH: u8 = b'T';

/// Leading sign of the ISO 8601-2 negative duration extension.
pub const NEGATIVE_SIGN: u8 = b'-';

/// A unit designator, ordered by canonical rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Designator {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    /// The `.` between whole and fractional seconds.
    SecondSeparator,
    Second,
}

impl Designator {
    /// Look up a designator valid in the date part.
    pub const fn date(byte: u8) -> Option<Self> {
        match byte {
            b'Y' => Some(Designator::Year),
            b'M' => Some(Designator::Month),
            b'W' => Some(Designator::Week),
            b'D' => Some(Designator::Day),
            _ => None,
        }
    }

    /// Look up a designator valid in the time part.
    pub const fn time(byte: u8) -> Option<Self> {
        match byte {
            b'H' => Some(Designator::Hour),
            b'M' => Some(Designator::Minute),
            b'.' => Some(Designator::SecondSeparator),
            b'S' => Some(Designator::Second),
            _ => None,
        }
    }

    /// Canonical position; designators must appear in strictly increasing rank.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// The character written after a value of this unit.
    pub const fn symbol(self) -> char {
        match self {
            Designator::Year => 'Y',
            Designator::Month | Designator::Minute => 'M',
            Designator::Week => 'W',
            Designator::Day => 'D',
            Designator::Hour => 'H',
            Designator::SecondSeparator => '.',
            Designator::Second => 'S',
        }
    }

    pub const fn is_time(self) -> bool {
        matches!(
            self,
            Designator::Hour
                | Designator::Minute
                | Designator::SecondSeparator
                | Designator::Second
        )
    }
}
