//! Error types for time-scale conversions.

use thiserror::Error;

/// Errors from time conversion, leap-second lookup, LSK parsing, or EOP lookup.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// LSK file parsing failed.
    #[error("LSK parse error: {0}")]
    LskParse(String),
    /// IERS EOP file parsing failed.
    #[error("EOP parse error: {0}")]
    EopParse(String),
    /// Requested epoch is outside the EOP table range.
    #[error("epoch outside EOP table range")]
    EopOutOfRange,
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
    /// UTC epoch precedes the first entry of the leap-second table.
    #[error("UTC before the first leap-second table entry is not supported")]
    Pre1972Utc,
    /// Calendar year outside the supported range.
    #[error("year {year} outside supported range {min}..={max}")]
    OutOfRange { year: i32, min: i32, max: i32 },
    /// Month or day outside the Gregorian calendar.
    #[error("invalid calendar date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    /// Day fraction outside [0, 1].
    #[error("day fraction {0} outside [0, 1]")]
    DayFractionOutOfRange(f64),
    /// |UT1 − UTC| larger than UTC's definition allows.
    #[error("UT1-UTC of {0} s is outside the accepted range")]
    Dut1OutOfRange(f64),
    /// A date/time string could not be parsed.
    #[error("time parse error: {0}")]
    Parse(String),
    /// A time argument was NaN or infinite.
    #[error("non-finite time argument: {0}")]
    NonFinite(&'static str),
}

impl From<std::io::Error> for TimeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
