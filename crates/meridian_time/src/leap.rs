//! TAI−UTC lookup: the leap-second provider seam and the built-in IERS table.
//!
//! Before 1972 UTC ran at a rate offset from SI seconds and was stepped by
//! fractions of a second; those eras carry a linear drift term on top of the
//! tabulated offset. From 1972 onwards TAI−UTC is an integral number of
//! seconds that changes only at leap seconds.

use crate::error::TimeError;
use crate::julian::calendar_to_mjd;
use crate::scales::{MAX_YEAR, MIN_YEAR};

/// Source of TAI−UTC for a UTC calendar date.
///
/// Implementations are read-only after construction and may be shared
/// between threads.
pub trait LeapSecondProvider: Send + Sync {
    /// TAI−UTC in seconds at `fraction` of the UTC day `year-month-day`.
    ///
    /// The fraction only matters before 1972, where the offset drifts
    /// linearly within each era.
    fn tai_minus_utc(&self, year: i32, month: u32, day: u32, fraction: f64)
    -> Result<f64, TimeError>;
}

/// Dates (year, month) on which TAI−UTC changed, with the new offset.
#[rustfmt::skip]
static CHANGES: [(i32, u32, f64); 42] = [
    (1960,  1,  1.417_818_0),
    (1961,  1,  1.422_818_0),
    (1961,  8,  1.372_818_0),
    (1962,  1,  1.845_858_0),
    (1963, 11,  1.945_858_0),
    (1964,  1,  3.240_130_0),
    (1964,  4,  3.340_130_0),
    (1964,  9,  3.440_130_0),
    (1965,  1,  3.540_130_0),
    (1965,  3,  3.640_130_0),
    (1965,  7,  3.740_130_0),
    (1965,  9,  3.840_130_0),
    (1966,  1,  4.313_170_0),
    (1968,  2,  4.213_170_0),
    (1972,  1, 10.0),
    (1972,  7, 11.0),
    (1973,  1, 12.0),
    (1974,  1, 13.0),
    (1975,  1, 14.0),
    (1976,  1, 15.0),
    (1977,  1, 16.0),
    (1978,  1, 17.0),
    (1979,  1, 18.0),
    (1980,  1, 19.0),
    (1981,  7, 20.0),
    (1982,  7, 21.0),
    (1983,  7, 22.0),
    (1985,  7, 23.0),
    (1988,  1, 24.0),
    (1990,  1, 25.0),
    (1991,  1, 26.0),
    (1992,  7, 27.0),
    (1993,  7, 28.0),
    (1994,  7, 29.0),
    (1996,  1, 30.0),
    (1997,  7, 31.0),
    (1999,  1, 32.0),
    (2006,  1, 33.0),
    (2009,  1, 34.0),
    (2012,  7, 35.0),
    (2015,  7, 36.0),
    (2017,  1, 37.0),
];

/// Pre-1972 drift terms (reference MJD, seconds per day), one per early era.
#[rustfmt::skip]
static DRIFT: [(f64, f64); 14] = [
    (37_300.0, 0.001_296_0),
    (37_300.0, 0.001_296_0),
    (37_300.0, 0.001_296_0),
    (37_665.0, 0.001_123_2),
    (37_665.0, 0.001_123_2),
    (38_761.0, 0.001_296_0),
    (38_761.0, 0.001_296_0),
    (38_761.0, 0.001_296_0),
    (38_761.0, 0.001_296_0),
    (38_761.0, 0.001_296_0),
    (38_761.0, 0.001_296_0),
    (38_761.0, 0.001_296_0),
    (39_126.0, 0.002_592_0),
    (39_126.0, 0.002_592_0),
];

/// Compiled-in IERS TAI−UTC history, 1960 January through 2017 January.
///
/// Valid for UTC years 1960..=2100; dates after the last tabulated change
/// use the last offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLeapSeconds;

impl BuiltinLeapSeconds {
    pub const fn new() -> Self {
        Self
    }
}

impl LeapSecondProvider for BuiltinLeapSeconds {
    fn tai_minus_utc(
        &self,
        year: i32,
        month: u32,
        day: u32,
        fraction: f64,
    ) -> Result<f64, TimeError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(TimeError::OutOfRange {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(TimeError::DayFractionOutOfRange(fraction));
        }
        let mjd = calendar_to_mjd(year, month, day)?;

        let key = 12 * year + month as i32;
        let idx = CHANGES
            .iter()
            .rposition(|&(y, m, _)| key >= 12 * y + m as i32)
            .ok_or(TimeError::Pre1972Utc)?;

        let mut offset = CHANGES[idx].2;
        if let Some(&(ref_mjd, rate)) = DRIFT.get(idx) {
            offset += (mjd + fraction - ref_mjd) * rate;
        }
        Ok(offset)
    }
}
