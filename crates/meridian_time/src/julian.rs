//! Two-part Julian Dates and Gregorian calendar conversions.
//!
//! Every epoch in the pipeline is carried as a [`JulianPair`]: the sum
//! `jd1 + jd2` is the Julian Date, and the split is preserved through all
//! scale conversions so that the fraction of the day keeps full precision.
//! The conventional split is (day number, fraction) or (J2000.0, offset).
//!
//! Calendar arithmetic is integer-exact (Fliegel & Van Flandern, as
//! popularised by the Explanatory Supplement, 1992).

use crate::error::TimeError;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Offset between Julian Date and Modified Julian Date.
pub const MJD_ZERO: f64 = 2_400_000.5;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days per Julian year.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Days per Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Earliest Julian Date the calendar algorithm accepts (-4799 Jan 1).
const JD_MIN: f64 = -68_569.5;

/// A Julian Date split into two parts for precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianPair {
    pub jd1: f64,
    pub jd2: f64,
}

impl JulianPair {
    pub const fn new(jd1: f64, jd2: f64) -> Self {
        Self { jd1, jd2 }
    }

    /// Single-part Julian Date, placed in `jd1`.
    pub const fn from_jd(jd: f64) -> Self {
        Self { jd1: jd, jd2: 0.0 }
    }

    /// Two-part form of a Modified Julian Date.
    pub const fn from_mjd(mjd: f64) -> Self {
        Self {
            jd1: MJD_ZERO,
            jd2: mjd,
        }
    }

    /// The Julian Date as a single number (loses precision).
    pub fn total(self) -> f64 {
        self.jd1 + self.jd2
    }

    /// Modified Julian Date.
    pub fn mjd(self) -> f64 {
        (self.jd1 - MJD_ZERO) + self.jd2
    }

    /// Days elapsed since J2000.0, computed part-wise.
    pub fn days_since_j2000(self) -> f64 {
        (self.jd1 - J2000_JD) + self.jd2
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn julian_centuries_since_j2000(self) -> f64 {
        self.days_since_j2000() / DAYS_PER_JULIAN_CENTURY
    }

    /// Shift by `seconds`, applied to the part with the smaller magnitude.
    pub fn add_seconds(self, seconds: f64) -> Self {
        let dt = seconds / SECONDS_PER_DAY;
        if self.jd1.abs() > self.jd2.abs() {
            Self::new(self.jd1, self.jd2 + dt)
        } else {
            Self::new(self.jd1 + dt, self.jd2)
        }
    }

    /// `self − other` in seconds, differencing the parts separately.
    pub fn seconds_since(self, other: Self) -> f64 {
        ((self.jd1 - other.jd1) + (self.jd2 - other.jd2)) * SECONDS_PER_DAY
    }

    pub fn is_finite(self) -> bool {
        self.jd1.is_finite() && self.jd2.is_finite()
    }
}

/// Gregorian calendar date with the fraction of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDay {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Fraction of the day in `[0, 1)`.
    pub fraction: f64,
}

/// Convert a two-part Julian Date to a Gregorian calendar date.
///
/// The integer day and the fraction are separated per part and recombined
/// with compensated summation, so a split of `(day number, fraction)` keeps
/// the fraction exact.
pub fn jd_to_calendar(jd1: f64, jd2: f64) -> Result<CalendarDay, TimeError> {
    if !jd1.is_finite() || !jd2.is_finite() {
        return Err(TimeError::NonFinite("julian date"));
    }
    if jd1 + jd2 < JD_MIN {
        return Err(TimeError::OutOfRange {
            year: -4799,
            min: crate::scales::MIN_YEAR,
            max: crate::scales::MAX_YEAR,
        });
    }

    let d1 = jd1.round();
    let f1 = jd1 - d1;
    let d2 = jd2.round();
    let f2 = jd2 - d2;
    let mut jd = d1 as i64 + d2 as i64;

    // f1 + f2 + 0.5 with Neumaier summation.
    let mut s = 0.5_f64;
    let mut cs = 0.0_f64;
    for x in [f1, f2] {
        let t = s + x;
        cs += if s.abs() >= x.abs() {
            (s - t) + x
        } else {
            (x - t) + s
        };
        s = t;
        if s >= 1.0 {
            jd += 1;
            s -= 1.0;
        }
    }
    let mut f = s + cs;
    cs = f - s;

    if f < 0.0 {
        f = s + 1.0;
        cs += (1.0 - f) + s;
        s = f;
        f = s + cs;
        cs = f - s;
        jd -= 1;
    }

    if (f - 1.0) >= -f64::EPSILON / 4.0 {
        let t = s - 1.0;
        cs += (s - t) - 1.0;
        s = t;
        f = s + cs;
        if -f64::EPSILON / 2.0 < f {
            jd += 1;
            f = f.max(0.0);
        }
    }

    let mut l = jd + 68_569;
    let n = (4 * l) / 146_097;
    l -= (146_097 * n + 3) / 4;
    let i = (4_000 * (l + 1)) / 1_461_001;
    l -= (1_461 * i) / 4 - 31;
    let k = (80 * l) / 2_447;
    let day = l - (2_447 * k) / 80;
    l = k / 11;
    let month = k + 2 - 12 * l;
    let year = 100 * (n - 49) + i + l;

    Ok(CalendarDay {
        year: year as i32,
        month: month as u32,
        day: day as u32,
        fraction: f,
    })
}

/// Modified Julian Date of 0h on a Gregorian calendar date.
///
/// Integer-exact. Rejects months outside 1..=12 and days outside the month.
pub fn calendar_to_mjd(year: i32, month: u32, day: u32) -> Result<f64, TimeError> {
    const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    if year < -4799 {
        return Err(TimeError::OutOfRange {
            year,
            min: crate::scales::MIN_YEAR,
            max: crate::scales::MAX_YEAR,
        });
    }
    if !(1..=12).contains(&month) {
        return Err(TimeError::InvalidDate { year, month, day });
    }
    let leap = month == 2 && year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    let max_day = MONTH_DAYS[(month - 1) as usize] + u32::from(leap);
    if day < 1 || day > max_day {
        return Err(TimeError::InvalidDate { year, month, day });
    }

    let im = month as i64;
    let my = (im - 14) / 12;
    let iypmy = year as i64 + my;
    let mjd = (1_461 * (iypmy + 4_800)) / 4 + (367 * (im - 2 - 12 * my)) / 12
        - (3 * ((iypmy + 4_900) / 100)) / 4
        + day as i64
        - 2_432_076;
    Ok(mjd as f64)
}

/// Julian Date of a calendar date with a fractional day, as a single number.
pub fn calendar_to_jd(year: i32, month: u32, day: u32, fraction: f64) -> Result<f64, TimeError> {
    Ok(MJD_ZERO + calendar_to_mjd(year, month, day)? + fraction)
}

/// Three-letter English month abbreviation (any case) to month number.
pub fn month_from_abbrev(s: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    let upper = s.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|i| i as u32 + 1)
}
