//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` is the human-facing form of an observation epoch. It converts
//! to a two-part Julian Date whose first part is the Julian Date of 0h of
//! the calendar day and whose second part is the fraction of that day.

use std::str::FromStr;

use crate::error::TimeError;
use crate::julian::{JulianPair, MJD_ZERO, SECONDS_PER_DAY, calendar_to_mjd, jd_to_calendar};
use crate::leap::LeapSecondProvider;

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    fn check_clock(&self, max_second: f64) -> Result<(), TimeError> {
        if self.hour > 23 || self.minute > 59 {
            return Err(TimeError::Parse(format!(
                "clock time {:02}:{:02} out of range",
                self.hour, self.minute
            )));
        }
        if !self.second.is_finite() || self.second < 0.0 || self.second >= max_second {
            return Err(TimeError::Parse(format!("seconds {} out of range", self.second)));
        }
        Ok(())
    }

    fn seconds_of_day(&self) -> f64 {
        60.0 * (60.0 * self.hour as f64 + self.minute as f64) + self.second
    }

    /// Two-part UTC Julian Date assuming an 86400-second day.
    ///
    /// `second` must be below 60; use [`UtcTime::to_julian_pair_with`] for
    /// instants inside a leap second.
    pub fn to_julian_pair(&self) -> Result<JulianPair, TimeError> {
        self.check_clock(60.0)?;
        let mjd = calendar_to_mjd(self.year, self.month, self.day)?;
        Ok(JulianPair::new(
            MJD_ZERO + mjd,
            self.seconds_of_day() / SECONDS_PER_DAY,
        ))
    }

    /// Two-part UTC Julian Date using the day length implied by `leap`.
    ///
    /// On a day ending in a positive leap second, `23:59:60.5` is accepted
    /// and the fraction is taken over 86401 seconds.
    pub fn to_julian_pair_with(&self, leap: &dyn LeapSecondProvider) -> Result<JulianPair, TimeError> {
        let mjd = calendar_to_mjd(self.year, self.month, self.day)?;
        let tomorrow = jd_to_calendar(MJD_ZERO, mjd + 1.0)?;
        let dat0 = leap.tai_minus_utc(self.year, self.month, self.day, 0.0)?;
        let dat24 = leap.tai_minus_utc(tomorrow.year, tomorrow.month, tomorrow.day, 0.0)?;
        let step = dat24 - dat0;

        // Only an integral step marks a leap second; pre-1972 drift does not.
        let day_length = if (step - step.round()).abs() < 1e-9 && step.abs() >= 0.5 {
            SECONDS_PER_DAY + step
        } else {
            SECONDS_PER_DAY
        };

        let last_minute = self.hour == 23 && self.minute == 59;
        let minute_length = if last_minute {
            60.0 + (day_length - SECONDS_PER_DAY)
        } else {
            60.0
        };
        self.check_clock(minute_length)?;

        Ok(JulianPair::new(
            MJD_ZERO + mjd,
            self.seconds_of_day() / day_length,
        ))
    }

    /// Calendar form of a two-part UTC Julian Date (86400-second days).
    pub fn from_julian_pair(utc: JulianPair) -> Result<Self, TimeError> {
        let cal = jd_to_calendar(utc.jd1, utc.jd2)?;
        let total_seconds = cal.fraction * SECONDS_PER_DAY;
        let hour = (total_seconds / 3600.0).floor() as u32;
        let minute = ((total_seconds % 3600.0) / 60.0).floor() as u32;
        let second = total_seconds % 60.0;
        Ok(Self {
            year: cal.year,
            month: cal.month,
            day: cal.day,
            hour: hour.min(23),
            minute: minute.min(59),
            second,
        })
    }
}

impl std::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:09.6}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

impl FromStr for UtcTime {
    type Err = TimeError;

    /// Parse `YYYY-MM-DDThh:mm:ss[.fff][Z]` (a space may replace the `T`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TimeError::Parse(format!("expected YYYY-MM-DDThh:mm:ss[.fff]Z, got '{s}'"));

        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
        let (date, clock) = trimmed
            .split_once(['T', ' '])
            .ok_or_else(bad)?;

        let mut date_parts = date.splitn(3, '-');
        let year: i32 = date_parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let month: u32 = date_parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let day: u32 = date_parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

        let mut clock_parts = clock.splitn(3, ':');
        let hour: u32 = clock_parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let minute: u32 = clock_parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let second: f64 = match clock_parts.next() {
            Some(sec) => sec.parse().map_err(|_| bad())?,
            None => 0.0,
        };

        let t = Self::new(year, month, day, hour, minute, second);
        calendar_to_mjd(year, month, day)?;
        t.check_clock(61.0)?;
        Ok(t)
    }
}
