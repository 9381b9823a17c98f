//! Time scales for the observed-place pipeline.
//!
//! This crate provides:
//! - Two-part Julian Dates and Gregorian calendar conversions
//! - The [`LeapSecondProvider`] seam with a compiled-in IERS table and an
//!   LSK (Leapseconds Kernel) file reader
//! - UTC → TAI → TT and UTC → UT1 conversion, bundled by [`normalize`]
//! - IERS EOP (UT1−UTC, polar motion) table lookup
//! - Earth Rotation Angle, GMST and the TIO locator

pub mod eop;
pub mod error;
pub mod julian;
pub mod leap;
pub mod lsk;
pub mod scales;
pub mod sidereal;
pub mod utc_time;

use std::path::Path;

pub use eop::{EopData, EopKernel, EopSample};
pub use error::TimeError;
pub use julian::{
    CalendarDay, DAYS_PER_JULIAN_CENTURY, DAYS_PER_JULIAN_YEAR, J2000_JD, JulianPair, MJD_ZERO,
    SECONDS_PER_DAY, calendar_to_jd, calendar_to_mjd, jd_to_calendar,
};
pub use leap::{BuiltinLeapSeconds, LeapSecondProvider};
pub use lsk::{LeapEntry, LskData};
pub use scales::{
    MAX_ABS_DUT1_S, MAX_YEAR, MIN_YEAR, TT_MINUS_TAI_S, TimeScales, normalize, tai_to_tt, utc_to_tai,
    utc_to_ut1,
};
pub use sidereal::{earth_rotation_angle, gmst, tio_locator};
pub use utc_time::UtcTime;

/// A loaded leap-second kernel, usable wherever a [`LeapSecondProvider`]
/// is expected.
#[derive(Debug, Clone)]
pub struct LeapSecondKernel {
    data: LskData,
}

impl LeapSecondKernel {
    /// Load an LSK file from a path.
    pub fn load(path: &Path) -> Result<Self, TimeError> {
        let content = std::fs::read_to_string(path)?;
        let kernel = Self::parse(&content)?;
        log::info!(
            "loaded leap-second kernel {} ({} entries)",
            path.display(),
            kernel.data.leap_seconds.len()
        );
        Ok(kernel)
    }

    /// Parse an LSK from its text content.
    pub fn parse(content: &str) -> Result<Self, TimeError> {
        let data = lsk::parse_lsk(content)?;
        Ok(Self { data })
    }

    /// Access the parsed LSK data.
    pub fn data(&self) -> &LskData {
        &self.data
    }
}

impl LeapSecondProvider for LeapSecondKernel {
    fn tai_minus_utc(
        &self,
        year: i32,
        month: u32,
        day: u32,
        _fraction: f64,
    ) -> Result<f64, TimeError> {
        if year > MAX_YEAR {
            return Err(TimeError::OutOfRange {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        let mjd = calendar_to_mjd(year, month, day)?;
        let idx = self
            .data
            .leap_seconds
            .partition_point(|entry| entry.mjd <= mjd);
        if idx == 0 {
            return Err(TimeError::Pre1972Utc);
        }
        Ok(self.data.leap_seconds[idx - 1].tai_minus_utc)
    }
}
