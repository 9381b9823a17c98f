//! UTC → TAI → TT and UTC → UT1 conversions on two-part Julian Dates.
//!
//! UTC days containing a leap second are 86401 s long, and pre-1972 UTC
//! seconds differ from SI seconds; both are handled by rescaling the
//! fraction of the day before TAI−UTC is applied.

use crate::error::TimeError;
use crate::julian::{JulianPair, MJD_ZERO, SECONDS_PER_DAY, jd_to_calendar};
use crate::leap::LeapSecondProvider;

/// Earliest supported UTC calendar year.
pub const MIN_YEAR: i32 = 1960;

/// Latest supported UTC calendar year.
pub const MAX_YEAR: i32 = 2100;

/// TT − TAI in seconds.
pub const TT_MINUS_TAI_S: f64 = 32.184;

/// Largest accepted |UT1 − UTC| in seconds.
pub const MAX_ABS_DUT1_S: f64 = 1.0;

/// Every time scale the pipeline needs for one observation epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScales {
    pub utc: JulianPair,
    pub tai: JulianPair,
    pub tt: JulianPair,
    pub ut1: JulianPair,
    /// UT1 − UTC in seconds, as supplied.
    pub dut1: f64,
    /// TAI − UTC in seconds at 0h UTC of the observation day.
    pub tai_minus_utc: f64,
    /// TT − UT1 in seconds.
    pub tt_minus_ut1: f64,
}

fn check_year(year: i32) -> Result<(), TimeError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(TimeError::OutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

/// UTC to TAI, preserving the order and split of the input parts.
pub fn utc_to_tai(utc: JulianPair, leap: &dyn LeapSecondProvider) -> Result<JulianPair, TimeError> {
    if !utc.is_finite() {
        return Err(TimeError::NonFinite("utc"));
    }

    let big1 = utc.jd1.abs() >= utc.jd2.abs();
    let (u1, u2) = if big1 {
        (utc.jd1, utc.jd2)
    } else {
        (utc.jd2, utc.jd1)
    };

    let today = jd_to_calendar(u1, u2)?;
    let dat0 = leap.tai_minus_utc(today.year, today.month, today.day, 0.0)?;
    let dat12 = leap.tai_minus_utc(today.year, today.month, today.day, 0.5)?;

    let tomorrow = jd_to_calendar(u1 + 1.5, u2 - today.fraction)?;
    let dat24 = if tomorrow.year > MAX_YEAR {
        // No table past the supported range: assume no step at the last midnight.
        dat0 + 2.0 * (dat12 - dat0)
    } else {
        leap.tai_minus_utc(tomorrow.year, tomorrow.month, tomorrow.day, 0.0)?
    };

    // Separate the change over the day into a rate and a step.
    let dlod = 2.0 * (dat12 - dat0);
    let dleap = dat24 - (dat0 + dlod);

    let mut fd = today.fraction;
    fd *= (SECONDS_PER_DAY + dleap) / SECONDS_PER_DAY;
    fd *= (SECONDS_PER_DAY + dlod) / SECONDS_PER_DAY;

    let day_mjd = crate::julian::calendar_to_mjd(today.year, today.month, today.day)?;
    let mut a2 = MJD_ZERO - u1;
    a2 += day_mjd;
    a2 += fd + dat0 / SECONDS_PER_DAY;

    Ok(if big1 {
        JulianPair::new(u1, a2)
    } else {
        JulianPair::new(a2, u1)
    })
}

/// TAI to TT.
pub fn tai_to_tt(tai: JulianPair) -> JulianPair {
    tai.add_seconds(TT_MINUS_TAI_S)
}

/// TAI to UT1, given UT1 − TAI in seconds.
pub fn tai_to_ut1(tai: JulianPair, ut1_minus_tai: f64) -> JulianPair {
    tai.add_seconds(ut1_minus_tai)
}

/// UTC to UT1 via UT1 − TAI = ΔUT1 − (TAI − UTC).
pub fn utc_to_ut1(
    utc: JulianPair,
    dut1: f64,
    leap: &dyn LeapSecondProvider,
) -> Result<JulianPair, TimeError> {
    let today = jd_to_calendar(utc.jd1, utc.jd2)?;
    let dat = leap.tai_minus_utc(today.year, today.month, today.day, 0.0)?;
    let tai = utc_to_tai(utc, leap)?;
    Ok(tai_to_ut1(tai, dut1 - dat))
}

/// Normalise a UTC epoch and ΔUT1 into every scale the pipeline uses.
pub fn normalize(
    utc: JulianPair,
    dut1: f64,
    leap: &dyn LeapSecondProvider,
) -> Result<TimeScales, TimeError> {
    if !utc.is_finite() {
        return Err(TimeError::NonFinite("utc"));
    }
    if !dut1.is_finite() {
        return Err(TimeError::NonFinite("dut1"));
    }
    if dut1.abs() > MAX_ABS_DUT1_S {
        return Err(TimeError::Dut1OutOfRange(dut1));
    }

    let today = jd_to_calendar(utc.jd1, utc.jd2)?;
    check_year(today.year)?;
    let tai_minus_utc = leap.tai_minus_utc(today.year, today.month, today.day, 0.0)?;

    let tai = utc_to_tai(utc, leap)?;
    let tt = tai_to_tt(tai);
    let ut1 = tai_to_ut1(tai, dut1 - tai_minus_utc);
    check_year(jd_to_calendar(ut1.jd1, ut1.jd2)?.year)?;

    let scales = TimeScales {
        utc,
        tai,
        tt,
        ut1,
        dut1,
        tai_minus_utc,
        tt_minus_ut1: tt.seconds_since(ut1),
    };
    log::debug!(
        "time scales: TAI-UTC = {} s, TT-UT1 = {:.6} s",
        scales.tai_minus_utc,
        scales.tt_minus_ut1
    );
    Ok(scales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leap::BuiltinLeapSeconds;

    const LEAP: BuiltinLeapSeconds = BuiltinLeapSeconds::new();

    #[test]
    fn tai_offset_2003() {
        let utc = JulianPair::new(2_452_878.0, -0.473_854_469_791_666_7);
        let tai = utc_to_tai(utc, &LEAP).unwrap();
        assert_eq!(tai.jd1, utc.jd1);
        assert!((tai.seconds_since(utc) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn split_order_preserved() {
        let utc = JulianPair::new(-0.25, 2_457_000.0);
        let tai = utc_to_tai(utc, &LEAP).unwrap();
        assert_eq!(tai.jd2, 2_457_000.0);
        assert!((tai.seconds_since(utc) - 35.0).abs() < 1e-6);
    }

    #[test]
    fn leap_second_day_end() {
        // 2016-12-31 is 86401 s long: the UTC instant at fraction 1 of that
        // day maps to TAI 2017-01-01 00:00:37, the same as the next midnight.
        let day_start = JulianPair::new(MJD_ZERO, 57_753.0);
        let next_day = JulianPair::new(MJD_ZERO, 57_754.0);
        let end = JulianPair::new(MJD_ZERO, 57_753.999_999_999);
        let tai_start = utc_to_tai(day_start, &LEAP).unwrap();
        let tai_next = utc_to_tai(next_day, &LEAP).unwrap();
        let tai_end = utc_to_tai(end, &LEAP).unwrap();
        assert!((tai_start.seconds_since(day_start) - 36.0).abs() < 1e-6);
        assert!((tai_next.seconds_since(tai_start) - 86_401.0).abs() < 1e-5);
        assert!((tai_next.seconds_since(tai_end)).abs() < 1e-3);
    }

    #[test]
    fn tt_is_tai_plus_constant() {
        let tai = JulianPair::new(2_451_545.0, 0.1);
        let tt = tai_to_tt(tai);
        assert!((tt.seconds_since(tai) - 32.184).abs() < 1e-9);
    }

    #[test]
    fn ut1_via_dut1() {
        let utc = JulianPair::new(2_452_878.0, -0.473_854_469_791_666_7);
        let dut1 = -0.349_518_611_406_224_1;
        let ut1 = utc_to_ut1(utc, dut1, &LEAP).unwrap();
        assert!((ut1.seconds_since(utc) - dut1).abs() < 1e-6);
    }

    #[test]
    fn normalize_consistency() {
        let utc = JulianPair::new(2_452_878.0, -0.473_854_469_791_666_7);
        let ts = normalize(utc, -0.349_518_611_406_224_1, &LEAP).unwrap();
        assert_eq!(ts.tai_minus_utc, 32.0);
        assert!((ts.tt_minus_ut1 - (32.184 + 32.0 + 0.349_518_611_406_224_1)).abs() < 1e-6);
        assert!((ts.tt.seconds_since(ts.ut1) - ts.tt_minus_ut1).abs() < 1e-12);
    }

    #[test]
    fn normalize_rejects_bad_inputs() {
        let utc = JulianPair::new(2_452_878.0, 0.0);
        assert_eq!(
            normalize(JulianPair::new(f64::NAN, 0.0), 0.0, &LEAP),
            Err(TimeError::NonFinite("utc"))
        );
        assert_eq!(
            normalize(utc, f64::INFINITY, &LEAP),
            Err(TimeError::NonFinite("dut1"))
        );
        assert_eq!(normalize(utc, 1.5, &LEAP), Err(TimeError::Dut1OutOfRange(1.5)));
    }

    #[test]
    fn normalize_rejects_out_of_range_years() {
        // 1950-01-01 and 2110-03-15
        for mjd in [33_282.0, 91_802.0] {
            let r = normalize(JulianPair::new(MJD_ZERO, mjd), 0.0, &LEAP);
            assert!(matches!(r, Err(TimeError::OutOfRange { .. })), "{r:?}");
        }
    }
}
