//! Earth Rotation Angle, Greenwich Mean Sidereal Time and the TIO locator.
//!
//! ERA takes a two-part UT1 date and extracts the fraction of the day from
//! each part separately, so a (day number, fraction) split keeps the angle
//! precise to the microarcsecond level.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15. Public domain.
//! - GMST polynomial: Capitaine et al. 2003, Table 2. Public domain.
//! - TIO locator: Lambert & Bizouard 2002.

use std::f64::consts::{PI, TAU};

use crate::julian::{DAYS_PER_JULIAN_CENTURY, J2000_JD, JulianPair};

/// Arcseconds to radians: 1″ = π / (180 × 3600).
const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Earth Rotation Angle at a two-part UT1 Julian Date.
///
/// θ = 2π × (0.7790572732640 + 1.00273781191135448 × Du),
/// Du = JD_UT1 − 2451545.0, evaluated as the fractional days of each part
/// plus the rate term on the full interval.
///
/// Returns radians in [0, 2π).
pub fn earth_rotation_angle(ut1: JulianPair) -> f64 {
    let (d1, d2) = if ut1.jd1 < ut1.jd2 {
        (ut1.jd1, ut1.jd2)
    } else {
        (ut1.jd2, ut1.jd1)
    };
    let t = d1 + (d2 - J2000_JD);
    let f = (d1 % 1.0) + (d2 % 1.0);
    let theta = TAU * (f + 0.779_057_273_264_0 + 0.002_737_811_911_354_48 * t);
    theta.rem_euclid(TAU)
}

/// Greenwich Mean Sidereal Time (IAU 2006), consistent with ERA.
///
/// GMST = ERA(UT1) + polynomial(T), T = Julian centuries of TT from J2000.0.
///
/// Polynomial (arcseconds):
///   0.014506 + 4612.156534·T + 1.3915817·T² − 0.00000044·T³
///   − 0.000029956·T⁴ − 0.0000000368·T⁵
///
/// Returns radians in [0, 2π).
pub fn gmst(ut1: JulianPair, tt: JulianPair) -> f64 {
    let t = tt.days_since_j2000() / DAYS_PER_JULIAN_CENTURY;
    let poly_arcsec = 0.014_506
        + (4_612.156_534
            + (1.391_581_7 + (-0.000_000_44 + (-0.000_029_956 + (-0.000_000_036_8) * t) * t) * t)
                * t)
            * t;
    (earth_rotation_angle(ut1) + poly_arcsec * ARCSEC_TO_RAD).rem_euclid(TAU)
}

/// TIO locator s′ in radians: −47 µas per Julian century of TT.
pub fn tio_locator(tt: JulianPair) -> f64 {
    let t = tt.julian_centuries_since_j2000();
    -47e-6 * t * ARCSEC_TO_RAD
}
