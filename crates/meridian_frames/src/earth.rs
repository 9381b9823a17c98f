//! Low-precision heliocentric Earth position and velocity.
//!
//! Analytic solar theory (Astronomical Almanac, "low precision formulas for
//! the Sun"), good to about 0.01° in longitude between 1950 and 2050. The
//! geocentric Sun is referred to the ecliptic of date, carried back to the
//! J2000 ecliptic with the general precession rate, rotated to the ICRS
//! equator and negated.
//!
//! The Sun's offset from the solar-system barycentre (up to ~0.01 au) is not
//! modelled, so the heliocentric state also serves as the barycentric one.
//! The resulting aberration error is at the 0.01″ level.

use meridian_time::JulianPair;

use crate::matrix::{Vec3, normalize};

/// Mean obliquity of the ecliptic at J2000.0, degrees (IAU 2006).
const OBLIQUITY_J2000_DEG: f64 = 23.439_279_444;

/// General precession in longitude, degrees per day.
const PRECESSION_DEG_PER_DAY: f64 = 3.824_5e-5;

/// Heliocentric Earth state, ICRS axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthState {
    /// Position, au.
    pub position: Vec3,
    /// Velocity, au/day.
    pub velocity: Vec3,
}

impl EarthState {
    /// Distance from the Sun (au) and unit vector Sun → Earth.
    pub fn sun_distance_and_direction(&self) -> (f64, Vec3) {
        normalize(&self.position)
    }
}

/// Heliocentric Earth state at a TT epoch.
pub fn earth_state(tt: JulianPair) -> EarthState {
    let n = tt.days_since_j2000();

    let mean_lon = (280.460 + 0.985_647_4 * n).to_radians();
    let g_rate = 0.985_600_3_f64.to_radians();
    let g = 357.528_f64.to_radians() + g_rate * n;
    let (sin_g, cos_g) = g.sin_cos();
    let (sin_2g, cos_2g) = (2.0 * g).sin_cos();

    // Ecliptic longitude of the Sun referred to the J2000 ecliptic.
    let lon = mean_lon
        + (1.915 * sin_g + 0.020 * sin_2g).to_radians()
        - (PRECESSION_DEG_PER_DAY * n).to_radians();
    let dist = 1.000_14 - 0.016_71 * cos_g - 0.000_14 * cos_2g;

    let lon_rate = (0.985_647_4 - PRECESSION_DEG_PER_DAY).to_radians()
        + (1.915 * cos_g + 0.040 * cos_2g).to_radians() * g_rate;
    let dist_rate = (0.016_71 * sin_g + 0.000_28 * sin_2g) * g_rate;

    let (sin_l, cos_l) = lon.sin_cos();
    let x = dist * cos_l;
    let y = dist * sin_l;
    let vx = dist_rate * cos_l - dist * sin_l * lon_rate;
    let vy = dist_rate * sin_l + dist * cos_l * lon_rate;

    let (sin_e, cos_e) = OBLIQUITY_J2000_DEG.to_radians().sin_cos();

    // Earth = −(geocentric Sun).
    EarthState {
        position: [-x, -y * cos_e, -y * sin_e],
        velocity: [-vx, -vy * cos_e, -vy * sin_e],
    }
}
