//! Stage 2: proper motion, parallax and radial velocity.
//!
//! Carries the catalog direction to the observation epoch with the rigorous
//! space-motion vector, corrects the interval for light travel across the
//! observer's offset from the barycentre (Rømer delay) and applies the
//! parallax shift for the observer's barycentric position.

use meridian_frames::aberration::AU_LIGHT_TIME_S;
use meridian_frames::matrix::{Vec3, dot, normalize};
use meridian_frames::spherical_to_cartesian;
use meridian_time::{DAYS_PER_JULIAN_YEAR, JulianPair, SECONDS_PER_DAY};

use crate::types::{CatalogStar, J2000_EPOCH};

/// Parallaxes below this (arcseconds) are treated as exactly zero.
pub const PARALLAX_EPSILON: f64 = 1e-7;

/// Radial velocity × parallax to au/yr: km/s → au/yr is 0.21094502.
const AU_PER_YEAR_PER_KM_S: f64 = 0.210_945_02;

/// Light time for one au, Julian years.
const AU_LIGHT_TIME_YEARS: f64 = AU_LIGHT_TIME_S / SECONDS_PER_DAY / DAYS_PER_JULIAN_YEAR;

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Julian years of TT from the star's catalog epoch to `tt`.
pub fn elapsed_years(star: &CatalogStar, tt: JulianPair) -> f64 {
    tt.days_since_j2000() / DAYS_PER_JULIAN_YEAR - (star.epoch - J2000_EPOCH)
}

/// BCRS unit direction of `star` after `years`, seen from an observer at
/// barycentric position `observer_au`.
pub fn propagate(star: &CatalogStar, years: f64, observer_au: &Vec3) -> Vec3 {
    let catalog = spherical_to_cartesian(star.ra, star.dec);

    let parallax = if star.parallax_arcsec < PARALLAX_EPSILON {
        0.0
    } else {
        star.parallax_arcsec * ARCSEC_TO_RAD
    };
    if parallax == 0.0 && star.pm_ra == 0.0 && star.pm_dec == 0.0 {
        return catalog;
    }

    let (sr, cr) = star.ra.sin_cos();
    let cd = star.dec.cos();
    let [x, y, z] = catalog;

    let dt = years + dot(&catalog, observer_au) * AU_LIGHT_TIME_YEARS;
    let w = AU_PER_YEAR_PER_KM_S * star.radial_velocity_km_s * parallax;
    let pdz = star.pm_dec * z;
    let motion = [
        -star.pm_ra * y - pdz * cr + w * x,
        star.pm_ra * x - pdz * sr + w * y,
        star.pm_dec * cd + w * z,
    ];

    let shifted: Vec3 =
        std::array::from_fn(|i| catalog[i] + dt * motion[i] - parallax * observer_au[i]);
    normalize(&shifted).1
}
