//! Reference ellipsoids, geodetic → geocentric conversion, polar motion
//! and the observer's position and velocity in the CIRS.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::matrix::{IDENTITY, Mat3, Vec3, mat_t_vec, rotate_x, rotate_y, rotate_z};

/// Earth rotation rate, rad/s (ERA rate per SI second of UT1).
pub const EARTH_ROTATION_RATE: f64 = 1.002_737_811_911_354_48 * TAU / 86_400.0;

/// Reference ellipsoid for geodetic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ellipsoid {
    #[default]
    Wgs84,
    Grs80,
    Wgs72,
    Iers2010,
}

impl Ellipsoid {
    /// Equatorial radius in metres.
    pub const fn equatorial_radius_m(self) -> f64 {
        match self {
            Self::Wgs84 | Self::Grs80 => 6_378_137.0,
            Self::Wgs72 => 6_378_135.0,
            Self::Iers2010 => 6_378_136.6,
        }
    }

    /// Flattening f.
    pub const fn flattening(self) -> f64 {
        match self {
            Self::Wgs84 => 1.0 / 298.257_223_563,
            Self::Grs80 => 1.0 / 298.257_222_101,
            Self::Wgs72 => 1.0 / 298.26,
            Self::Iers2010 => 1.0 / 298.256_42,
        }
    }

    /// Geocentric Cartesian position (m) of a geodetic point.
    ///
    /// Longitude east-positive and latitude in radians, height above the
    /// ellipsoid in metres.
    pub fn geodetic_to_geocentric(self, lon: f64, lat: f64, height_m: f64) -> Vec3 {
        geodetic_to_geocentric(self.equatorial_radius_m(), self.flattening(), lon, lat, height_m)
    }
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Wgs84 => "WGS84",
            Self::Grs80 => "GRS80",
            Self::Wgs72 => "WGS72",
            Self::Iers2010 => "IERS2010",
        };
        f.write_str(name)
    }
}

/// Geocentric Cartesian position (m) for an ellipsoid given by its
/// equatorial radius `a` (m) and flattening `f`.
pub fn geodetic_to_geocentric(a: f64, f: f64, lon: f64, lat: f64, height_m: f64) -> Vec3 {
    let (sp, cp) = lat.sin_cos();
    let w = (1.0 - f) * (1.0 - f);
    let d = cp * cp + w * sp * sp;
    let ac = a / d.sqrt();
    let as_ = w * ac;

    let r = (ac + height_m) * cp;
    let (sl, cl) = lon.sin_cos();
    [r * cl, r * sl, (as_ + height_m) * sp]
}

/// Polar motion matrix, ITRS → TIRS transposed: `Rx(−yp)·Ry(−xp)·Rz(s′)`.
///
/// `xp`, `yp` are the pole coordinates and `sp` the TIO locator s′, all in
/// radians.
pub fn polar_motion_matrix(xp: f64, yp: f64, sp: f64) -> Mat3 {
    let mut r = IDENTITY;
    rotate_z(sp, &mut r);
    rotate_y(-xp, &mut r);
    rotate_x(-yp, &mut r);
    r
}

/// Geocentric position (m) and velocity (m/s) of a terrestrial site in
/// the CIRS.
///
/// `itrs` is the site's geocentric ITRS position, `rpm` the matrix from
/// [`polar_motion_matrix`] and `era` the Earth rotation angle.
pub fn site_position_velocity(itrs: &Vec3, rpm: &Mat3, era: f64) -> (Vec3, Vec3) {
    let [x, y, z] = mat_t_vec(rpm, itrs);

    let (s, c) = era.sin_cos();
    let position = [c * x - s * y, s * x + c * y, z];
    let velocity = [
        -EARTH_ROTATION_RATE * (s * x + c * y),
        EARTH_ROTATION_RATE * (c * x - s * y),
        0.0,
    ];
    (position, velocity)
}
