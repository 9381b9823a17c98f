//! Cartesian ↔ spherical direction conversion and angle normalisation.

use std::f64::consts::{PI, TAU};

use crate::matrix::Vec3;

/// Convert a Cartesian direction to spherical `(longitude, latitude)` in
/// radians.
///
/// Longitude is measured in the x-y plane from +x toward +y and is returned
/// in (−π, π]; latitude is elevation above the x-y plane. The vector need
/// not be of unit length. A null vector gives `(0, 0)`, and a vector along
/// the z-axis gives longitude 0.
pub fn cartesian_to_spherical(v: &Vec3) -> (f64, f64) {
    let (x, y, z) = (v[0], v[1], v[2]);
    let d2 = x * x + y * y;

    let lon = if d2 == 0.0 { 0.0 } else { y.atan2(x) };
    let lat = if z == 0.0 { 0.0 } else { z.atan2(d2.sqrt()) };

    (lon, lat)
}

/// Unit vector for spherical `(longitude, latitude)` in radians.
pub fn spherical_to_cartesian(lon: f64, lat: f64) -> Vec3 {
    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    [cos_lon * cos_lat, sin_lon * cos_lat, sin_lat]
}

/// Normalise an angle into [0, 2π).
pub fn wrap_two_pi(a: f64) -> f64 {
    let w = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if w >= TAU { 0.0 } else { w }
}

/// Normalise an angle into (−π, π].
pub fn wrap_pi(a: f64) -> f64 {
    let w = wrap_two_pi(a);
    if w > PI { w - TAU } else { w }
}
