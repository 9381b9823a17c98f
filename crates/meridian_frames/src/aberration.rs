//! Gravitational light deflection and stellar aberration.
//!
//! Both operate on unit direction vectors in BCRS/GCRS axes. Deflection
//! follows the first-order post-Newtonian formula for a single body; the
//! aberration step is the full relativistic (Lorentz) transformation.
//!
//! Source: Kaplan 2005, USNO Circular 179, §7.2; Klioner 2003,
//! _Astronomical Journal_ 125, 1580.

use crate::matrix::{Vec3, cross, dot, normalize};

/// Schwarzschild radius of the Sun, au: 2GM☉/(c²·au).
pub const SUN_SCHWARZSCHILD_RADIUS_AU: f64 = 1.974_125_743_36e-8;

/// Light time for one astronomical unit, seconds.
pub const AU_LIGHT_TIME_S: f64 = 499.004_782;

/// Speed of light in au/day.
pub const C_AU_PER_DAY: f64 = 86_400.0 / AU_LIGHT_TIME_S;

/// Deflection of light by one body.
///
/// * `bm` — mass of the deflecting body, solar masses
/// * `p` — direction from observer to source (unit vector)
/// * `q` — direction from body to source (unit vector)
/// * `e` — direction from body to observer (unit vector)
/// * `em` — distance from body to observer, au
/// * `dlim` — floor on the `q·(q + e)` denominator
///
/// Returns the deflected direction (unit vector to first order).
pub fn deflect(bm: f64, p: &Vec3, q: &Vec3, e: &Vec3, em: f64, dlim: f64) -> Vec3 {
    let qpe = [q[0] + e[0], q[1] + e[1], q[2] + e[2]];
    let qdqpe = dot(q, &qpe);
    let w = bm * SUN_SCHWARZSCHILD_RADIUS_AU / em / qdqpe.max(dlim);

    let eq = cross(e, q);
    let peq = cross(p, &eq);

    [p[0] + w * peq[0], p[1] + w * peq[1], p[2] + w * peq[2]]
}

/// Deflection of starlight by the Sun, for a source at infinity.
///
/// * `p` — direction from observer to star (unit vector)
/// * `e` — direction from Sun to observer (unit vector)
/// * `em` — distance from Sun to observer, au
///
/// The limiter `1e-6 / max(em², 1)` keeps the result finite for a star
/// directly behind the Sun; it only engages within about a degree of the
/// solar limb as seen from 1 au.
pub fn deflect_by_sun(p: &Vec3, e: &Vec3, em: f64) -> Vec3 {
    let em2 = (em * em).max(1.0);
    let dlim = 1e-6 / em2;
    deflect(1.0, p, p, e, em, dlim)
}

/// Apply stellar aberration.
///
/// * `pnat` — natural direction to the source (unit vector)
/// * `v` — observer barycentric velocity in units of c
/// * `s` — distance between the Sun and the observer, au
/// * `bm1` — reciprocal Lorentz factor `√(1 − |v|²)`
///
/// Returns the proper direction (unit vector). The `s` term adds the
/// Sun's gravitational time dilation at the observer.
pub fn aberrate(pnat: &Vec3, v: &Vec3, s: f64, bm1: f64) -> Vec3 {
    let pdv = dot(pnat, v);
    let w1 = 1.0 + pdv / (1.0 + bm1);
    let w2 = SUN_SCHWARZSCHILD_RADIUS_AU / s;

    let p: Vec3 =
        std::array::from_fn(|i| pnat[i] * bm1 + w1 * v[i] + w2 * (v[i] - pdv * pnat[i]));
    normalize(&p).1
}

/// Observer velocity in units of c and its reciprocal Lorentz factor,
/// from a velocity in au/day.
pub fn velocity_in_c(v_au_per_day: &Vec3) -> (Vec3, f64) {
    let v = v_au_per_day.map(|c| c / C_AU_PER_DAY);
    let bm1 = (1.0 - dot(&v, &v)).sqrt();
    (v, bm1)
}
