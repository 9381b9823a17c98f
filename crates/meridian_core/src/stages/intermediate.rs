//! Stage 3: BCRS direction to the Celestial Intermediate Reference System.
//!
//! Applies solar light deflection and annual aberration for the geocentre,
//! then rotates by the celestial-to-intermediate matrix built from the CIP
//! coordinates X, Y and the CIO locator s.

use meridian_frames::matrix::{Mat3, Vec3, mat_vec};
use meridian_frames::{
    EarthState, aberrate, bias_precession_nutation_matrix, cartesian_to_spherical,
    celestial_to_intermediate, cio_locator, cip_xy, deflect_by_sun, earth_state,
    equation_of_origins, velocity_in_c, wrap_two_pi,
};
use meridian_time::JulianPair;

/// Everything stage 3 needs that depends only on the TT epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialFrame {
    /// Heliocentric Earth state, standing in for the barycentric one.
    pub earth: EarthState,
    /// Sun → Earth distance, au.
    pub sun_distance: f64,
    /// Sun → Earth unit vector.
    pub sun_direction: Vec3,
    /// Earth velocity in units of c.
    pub velocity: Vec3,
    /// Reciprocal Lorentz factor.
    pub bm1: f64,
    /// Bias-precession-nutation matrix, GCRS → true equator of date.
    pub npb: Mat3,
    /// CIP X, Y.
    pub cip: (f64, f64),
    /// CIO locator s.
    pub s: f64,
    /// Celestial-to-intermediate matrix.
    pub c2i: Mat3,
    /// Equation of the origins, ERA − GST.
    pub equation_of_origins: f64,
}

impl CelestialFrame {
    pub fn at(tt: JulianPair) -> Self {
        let earth = earth_state(tt);
        let (sun_distance, sun_direction) = earth.sun_distance_and_direction();
        let (velocity, bm1) = velocity_in_c(&earth.velocity);

        let npb = bias_precession_nutation_matrix(tt);
        let (x, y) = cip_xy(&npb);
        let s = cio_locator(tt, x, y);
        let c2i = celestial_to_intermediate(x, y, s);

        Self {
            earth,
            sun_distance,
            sun_direction,
            velocity,
            bm1,
            npb,
            cip: (x, y),
            s,
            c2i,
            equation_of_origins: equation_of_origins(&npb, s),
        }
    }

    /// Observer barycentric position for the parallax and Rømer terms.
    pub fn observer_position(&self) -> Vec3 {
        self.earth.position
    }

    /// Carry a BCRS direction into the CIRS.
    pub fn to_intermediate(&self, bcrs: &Vec3) -> IntermediatePlace {
        let deflected = deflect_by_sun(bcrs, &self.sun_direction, self.sun_distance);
        let proper = aberrate(&deflected, &self.velocity, self.sun_distance, self.bm1);
        let direction = mat_vec(&self.c2i, &proper);
        let (ra, dec) = cartesian_to_spherical(&direction);
        IntermediatePlace {
            direction,
            ra: wrap_two_pi(ra),
            dec,
            equation_of_origins: self.equation_of_origins,
        }
    }
}

/// CIRS place of the star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntermediatePlace {
    /// Unit vector, CIRS axes.
    pub direction: Vec3,
    /// CIO-based right ascension, [0, 2π).
    pub ra: f64,
    pub dec: f64,
    pub equation_of_origins: f64,
}
