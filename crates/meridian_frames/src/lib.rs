//! Reference-frame machinery for the observed-place pipeline.
//!
//! Provides 3×3 rotation matrices, IAU 2006/2000B bias-precession-nutation,
//! the CIO locator and celestial-to-intermediate matrix, a low-precision
//! heliocentric Earth state, light deflection and aberration, and
//! ellipsoidal geodesy with polar motion.

pub mod aberration;
pub mod cio;
pub mod earth;
pub mod geodesy;
pub mod matrix;
pub mod nutation;
pub mod precession;
pub mod spherical;

pub use aberration::{aberrate, deflect, deflect_by_sun, velocity_in_c};
pub use cio::{celestial_to_intermediate, cio_locator, cip_xy, equation_of_origins};
pub use earth::{EarthState, earth_state};
pub use geodesy::{Ellipsoid, polar_motion_matrix, site_position_velocity};
pub use matrix::{Mat3, Vec3};
pub use nutation::{fundamental_arguments, nutation_iau2000b};
pub use precession::{
    FwAngles, bias_precession_matrix, bias_precession_nutation_matrix, fw_angles, fw_matrix,
    mean_obliquity,
};
pub use spherical::{cartesian_to_spherical, spherical_to_cartesian, wrap_pi, wrap_two_pi};
