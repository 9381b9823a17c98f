//! The six pipeline stages, in execution order.
//!
//! 1. [`time`]: UTC and ΔUT1 to every time scale
//! 2. [`space_motion`]: catalog place to BCRS direction at the epoch
//! 3. [`intermediate`]: BCRS direction to CIRS place
//! 4. [`orientation`]: CIRS place to geometric local horizon
//! 5. [`refraction`]: geometric to observed zenith distance
//! 6. [`assemble`]: final observed coordinates
//!
//! Each stage is a pure function of its typed inputs.

pub mod assemble;
pub mod intermediate;
pub mod orientation;
pub mod refraction;
pub mod space_motion;
pub mod time;

pub use assemble::assemble;
pub use intermediate::{CelestialFrame, IntermediatePlace};
pub use orientation::{SiteFrame, TopocentricPlace};
pub use refraction::{RefractionConstants, RefractionModel, StandardRefraction};
pub use space_motion::{PARALLAX_EPSILON, elapsed_years, propagate};
pub use time::normalize_time;
