//! Catalog-to-observed place engine.
//!
//! This crate provides the [`Engine`] that carries an ICRS catalog star to
//! observed azimuth, zenith distance, hour angle, declination and right
//! ascension for a terrestrial observer, through six explicit stages (see
//! [`stages`]):
//!
//! time scales → space motion → CIRS place → local horizon → refraction →
//! assembled coordinates.
//!
//! Leap seconds come from an injected [`LeapSecondProvider`]; refraction
//! from a [`RefractionModel`]. Both are fixed at construction, so a single
//! engine can serve many threads.
//!
//! ```no_run
//! use meridian_core::*;
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let request = ObservationRequest {
//!     star: CatalogStar::fixed(6.165, 0.912),
//!     time: ObservationTime::new(2_452_878.0, -0.4738544697916667, -0.35),
//!     site: ObserverSite::new(0.1695, 0.9143, 200.0),
//!     orientation: EarthOrientation::default(),
//!     atmosphere: AtmosphereModel::new(1013.25, 15.0, 0.5, 0.55),
//! };
//! let observed = engine.observe(&request)?;
//! println!("alt = {:.6}°", observed.altitude().to_degrees());
//! # Ok::<(), EngineError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod stages;
pub mod types;

pub use config::{DEFAULT_ZENITH_CLAMP_DEG, EngineConfig, MAX_REFRACTION_ITERATIONS};
pub use engine::{Engine, PipelineTrace};
pub use error::EngineError;
pub use meridian_frames::Ellipsoid;
pub use meridian_time::{BuiltinLeapSeconds, LeapSecondKernel, LeapSecondProvider, TimeScales};
pub use stages::{
    CelestialFrame, IntermediatePlace, RefractionConstants, RefractionModel, SiteFrame,
    StandardRefraction, TopocentricPlace,
};
pub use types::{
    AtmosphereModel, CatalogStar, EarthOrientation, J2000_EPOCH, ObservationRequest,
    ObservationTime, ObservedCoordinates, ObserverSite,
};
