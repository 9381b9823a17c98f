//! The observed-place engine.

use std::collections::HashMap;
use std::fmt::Formatter;
use std::sync::Arc;

use meridian_frames::matrix::Vec3;
use meridian_time::{BuiltinLeapSeconds, LeapSecondKernel, LeapSecondProvider, TimeScales};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::stages::{
    self, CelestialFrame, IntermediatePlace, RefractionConstants, RefractionModel, SiteFrame,
    StandardRefraction, TopocentricPlace,
};
use crate::types::{ObservationRequest, ObservedCoordinates};

/// Every intermediate product of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineTrace {
    pub scales: TimeScales,
    /// Julian years from the catalog epoch.
    pub elapsed_years: f64,
    /// BCRS unit direction at the observation epoch.
    pub bcrs: Vec3,
    pub intermediate: IntermediatePlace,
    pub topocentric: TopocentricPlace,
    pub refraction: RefractionConstants,
    pub observed_zenith_distance: f64,
    pub coordinates: ObservedCoordinates,
}

/// Catalog-to-observed place engine.
///
/// Collaborators are fixed at construction, so an `Engine` can be shared
/// across threads behind an [`Arc`].
pub struct Engine {
    config: EngineConfig,
    leap_seconds: Arc<dyn LeapSecondProvider>,
    refraction: Arc<dyn RefractionModel>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("refraction", &self.refraction)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine, loading the leap-second kernel when one is
    /// configured and using the compiled-in table otherwise.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let leap_seconds: Arc<dyn LeapSecondProvider> = match &config.lsk_path {
            Some(path) => Arc::new(
                LeapSecondKernel::load(path).map_err(|e| EngineError::KernelLoad(e.to_string()))?,
            ),
            None => Arc::new(BuiltinLeapSeconds),
        };
        Ok(Self::from_parts(config, leap_seconds))
    }

    /// Create an engine with an explicit leap-second provider. Any
    /// `lsk_path` in the config is ignored.
    pub fn with_leap_seconds(
        config: EngineConfig,
        leap_seconds: Arc<dyn LeapSecondProvider>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::from_parts(config, leap_seconds))
    }

    fn from_parts(config: EngineConfig, leap_seconds: Arc<dyn LeapSecondProvider>) -> Self {
        let refraction: Arc<dyn RefractionModel> = Arc::new(StandardRefraction::new(
            config.refraction_iterations,
            config.zenith_clamp(),
        ));
        Self {
            config,
            leap_seconds,
            refraction,
        }
    }

    /// Replace the refraction model.
    pub fn with_refraction_model(mut self, refraction: Arc<dyn RefractionModel>) -> Self {
        self.refraction = refraction;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn leap_seconds(&self) -> &dyn LeapSecondProvider {
        self.leap_seconds.as_ref()
    }

    /// Observed place of one star.
    pub fn observe(
        &self,
        request: &ObservationRequest,
    ) -> Result<ObservedCoordinates, EngineError> {
        self.observe_with_trace(request).map(|t| t.coordinates)
    }

    /// Observed place together with every stage's output.
    pub fn observe_with_trace(
        &self,
        request: &ObservationRequest,
    ) -> Result<PipelineTrace, EngineError> {
        request.validate()?;
        let scales = stages::normalize_time(&request.time, self.leap_seconds.as_ref())?;
        let frame = CelestialFrame::at(scales.tt);
        self.run(request, scales, &frame)
    }

    /// Observed places for many requests, in input order.
    ///
    /// Requests at the same instant share the epoch-dependent work.
    pub fn observe_batch(
        &self,
        requests: &[ObservationRequest],
    ) -> Vec<Result<ObservedCoordinates, EngineError>> {
        let mut epochs: HashMap<[u64; 3], (TimeScales, CelestialFrame)> = HashMap::new();
        let results: Vec<_> = requests
            .iter()
            .map(|request| {
                request.validate()?;
                let t = &request.time;
                let key = [t.utc1.to_bits(), t.utc2.to_bits(), t.dut1.to_bits()];
                let (scales, frame) = match epochs.get(&key) {
                    Some(cached) => *cached,
                    None => {
                        let scales = stages::normalize_time(t, self.leap_seconds.as_ref())?;
                        let entry = (scales, CelestialFrame::at(scales.tt));
                        epochs.insert(key, entry);
                        entry
                    }
                };
                self.run(request, scales, &frame).map(|trace| trace.coordinates)
            })
            .collect();
        log::debug!(
            "batch of {} requests over {} distinct epochs",
            requests.len(),
            epochs.len()
        );
        results
    }

    fn run(
        &self,
        request: &ObservationRequest,
        scales: TimeScales,
        frame: &CelestialFrame,
    ) -> Result<PipelineTrace, EngineError> {
        let elapsed_years = stages::elapsed_years(&request.star, scales.tt);
        let bcrs = stages::propagate(&request.star, elapsed_years, &frame.observer_position());
        let intermediate = frame.to_intermediate(&bcrs);
        log::debug!(
            "CIRS place: ra = {:.9} rad, dec = {:.9} rad, eo = {:.3e} rad",
            intermediate.ra,
            intermediate.dec,
            intermediate.equation_of_origins
        );

        let ellipsoid = request.site.ellipsoid.unwrap_or(self.config.ellipsoid);
        let site = SiteFrame::new(&request.site, ellipsoid, &request.orientation, &scales);
        if site.at_pole {
            log::warn!(
                "site latitude {} rad is at a geographic pole; azimuth reported as 0",
                request.site.latitude
            );
        }
        let topocentric = TopocentricPlace::observe(&intermediate, &site);

        let refraction = self.refraction.constants(&request.atmosphere);
        let observed_zenith_distance = self
            .refraction
            .observed_zenith_distance(topocentric.zenith_distance, &refraction);
        log::debug!(
            "refraction: A = {:.3e}, B = {:.3e}, zd {:.9} -> {:.9} rad",
            refraction.a,
            refraction.b,
            topocentric.zenith_distance,
            observed_zenith_distance
        );

        let coordinates = stages::assemble(
            &topocentric,
            observed_zenith_distance,
            &site,
            intermediate.equation_of_origins,
        )?;

        Ok(PipelineTrace {
            scales,
            elapsed_years,
            bcrs,
            intermediate,
            topocentric,
            refraction,
            observed_zenith_distance,
            coordinates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AtmosphereModel, CatalogStar, EarthOrientation, ObservationTime, ObserverSite,
    };
    use meridian_time::TimeError;

    fn request() -> ObservationRequest {
        ObservationRequest {
            star: CatalogStar::new(2.71, 0.174, 1e-5, 5e-6, 0.1, 55.0),
            time: ObservationTime::new(2_456_384.5, 0.969_254_051, 0.155_067_5),
            site: ObserverSite::new(-0.527_800_806, -1.234_585_6, 2738.0),
            orientation: EarthOrientation::new(2.472_307_37e-7, 1.826_404_64e-6),
            atmosphere: AtmosphereModel::new(731.0, 12.8, 0.59, 0.55),
        }
    }

    #[test]
    fn default_engine_observes() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let obs = engine.observe(&request()).unwrap();
        assert!((0.0..std::f64::consts::TAU).contains(&obs.azimuth));
        assert!((0.0..=std::f64::consts::PI).contains(&obs.zenith_distance));
    }

    #[test]
    fn missing_lsk_is_kernel_load_error() {
        let config = EngineConfig::with_lsk("/nonexistent/naif0012.tls".into());
        assert!(matches!(Engine::new(config), Err(EngineError::KernelLoad(_))));
    }

    #[test]
    fn invalid_config_rejected_before_loading() {
        let config = EngineConfig {
            lsk_path: Some("/nonexistent/naif0012.tls".into()),
            refraction_iterations: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(Engine::new(config), Err(EngineError::InvalidConfig(_))));
    }

    #[derive(Debug)]
    struct FixedLeap(f64);

    impl LeapSecondProvider for FixedLeap {
        fn tai_minus_utc(&self, _: i32, _: u32, _: u32, _: f64) -> Result<f64, TimeError> {
            Ok(self.0)
        }
    }

    #[test]
    fn injected_leap_seconds_are_used() {
        let engine =
            Engine::with_leap_seconds(EngineConfig::default(), Arc::new(FixedLeap(35.0))).unwrap();
        let trace = engine.observe_with_trace(&request()).unwrap();
        assert_eq!(trace.scales.tai_minus_utc, 35.0);
    }

    #[test]
    fn trace_agrees_with_observe() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let trace = engine.observe_with_trace(&request()).unwrap();
        assert_eq!(trace.coordinates, engine.observe(&request()).unwrap());
        assert_eq!(trace.observed_zenith_distance, trace.coordinates.zenith_distance);
        assert!(trace.observed_zenith_distance < trace.topocentric.zenith_distance);
    }

    #[test]
    fn batch_preserves_order_and_errors() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let good = request();
        let mut bad = request();
        bad.site.latitude = 2.0;
        let mut other = request();
        other.star.ra = 1.0;

        let results = engine.observe_batch(&[good, bad, other, good]);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0], engine.observe(&good));
        assert!(matches!(
            results[1],
            Err(EngineError::InvalidGeodeticInput { .. })
        ));
        assert_eq!(results[2], engine.observe(&other));
        assert_eq!(results[0], results[3]);
    }

    #[test]
    fn debug_shows_config() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let s = format!("{engine:?}");
        assert!(s.contains("Engine") && s.contains("refraction_iterations"));
    }

    // Compile-time assertion: Engine must be Send + Sync.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<Engine>();
        }
    };
}
