//! Stage 5: atmospheric refraction.
//!
//! Refraction in zenith distance is modelled as `R(z) = A·tan z + B·tan³ z`
//! with constants A, B from the local weather (Green 1987, ch. 4; Hohenkerk
//! & Sinclair 1985 for the formula fits). The observed zenith distance
//! solves `zd_obs = zd_geo − R(zd_obs)` by bounded fixed-point iteration.
//!
//! The tan³ model peaks at `tan² z = A / (−3B)`, about 86.7° at sea level,
//! and turns negative beyond. The tangent is therefore evaluated no further
//! out than that turning point or the configured clamp, whichever is lower,
//! so refraction saturates near the horizon instead of diverging. The
//! correction itself never exceeds its value at that limit, and the observed
//! zenith distance stays within `[0, zd_geo]`.

use serde::Serialize;

use crate::types::AtmosphereModel;

/// Iterates stop once a correction falls below this, radians.
const CONVERGENCE: f64 = 1e-13;

/// Refraction constants, radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RefractionConstants {
    /// tan z coefficient.
    pub a: f64,
    /// tan³ z coefficient.
    pub b: f64,
}

impl RefractionConstants {
    /// No atmosphere.
    pub const NONE: Self = Self { a: 0.0, b: 0.0 };

    /// Constants for the given weather.
    ///
    /// Inputs are clamped to the domain of the fits: temperature to
    /// [−150, 200] °C, pressure to [0, 10000] hPa, humidity to [0, 1] and
    /// wavelength to [0.1, 1e6] µm. Wavelengths above 100 µm use the radio
    /// formula.
    pub fn from_atmosphere(atmosphere: &AtmosphereModel) -> Self {
        if !atmosphere.refracts() {
            return Self::NONE;
        }

        let optical = atmosphere.wavelength_um <= 100.0;
        let t = atmosphere.temperature_c.clamp(-150.0, 200.0);
        let p = atmosphere.pressure_hpa.clamp(0.0, 10_000.0);
        let r = atmosphere.relative_humidity.clamp(0.0, 1.0);
        let w = atmosphere.wavelength_um.clamp(0.1, 1e6);

        // Water vapour pressure at the observer.
        let pw = if p > 0.0 {
            let ps = 10f64.powf((0.7859 + 0.03477 * t) / (1.0 + 0.00412 * t))
                * (1.0 + p * (4.5e-6 + 6e-10 * t * t));
            r * ps / (1.0 - (1.0 - r) * ps / p)
        } else {
            0.0
        };

        let tk = t + 273.15;
        let gamma = if optical {
            let wlsq = w * w;
            ((77.534_84e-6 + (4.391_08e-7 + 3.666e-9 / wlsq) / wlsq) * p - 11.2684e-6 * pw) / tk
        } else {
            (77.6890e-6 * p - (6.3938e-6 - 0.375_463 / tk) * pw) / tk
        };

        let mut beta = 4.4474e-6 * tk;
        if !optical {
            beta -= 0.0074 * pw * beta;
        }

        Self {
            a: gamma * (1.0 - beta),
            b: -gamma * (beta - gamma / 2.0),
        }
    }

    pub fn is_none(&self) -> bool {
        self.a == 0.0 && self.b == 0.0
    }

    /// Refraction at zenith distance `z`, radians.
    pub fn refraction_at(&self, z: f64) -> f64 {
        let t = z.tan();
        t * (self.a + self.b * t * t)
    }

    /// Zenith distance at which the tan³ model stops increasing.
    pub fn turning_point(&self) -> Option<f64> {
        if self.b < 0.0 && self.a > 0.0 {
            Some((self.a / (-3.0 * self.b)).sqrt().atan())
        } else {
            None
        }
    }
}

/// Geometric → observed zenith distance.
pub trait RefractionModel: Send + Sync + std::fmt::Debug {
    fn constants(&self, atmosphere: &AtmosphereModel) -> RefractionConstants {
        RefractionConstants::from_atmosphere(atmosphere)
    }

    /// Observed zenith distance for geometric zenith distance `zd_geo`.
    ///
    /// Must return `zd_geo` unchanged when `constants.is_none()`.
    fn observed_zenith_distance(&self, zd_geo: f64, constants: &RefractionConstants) -> f64;
}

/// The A tan z + B tan³ z model solved by fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardRefraction {
    iterations: u8,
    clamp: f64,
}

impl StandardRefraction {
    /// `iterations` bounds the fixed-point loop; `clamp` (radians) is the
    /// furthest zenith distance the tangent is evaluated at.
    pub fn new(iterations: u8, clamp: f64) -> Self {
        Self {
            iterations: iterations.max(1),
            clamp,
        }
    }

    pub fn iterations(&self) -> u8 {
        self.iterations
    }

    pub fn clamp(&self) -> f64 {
        self.clamp
    }
}

impl RefractionModel for StandardRefraction {
    fn observed_zenith_distance(&self, zd_geo: f64, constants: &RefractionConstants) -> f64 {
        if constants.is_none() {
            return zd_geo;
        }

        let limit = constants
            .turning_point()
            .map_or(self.clamp, |peak| peak.min(self.clamp));
        if zd_geo > limit {
            log::debug!(
                "zenith distance {:.6} rad beyond refraction limit {:.6} rad",
                zd_geo,
                limit
            );
        }

        // With B ≥ 0 the tan³ term never turns over, so fall back to the
        // tan z term alone at the limit.
        let ceiling = match constants.turning_point() {
            Some(_) => constants.refraction_at(limit),
            None => constants.a * limit.tan(),
        }
        .max(0.0);

        let mut zd_obs = zd_geo;
        for _ in 0..self.iterations {
            let r = constants
                .refraction_at(zd_obs.min(limit).max(0.0))
                .min(ceiling)
                .max(0.0);
            let next = zd_geo - r;
            let step = (next - zd_obs).abs();
            zd_obs = next;
            if step < CONVERGENCE {
                break;
            }
        }
        zd_obs.min(zd_geo).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCSEC: f64 = std::f64::consts::PI / (180.0 * 3600.0);

    fn sea_level() -> AtmosphereModel {
        AtmosphereModel::new(1013.25, 15.0, 0.0, 0.55)
    }

    #[test]
    fn reference_constants() {
        let c = RefractionConstants::from_atmosphere(&AtmosphereModel::new(800.0, 10.0, 0.9, 0.4));
        assert!((c.a - 0.226_494_995_624_141_500_9e-3).abs() < 1e-15, "{:e}", c.a);
        assert!((c.b - -0.259_865_826_172_934_397_0e-6).abs() < 1e-18, "{:e}", c.b);
    }

    #[test]
    fn sea_level_is_about_a_minute() {
        let c = RefractionConstants::from_atmosphere(&sea_level());
        let a = c.a / ARCSEC;
        assert!(a > 55.0 && a < 62.0, "A = {a}″");
        assert!(c.b < 0.0);
    }

    #[test]
    fn radio_refracts_more_when_humid() {
        let dry = RefractionConstants::from_atmosphere(&AtmosphereModel::new(1000.0, 20.0, 0.0, 1e4));
        let wet = RefractionConstants::from_atmosphere(&AtmosphereModel::new(1000.0, 20.0, 0.8, 1e4));
        assert!(wet.a > dry.a * 1.1);
    }

    #[test]
    fn zero_pressure_is_bit_identical() {
        let c = RefractionConstants::from_atmosphere(&AtmosphereModel::default());
        assert!(c.is_none());
        let model = StandardRefraction::new(3, 89.9_f64.to_radians());
        for zd in [0.0, 0.3, 1.5, 1.6, 3.0] {
            assert_eq!(model.observed_zenith_distance(zd, &c).to_bits(), zd.to_bits());
        }
    }

    #[test]
    fn fixed_point_satisfies_equation() {
        let c = RefractionConstants::from_atmosphere(&sea_level());
        let model = StandardRefraction::new(3, 89.9_f64.to_radians());
        let zd_geo = 60_f64.to_radians();
        let zd_obs = model.observed_zenith_distance(zd_geo, &c);
        let residual = zd_obs - (zd_geo - c.refraction_at(zd_obs));
        assert!(residual.abs() < 1e-3 * ARCSEC, "{residual:e}");
        // About 100″ at 60° zenith distance.
        let r = (zd_geo - zd_obs) / ARCSEC;
        assert!(r > 95.0 && r < 105.0, "{r}″");
    }

    #[test]
    fn single_iteration_is_coarser() {
        let c = RefractionConstants::from_atmosphere(&sea_level());
        let one = StandardRefraction::new(1, 89.9_f64.to_radians());
        let three = StandardRefraction::new(3, 89.9_f64.to_radians());
        let zd = 80_f64.to_radians();
        let z1 = one.observed_zenith_distance(zd, &c);
        let z3 = three.observed_zenith_distance(zd, &c);
        assert!(z1 < z3);
        assert!((z1 - z3).abs() < 5.0 * ARCSEC);
    }

    #[test]
    fn horizon_and_below_stay_finite() {
        let c = RefractionConstants::from_atmosphere(&sea_level());
        let model = StandardRefraction::new(3, 89.9_f64.to_radians());
        let peak = c.turning_point().unwrap();
        let saturated = c.refraction_at(peak);
        for deg in [85.0, 89.9, 90.0, 95.0, 179.0, 180.0] {
            let zd = f64::to_radians(deg);
            let obs = model.observed_zenith_distance(zd, &c);
            assert!(obs.is_finite(), "{deg}°");
            assert!(obs < zd && zd - obs <= saturated + 1e-15, "{deg}°");
        }
    }

    #[test]
    fn dense_cold_air_stays_bounded() {
        // B turns positive: no turning point, so only the clamp bounds tan z.
        let c = RefractionConstants::from_atmosphere(&AtmosphereModel::new(5000.0, -100.0, 0.0, 0.55));
        assert!(c.b > 0.0, "{:e}", c.b);
        assert_eq!(c.turning_point(), None);
        let clamp = 89.9_f64.to_radians();
        let model = StandardRefraction::new(3, clamp);
        let ceiling = c.a * clamp.tan();
        for deg in [0.0, 10.0, 30.0, 45.0, 60.0, 75.0, 85.0, 89.9, 90.0, 120.0, 180.0] {
            let zd = f64::to_radians(deg);
            let obs = model.observed_zenith_distance(zd, &c);
            assert!(obs.is_finite(), "{deg}°");
            assert!((0.0..=zd).contains(&obs), "{deg}°: {obs}");
            assert!(zd - obs <= ceiling + 1e-12, "{deg}°");
        }
    }

    #[test]
    fn zenith_is_unrefracted() {
        let c = RefractionConstants::from_atmosphere(&sea_level());
        let model = StandardRefraction::new(3, 89.9_f64.to_radians());
        assert_eq!(model.observed_zenith_distance(0.0, &c), 0.0);
    }
}
