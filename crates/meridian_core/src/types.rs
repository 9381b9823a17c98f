//! Request and result value types.
//!
//! Every input entity is an immutable `Copy` value with serde support so a
//! whole [`ObservationRequest`] can be read from JSON. Angles are radians
//! unless a field name says otherwise.

use std::f64::consts::{FRAC_PI_2, PI};

use meridian_frames::Ellipsoid;
use meridian_time::{JulianPair, MAX_ABS_DUT1_S, UtcTime};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Julian epoch of the ICRS catalog convention.
pub const J2000_EPOCH: f64 = 2000.0;

fn default_epoch() -> f64 {
    J2000_EPOCH
}

/// Star position and space motion at the catalog epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogStar {
    /// ICRS right ascension.
    pub ra: f64,
    /// ICRS declination.
    pub dec: f64,
    /// Proper motion in RA as dα/dt (not multiplied by cos δ), rad/yr.
    pub pm_ra: f64,
    /// Proper motion in Dec, rad/yr.
    pub pm_dec: f64,
    /// Parallax, arcseconds.
    pub parallax_arcsec: f64,
    /// Radial velocity, km/s, positive receding.
    pub radial_velocity_km_s: f64,
    /// Catalog epoch as a Julian epoch (TT).
    #[serde(default = "default_epoch")]
    pub epoch: f64,
}

impl CatalogStar {
    /// Star at the J2000.0 catalog epoch.
    pub fn new(
        ra: f64,
        dec: f64,
        pm_ra: f64,
        pm_dec: f64,
        parallax_arcsec: f64,
        radial_velocity_km_s: f64,
    ) -> Self {
        Self {
            ra,
            dec,
            pm_ra,
            pm_dec,
            parallax_arcsec,
            radial_velocity_km_s,
            epoch: J2000_EPOCH,
        }
    }

    /// Star with no measurable space motion or parallax.
    pub fn fixed(ra: f64, dec: f64) -> Self {
        Self::new(ra, dec, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("ra", self.ra),
            ("dec", self.dec),
            ("pm_ra", self.pm_ra),
            ("pm_dec", self.pm_dec),
            ("radial_velocity_km_s", self.radial_velocity_km_s),
            ("epoch", self.epoch),
        ] {
            if !value.is_finite() {
                return Err(EngineError::star(field, value, "must be finite"));
            }
        }
        if self.dec.abs() > FRAC_PI_2 {
            return Err(EngineError::star(
                "dec",
                self.dec,
                "must be within [-pi/2, pi/2]",
            ));
        }
        if !self.parallax_arcsec.is_finite() || self.parallax_arcsec < 0.0 {
            return Err(EngineError::star(
                "parallax_arcsec",
                self.parallax_arcsec,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Moment of observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationTime {
    /// UTC two-part Julian Date, first part.
    pub utc1: f64,
    /// UTC two-part Julian Date, second part.
    pub utc2: f64,
    /// UT1 − UTC, seconds.
    pub dut1: f64,
}

impl ObservationTime {
    pub fn new(utc1: f64, utc2: f64, dut1: f64) -> Self {
        Self { utc1, utc2, dut1 }
    }

    /// From a calendar UTC, keeping day number and fraction apart.
    pub fn from_utc(utc: &UtcTime, dut1: f64) -> Result<Self, EngineError> {
        let jd = utc.to_julian_pair()?;
        Ok(Self::new(jd.jd1, jd.jd2, dut1))
    }

    pub fn utc(&self) -> JulianPair {
        JulianPair::new(self.utc1, self.utc2)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.utc1.is_finite() {
            return Err(EngineError::time("utc1", self.utc1, "must be finite"));
        }
        if !self.utc2.is_finite() {
            return Err(EngineError::time("utc2", self.utc2, "must be finite"));
        }
        if !self.dut1.is_finite() || self.dut1.abs() > MAX_ABS_DUT1_S {
            return Err(EngineError::time(
                "dut1",
                self.dut1,
                format!("must be finite with magnitude at most {MAX_ABS_DUT1_S} s"),
            ));
        }
        Ok(())
    }
}

/// Geodetic observing station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverSite {
    /// Longitude, east positive.
    pub longitude: f64,
    /// Geodetic latitude.
    pub latitude: f64,
    /// Height above the ellipsoid, metres.
    pub height_m: f64,
    /// Reference ellipsoid; `None` uses the engine's configured default.
    #[serde(default)]
    pub ellipsoid: Option<Ellipsoid>,
}

impl ObserverSite {
    pub fn new(longitude: f64, latitude: f64, height_m: f64) -> Self {
        Self {
            longitude,
            latitude,
            height_m,
            ellipsoid: None,
        }
    }

    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = Some(ellipsoid);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.longitude.is_finite() {
            return Err(EngineError::geodetic("longitude", self.longitude, "must be finite"));
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&self.latitude) {
            return Err(EngineError::geodetic(
                "latitude",
                self.latitude,
                "must be within [-pi/2, pi/2]",
            ));
        }
        if !self.height_m.is_finite() {
            return Err(EngineError::geodetic("height_m", self.height_m, "must be finite"));
        }
        Ok(())
    }
}

/// Polar motion, ITRS pole coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EarthOrientation {
    pub xp: f64,
    pub yp: f64,
}

impl EarthOrientation {
    pub fn new(xp: f64, yp: f64) -> Self {
        Self { xp, yp }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.xp.is_finite() {
            return Err(EngineError::geodetic("xp", self.xp, "must be finite"));
        }
        if !self.yp.is_finite() {
            return Err(EngineError::geodetic("yp", self.yp, "must be finite"));
        }
        Ok(())
    }
}

/// Local weather and observing wavelength.
///
/// A pressure of zero switches refraction off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereModel {
    pub pressure_hpa: f64,
    pub temperature_c: f64,
    /// Relative humidity, 0..=1.
    pub relative_humidity: f64,
    pub wavelength_um: f64,
}

impl Default for AtmosphereModel {
    fn default() -> Self {
        Self {
            pressure_hpa: 0.0,
            temperature_c: 15.0,
            relative_humidity: 0.0,
            wavelength_um: 0.55,
        }
    }
}

impl AtmosphereModel {
    pub fn new(
        pressure_hpa: f64,
        temperature_c: f64,
        relative_humidity: f64,
        wavelength_um: f64,
    ) -> Self {
        Self {
            pressure_hpa,
            temperature_c,
            relative_humidity,
            wavelength_um,
        }
    }

    /// Dry optical atmosphere with the pressure expected at `height_m`.
    ///
    /// Pressure follows the standard atmosphere with `temperature_c` as the
    /// sea-level base temperature: a 6.5 K/km lapse rate up to 11 km,
    /// isothermal above.
    pub fn standard_for_height(height_m: f64, temperature_c: f64) -> Self {
        const P0: f64 = 1013.25;
        const LAPSE: f64 = 0.0065;
        const TROPOPAUSE_M: f64 = 11_000.0;
        // g·M/R, K/m
        const GMR: f64 = 9.806_65 * 0.028_964_4 / 8.314_32;

        let t0 = temperature_c + 273.15;
        let troposphere = |h: f64| P0 * (t0 / (t0 - LAPSE * h)).powf(-GMR / LAPSE);
        let pressure_hpa = if height_m < TROPOPAUSE_M {
            troposphere(height_m)
        } else {
            let t11 = t0 - LAPSE * TROPOPAUSE_M;
            troposphere(TROPOPAUSE_M) * (-GMR * (height_m - TROPOPAUSE_M) / t11).exp()
        };

        Self {
            pressure_hpa,
            temperature_c,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.pressure_hpa.is_finite() || self.pressure_hpa < 0.0 {
            return Err(EngineError::atmosphere(
                "pressure_hpa",
                self.pressure_hpa,
                "must be finite and non-negative",
            ));
        }
        if !self.temperature_c.is_finite() {
            return Err(EngineError::atmosphere(
                "temperature_c",
                self.temperature_c,
                "must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.relative_humidity) {
            return Err(EngineError::atmosphere(
                "relative_humidity",
                self.relative_humidity,
                "must be within [0, 1]",
            ));
        }
        if !self.wavelength_um.is_finite() || self.wavelength_um <= 0.0 {
            return Err(EngineError::atmosphere(
                "wavelength_um",
                self.wavelength_um,
                "must be finite and positive",
            ));
        }
        Ok(())
    }

    /// Whether refraction applies at all.
    pub fn refracts(&self) -> bool {
        self.pressure_hpa > 0.0
    }
}

/// One complete observation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationRequest {
    pub star: CatalogStar,
    pub time: ObservationTime,
    pub site: ObserverSite,
    #[serde(default)]
    pub orientation: EarthOrientation,
    #[serde(default)]
    pub atmosphere: AtmosphereModel,
}

impl ObservationRequest {
    /// Check every input once, before the pipeline runs.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.time.validate()?;
        self.site.validate()?;
        self.orientation.validate()?;
        self.atmosphere.validate()?;
        self.star.validate()
    }
}

/// Observed topocentric place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedCoordinates {
    /// Azimuth, north through east, [0, 2π).
    pub azimuth: f64,
    /// Observed zenith distance, [0, π].
    pub zenith_distance: f64,
    /// Hour angle, westward positive, (−π, π].
    pub hour_angle: f64,
    pub declination: f64,
    /// CIO-based right ascension, [0, 2π).
    pub right_ascension: f64,
    /// Equation of the origins, ERA − GST.
    pub equation_of_origins: f64,
}

impl ObservedCoordinates {
    pub fn altitude(&self) -> f64 {
        FRAC_PI_2 - self.zenith_distance
    }

    /// Parallactic angle at a site of geodetic `latitude`.
    ///
    /// Zero when the object is exactly at the zenith.
    pub fn parallactic_angle(&self, latitude: f64) -> f64 {
        let cos_phi = latitude.cos();
        let (sin_h, cos_h) = self.hour_angle.sin_cos();
        let (sin_d, cos_d) = self.declination.sin_cos();
        let sqsz = cos_phi * sin_h;
        let cqsz = latitude.sin() * cos_d - cos_phi * sin_d * cos_h;
        if sqsz == 0.0 && cqsz == 0.0 {
            0.0
        } else {
            sqsz.atan2(cqsz)
        }
    }

    /// Azimuth, altitude, hour angle, declination, right ascension and
    /// equation of the origins, in degrees.
    pub fn to_degrees(&self) -> [f64; 6] {
        [
            self.azimuth,
            self.altitude(),
            self.hour_angle,
            self.declination,
            self.right_ascension,
            self.equation_of_origins,
        ]
        .map(|a| a * 180.0 / PI)
    }
}
