//! Stage 4: Earth rotation, polar motion and diurnal aberration.
//!
//! The CIRS → local apparent HA/Dec rotation is
//! `Rz(elong)·Rx(−yp)·Ry(−xp)·Rz(θ + s′)`. It is reduced to three angles:
//! the local Earth rotation angle and the polar-motion components relative
//! to the local meridian. Diurnal aberration uses the site's CIRS velocity.

use std::f64::consts::FRAC_PI_2;

use meridian_frames::geodesy::site_position_velocity;
use meridian_frames::matrix::{IDENTITY, Vec3, rotate_x, rotate_y, rotate_z};
use meridian_frames::{
    Ellipsoid, cartesian_to_spherical, polar_motion_matrix, spherical_to_cartesian, wrap_pi,
    wrap_two_pi,
};
use meridian_time::{TimeScales, earth_rotation_angle, tio_locator};

use crate::stages::intermediate::IntermediatePlace;
use crate::types::{EarthOrientation, ObserverSite};

/// Speed of light, m/s.
const C_M_PER_S: f64 = 299_792_458.0;

/// Latitudes within this of ±π/2 count as a geographic pole.
const POLE_TOLERANCE: f64 = 1e-12;

/// Site-dependent rotation parameters for one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteFrame {
    /// Local Earth rotation angle.
    pub local_era: f64,
    /// Polar motion about the local meridian's x-axis.
    pub xpl: f64,
    /// Polar motion about the local y-axis.
    pub ypl: f64,
    pub sin_lat: f64,
    pub cos_lat: f64,
    /// Diurnal aberration speed, units of c.
    pub diurnal_aberration: f64,
    /// Site sits on a geographic pole; azimuth is undefined.
    pub at_pole: bool,
}

impl SiteFrame {
    pub fn new(
        site: &ObserverSite,
        ellipsoid: Ellipsoid,
        orientation: &EarthOrientation,
        scales: &TimeScales,
    ) -> Self {
        let era = earth_rotation_angle(scales.ut1);
        let sp = tio_locator(scales.tt);
        Self::from_angles(site, ellipsoid, orientation, era, sp)
    }

    /// Site frame for an explicit Earth rotation angle `era` and TIO
    /// locator `sp`.
    pub fn from_angles(
        site: &ObserverSite,
        ellipsoid: Ellipsoid,
        orientation: &EarthOrientation,
        era: f64,
        sp: f64,
    ) -> Self {
        let mut r = IDENTITY;
        rotate_z(era + sp, &mut r);
        rotate_y(-orientation.xp, &mut r);
        rotate_x(-orientation.yp, &mut r);
        rotate_z(site.longitude, &mut r);

        let (a, b) = (r[0][0], r[0][1]);
        let local_era = if a != 0.0 || b != 0.0 { b.atan2(a) } else { 0.0 };
        let xpl = r[0][2].atan2(a.hypot(b));
        let (a, b) = (r[1][2], r[2][2]);
        let ypl = if a != 0.0 || b != 0.0 { -a.atan2(b) } else { 0.0 };

        let itrs = ellipsoid.geodetic_to_geocentric(site.longitude, site.latitude, site.height_m);
        let rpm = polar_motion_matrix(orientation.xp, orientation.yp, sp);
        let (_, velocity) = site_position_velocity(&itrs, &rpm, era);

        let (sin_lat, cos_lat) = site.latitude.sin_cos();
        Self {
            local_era,
            xpl,
            ypl,
            sin_lat,
            cos_lat,
            diurnal_aberration: velocity[0].hypot(velocity[1]) / C_M_PER_S,
            at_pole: (site.latitude.abs() - FRAC_PI_2).abs() < POLE_TOLERANCE,
        }
    }

    /// Local horizon vector for a CIRS place.
    ///
    /// x points south, y east, z to the zenith. Polar motion is applied in
    /// the terrestrial frame, then diurnal aberration.
    pub fn to_horizon(&self, ra: f64, dec: f64) -> Vec3 {
        let [x, y, z] = spherical_to_cartesian(ra - self.local_era, dec);
        let (sx, cx) = self.xpl.sin_cos();
        let (sy, cy) = self.ypl.sin_cos();

        let xhd = cx * x + sx * z;
        let yhd = sx * sy * x + cy * y - cx * sy * z;
        let zhd = -sx * cy * x + sy * y + cx * cy * z;

        let f = 1.0 - self.diurnal_aberration * yhd;
        let xhdt = f * xhd;
        let yhdt = f * (yhd + self.diurnal_aberration);
        let zhdt = f * zhd;

        [
            self.sin_lat * xhdt - self.cos_lat * zhdt,
            yhdt,
            self.cos_lat * xhdt + self.sin_lat * zhdt,
        ]
    }

    /// Azimuth (north through east) of a horizon vector, [0, 2π).
    ///
    /// Zero at the zenith and at a polar site.
    pub fn azimuth(&self, horizon: &Vec3) -> f64 {
        let [x, y, _] = *horizon;
        if self.at_pole || (x == 0.0 && y == 0.0) {
            0.0
        } else {
            wrap_two_pi(y.atan2(-x))
        }
    }

    /// Hour angle in (−π, π] and declination of a horizon vector.
    pub fn hour_angle_declination(&self, horizon: &Vec3) -> (f64, f64) {
        let [x, y, z] = *horizon;
        let v = [
            self.sin_lat * x + self.cos_lat * z,
            y,
            -self.cos_lat * x + self.sin_lat * z,
        ];
        let (hm, dec) = cartesian_to_spherical(&v);
        (wrap_pi(-hm), dec)
    }

    /// CIO-based right ascension for an hour angle, [0, 2π).
    pub fn right_ascension(&self, hour_angle: f64) -> f64 {
        wrap_two_pi(self.local_era - hour_angle)
    }
}

/// Geometric place in the local frame, before refraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopocentricPlace {
    pub azimuth: f64,
    pub zenith_distance: f64,
    pub hour_angle: f64,
    pub declination: f64,
    /// Horizon vector (x south, y east, z zenith).
    pub horizon: Vec3,
}

impl TopocentricPlace {
    pub fn observe(place: &IntermediatePlace, frame: &SiteFrame) -> Self {
        let horizon = frame.to_horizon(place.ra, place.dec);
        let [x, y, z] = horizon;
        let (hour_angle, declination) = frame.hour_angle_declination(&horizon);
        Self {
            azimuth: frame.azimuth(&horizon),
            zenith_distance: x.hypot(y).atan2(z),
            hour_angle,
            declination,
            horizon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_time::{BuiltinLeapSeconds, JulianPair, normalize};
    use std::f64::consts::PI;

    fn scales() -> TimeScales {
        let utc = JulianPair::new(2_452_878.0, -0.473_854_469_791_666_7);
        normalize(utc, -0.349_518_611_406_224_1, &BuiltinLeapSeconds).unwrap()
    }

    fn frame(lat: f64, xp: f64, yp: f64) -> SiteFrame {
        SiteFrame::new(
            &ObserverSite::new(0.169_509_099_667_322_4, lat, 200.0),
            Ellipsoid::Wgs84,
            &EarthOrientation::new(xp, yp),
            &scales(),
        )
    }

    #[test]
    fn no_polar_motion_gives_plain_rotation() {
        let ts = scales();
        let f = frame(0.914, 0.0, 0.0);
        let expected =
            wrap_pi(earth_rotation_angle(ts.ut1) + tio_locator(ts.tt) + 0.169_509_099_667_322_4);
        assert!((wrap_pi(f.local_era - expected)).abs() < 1e-14);
        assert_eq!(f.xpl, 0.0);
        assert!(f.ypl.abs() < 1e-15);
    }

    #[test]
    fn site_frame_reference() {
        let f = SiteFrame::from_angles(
            &ObserverSite::new(-0.527_800_806, -1.234_585_6, 2738.0),
            Ellipsoid::Wgs84,
            &EarthOrientation::new(2.472_307_37e-7, 1.826_404_64e-6),
            3.145_409_71,
            -3.019_743_37e-11,
        );
        assert!((f.local_era - 2.617_608_903_970_400_427).abs() < 1e-12);
        assert!((f.xpl - 0.113_342_741_813_075_295_8e-5).abs() < 1e-17);
        assert!((f.ypl - 0.145_334_759_578_064_620_7e-5).abs() < 1e-17);
        assert!((f.sin_lat - -0.944_011_567_900_321_132_9).abs() < 1e-12);
        assert!((f.cos_lat - 0.329_912_351_497_147_471_1).abs() < 1e-12);
        assert!((f.diurnal_aberration - 0.513_584_366_169_991_352_9e-6).abs() < 1e-15);
        assert!(!f.at_pole);
    }

    #[test]
    fn diurnal_speed_matches_latitude() {
        let f = frame(0.914, 1e-6, 2e-6);
        let v = f.diurnal_aberration * C_M_PER_S;
        assert!((v - 465.1 * 0.914_f64.cos()).abs() < 2.0, "{v} m/s");
    }

    #[test]
    fn star_on_meridian_due_south() {
        // Equatorial star at the local ERA transits due south.
        let f = SiteFrame {
            diurnal_aberration: 0.0,
            ..frame(0.914, 0.0, 0.0)
        };
        let h = f.to_horizon(f.local_era, 0.0);
        assert!((f.azimuth(&h) - PI).abs() < 1e-12);
        let zd = h[0].hypot(h[1]).atan2(h[2]);
        assert!((zd - 0.914).abs() < 1e-12);
        let (ha, dec) = f.hour_angle_declination(&h);
        assert!(ha.abs() < 1e-12 && dec.abs() < 1e-12);
        assert!((wrap_pi(f.right_ascension(ha) - f.local_era)).abs() < 1e-12);
    }

    #[test]
    fn hour_angle_grows_westward() {
        let f = SiteFrame {
            diurnal_aberration: 0.0,
            ..frame(0.914, 0.0, 0.0)
        };
        let h = f.to_horizon(f.local_era - 0.3, 0.2);
        let (ha, dec) = f.hour_angle_declination(&h);
        assert!((ha - 0.3).abs() < 1e-12);
        assert!((dec - 0.2).abs() < 1e-12);
        // Western sky.
        assert!(f.azimuth(&h) > PI);
    }

    #[test]
    fn pole_has_zero_azimuth() {
        let f = frame(FRAC_PI_2, 0.0, 0.0);
        assert!(f.at_pole);
        let place = IntermediatePlace {
            direction: spherical_to_cartesian(1.0, 0.5),
            ra: 1.0,
            dec: 0.5,
            equation_of_origins: 0.0,
        };
        let top = TopocentricPlace::observe(&place, &f);
        assert_eq!(top.azimuth, 0.0);
        assert!((top.zenith_distance - (FRAC_PI_2 - 0.5)).abs() < 1e-5);
    }
}
