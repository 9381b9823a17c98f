//! IAU 2006 bias-precession in the Fukushima-Williams parameterisation.
//!
//! The four angles γ̄, φ̄, ψ̄, ε_A carry the frame bias, so the matrix built
//! from them rotates GCRS directly to the mean equator and equinox of date.
//! Adding nutation to ψ̄ and ε_A gives the full NPB matrix.
//!
//! Source: Capitaine, Wallace & Chapront 2003; Hilton et al. 2006,
//! _Celestial Mechanics and Dynamical Astronomy_ 94, 351-367.
//! Also published in IERS Conventions 2010, Ch. 5. Public domain (IAU standard).

use meridian_time::JulianPair;

use crate::matrix::{IDENTITY, Mat3, rotate_x, rotate_z};
use crate::nutation::nutation_iau2000b;

/// Arcseconds to radians.
pub(crate) const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / 648_000.0;

/// Fukushima-Williams bias-precession angles, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FwAngles {
    /// F-W angle γ̄.
    pub gamb: f64,
    /// F-W angle φ̄.
    pub phib: f64,
    /// F-W angle ψ̄.
    pub psib: f64,
    /// Mean obliquity ε_A.
    pub epsa: f64,
}

/// Mean obliquity of the ecliptic, IAU 2006, radians.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn mean_obliquity(t: f64) -> f64 {
    (84_381.406
        + (-46.836_769
            + (-0.000_183_1 + (0.002_003_40 + (-0.000_000_576 + (-0.000_000_043_4) * t) * t) * t)
                * t)
            * t)
        * ARCSEC_TO_RAD
}

/// Fukushima-Williams angles at `t` Julian centuries of TT since J2000.0.
pub fn fw_angles(t: f64) -> FwAngles {
    let gamb = (-0.052_928
        + (10.556_378
            + (0.493_204_4 + (-0.000_312_38 + (-0.000_002_788 + 0.000_000_026_0 * t) * t) * t) * t)
            * t)
        * ARCSEC_TO_RAD;
    let phib = (84_381.412_819
        + (-46.811_016
            + (0.051_126_8 + (0.000_532_89 + (-0.000_000_440 + (-0.000_000_017_6) * t) * t) * t)
                * t)
            * t)
        * ARCSEC_TO_RAD;
    let psib = (-0.041_775
        + (5_038.481_484
            + (1.558_417_5 + (-0.000_185_22 + (-0.000_026_452 + (-0.000_000_014_8) * t) * t) * t)
                * t)
            * t)
        * ARCSEC_TO_RAD;

    FwAngles {
        gamb,
        phib,
        psib,
        epsa: mean_obliquity(t),
    }
}

/// Rotation matrix from Fukushima-Williams angles:
/// `Rx(−ε)·Rz(−ψ)·Rx(φ̄)·Rz(γ̄)`.
///
/// With (ψ̄, ε_A) this is the bias-precession matrix; with
/// (ψ̄ + Δψ, ε_A + Δε) it is the bias-precession-nutation matrix.
pub fn fw_matrix(gamb: f64, phib: f64, psi: f64, eps: f64) -> Mat3 {
    let mut r = IDENTITY;
    rotate_z(gamb, &mut r);
    rotate_x(phib, &mut r);
    rotate_z(-psi, &mut r);
    rotate_x(-eps, &mut r);
    r
}

/// Bias-precession matrix, GCRS to mean of date.
pub fn bias_precession_matrix(tt: JulianPair) -> Mat3 {
    let fw = fw_angles(tt.julian_centuries_since_j2000());
    fw_matrix(fw.gamb, fw.phib, fw.psib, fw.epsa)
}

/// Bias-precession-nutation matrix, GCRS to true equator and equinox of date.
///
/// Nutation is IAU 2000B with the IAU 2006 adjustments for the secular
/// change in J2 and the revised obliquity rate.
pub fn bias_precession_nutation_matrix(tt: JulianPair) -> Mat3 {
    let t = tt.julian_centuries_since_j2000();
    let fw = fw_angles(t);
    let (dpsi, deps) = nutation_iau2000b(t);

    let fj2 = -2.7774e-6 * t;
    let dpsi = dpsi * (1.0 + 0.4697e-6 + fj2);
    let deps = deps * (1.0 + fj2);

    fw_matrix(fw.gamb, fw.phib, fw.psib + dpsi, fw.epsa + deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{mat_mul, transpose};

    fn centuries(jd1: f64, jd2: f64) -> f64 {
        JulianPair::new(jd1, jd2).julian_centuries_since_j2000()
    }

    #[test]
    fn obliquity_reference() {
        let eps = mean_obliquity(centuries(2_400_000.5, 54_388.0));
        assert!((eps - 0.409_074_922_938_725_820_4).abs() < 1e-14, "{eps}");
    }

    #[test]
    fn fw_angles_reference() {
        let fw = fw_angles(centuries(2_400_000.5, 50_123.999_9));
        assert!((fw.gamb - -0.224_338_767_099_799_569e-5).abs() < 1e-16);
        assert!((fw.phib - 0.409_101_460_239_131_280_8).abs() < 1e-12);
        assert!((fw.psib - -0.950_195_417_801_303_189_5e-3).abs() < 1e-14);
        assert!((fw.epsa - 0.409_101_431_658_736_749_1).abs() < 1e-12);
    }

    #[test]
    fn fw_matrix_reference() {
        let r = fw_matrix(
            -0.224_338_767_099_799_236_8e-5,
            0.409_101_460_239_131_298_2,
            -0.950_195_417_801_301_509_2e-3,
            0.409_101_431_658_736_747_2,
        );
        let expected = [
            [
                0.999_999_550_517_600_704_7,
                0.869_540_461_734_819_295_7e-3,
                0.377_973_520_186_558_257_1e-3,
            ],
            [
                -0.869_540_472_377_201_603_8e-3,
                0.999_999_621_949_602_716_1,
                -0.136_175_249_688_710_002_6e-6,
            ],
            [
                -0.377_973_495_703_408_279e-3,
                -0.192_488_084_808_761_565_1e-6,
                0.999_999_928_567_997_195_8,
            ],
        ];
        for i in 0..3 {
            for j in 0..3 {
                assert!((r[i][j] - expected[i][j]).abs() < 1e-12, "[{i}][{j}] = {}", r[i][j]);
            }
        }
    }

    #[test]
    fn npb_matrix_is_orthonormal() {
        let m = bias_precession_nutation_matrix(JulianPair::new(2_452_878.0, -0.47));
        let p = mat_mul(&m, &transpose(&m));
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((p[i][j] - expected).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn bias_precession_near_identity_at_j2000() {
        // Only frame bias remains: tens of milliarcseconds.
        let m = bias_precession_matrix(JulianPair::from_jd(2_451_545.0));
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((m[i][j] - expected).abs() < 1e-6);
            }
        }
        assert!(m[0][1].abs() > 1e-8);
    }

    #[test]
    fn precession_rate_about_fifty_arcsec_per_year() {
        // Over one century the CIP x-coordinate grows by ≈ 2003.5″.
        let m = bias_precession_matrix(JulianPair::new(2_451_545.0, 36_525.0));
        let x_arcsec = m[2][0] / ARCSEC_TO_RAD;
        assert!((x_arcsec - 2003.55).abs() < 0.5, "X = {x_arcsec}″");
    }
}
