//! CIO-based celestial-to-intermediate transformation.
//!
//! The CIP coordinates X, Y come from the bottom row of the NPB matrix; the
//! CIO locator s positions the Celestial Intermediate Origin on the CIP
//! equator. Together they give the GCRS → CIRS matrix and the equation of
//! the origins (ERA − GAST).
//!
//! Source: IERS Conventions 2010, Ch. 5, Eqs. 5.6-5.10 and Table 5.2d.
//! Public domain (IAU standard).

use meridian_time::JulianPair;

use crate::matrix::{IDENTITY, Mat3, rotate_y, rotate_z};
use crate::nutation::fundamental_arguments;
use crate::precession::ARCSEC_TO_RAD;

/// Microarcseconds to radians.
const UAS_TO_RAD: f64 = ARCSEC_TO_RAD * 1e-6;

/// Polynomial part of s + XY/2, µas, powers 0..=5 of t.
const S_POLY: [f64; 6] = [94.00, 3_808.65, -122.68, -72_574.11, 27.98, 15.62];

/// One periodic term: multipliers of `[l, l', F, D, Ω]`, then sine and
/// cosine amplitudes in µas.
struct Term {
    n: [i8; 5],
    sin: f64,
    cos: f64,
}

const fn term(n: [i8; 5], sin: f64, cos: f64) -> Term {
    Term { n, sin, cos }
}

// Dominant terms of the s + XY/2 series; every omitted term is below 1 µas.
#[rustfmt::skip]
static S0: [Term; 10] = [
    term([0, 0, 0,  0, 1], -2_640.73,  0.39),
    term([0, 0, 0,  0, 2],    -63.53,  0.02),
    term([0, 0, 2, -2, 3],    -11.75, -0.01),
    term([0, 0, 2, -2, 1],    -11.21, -0.01),
    term([0, 0, 2, -2, 2],      4.57,  0.00),
    term([0, 0, 2,  0, 3],     -2.02,  0.00),
    term([0, 0, 2,  0, 1],     -1.98,  0.00),
    term([0, 0, 0,  0, 3],      1.72,  0.00),
    term([0, 1, 0,  0, 1],      1.41,  0.01),
    term([0, 1, 0,  0, -1],     1.26,  0.01),
];

#[rustfmt::skip]
static S1: [Term; 3] = [
    term([0, 0, 0,  0, 2], -0.07,  3.57),
    term([0, 0, 0,  0, 1],  1.73, -0.03),
    term([0, 0, 2, -2, 3],  0.00,  0.48),
];

#[rustfmt::skip]
static S2: [Term; 7] = [
    term([0, 0, 0,  0, 1], 743.52, -0.17),
    term([0, 0, 2, -2, 2],  56.91,  0.06),
    term([0, 0, 2,  0, 2],   9.84, -0.01),
    term([0, 0, 0,  0, 2],  -8.85,  0.01),
    term([0, 1, 0,  0, 0],  -6.38, -0.05),
    term([1, 0, 0,  0, 0],  -3.07,  0.00),
    term([0, 1, 2, -2, 2],   2.23,  0.00),
];

#[rustfmt::skip]
static S3: [Term; 3] = [
    term([0, 0, 0,  0, 1],  0.30, -23.42),
    term([0, 0, 2, -2, 2], -0.03,  -1.46),
    term([0, 0, 2,  0, 2], -0.01,  -0.25),
];

#[rustfmt::skip]
static S4: [Term; 1] = [
    term([0, 0, 0, 0, 1], -0.26, -0.01),
];

fn series(terms: &[Term], fa: &[f64; 5]) -> f64 {
    terms
        .iter()
        .rev()
        .map(|term| {
            let arg: f64 = term.n.iter().zip(fa).map(|(&n, &a)| n as f64 * a).sum();
            let (s, c) = arg.sin_cos();
            term.sin * s + term.cos * c
        })
        .sum()
}

/// CIP X, Y from a bias-precession-nutation matrix (its third row).
pub fn cip_xy(rbpn: &Mat3) -> (f64, f64) {
    (rbpn[2][0], rbpn[2][1])
}

/// CIO locator s in radians, given the CIP coordinates X, Y at `tt`.
///
/// IAU 2006 polynomial plus the periodic terms above 1 µas; accurate to a
/// few µas over the current century.
pub fn cio_locator(tt: JulianPair, x: f64, y: f64) -> f64 {
    let t = tt.julian_centuries_since_j2000();
    let fa = fundamental_arguments(t);

    let w0 = S_POLY[0] + series(&S0, &fa);
    let w1 = S_POLY[1] + series(&S1, &fa);
    let w2 = S_POLY[2] + series(&S2, &fa);
    let w3 = S_POLY[3] + series(&S3, &fa);
    let w4 = S_POLY[4] + series(&S4, &fa);
    let w5 = S_POLY[5];

    let s_plus_xy2 = w0 + (w1 + (w2 + (w3 + (w4 + w5 * t) * t) * t) * t) * t;
    s_plus_xy2 * UAS_TO_RAD - x * y / 2.0
}

/// Celestial-to-intermediate matrix from X, Y and s.
pub fn celestial_to_intermediate(x: f64, y: f64, s: f64) -> Mat3 {
    let r2 = x * x + y * y;
    let e = if r2 > 0.0 { y.atan2(x) } else { 0.0 };
    let d = (r2 / (1.0 - r2)).sqrt().atan();

    let mut r = IDENTITY;
    rotate_z(e, &mut r);
    rotate_y(d, &mut r);
    rotate_z(-(e + s), &mut r);
    r
}

/// Equation of the origins (ERA − GAST) in radians, from the NPB matrix
/// and the CIO locator.
pub fn equation_of_origins(rnpb: &Mat3, s: f64) -> f64 {
    let x = rnpb[2][0];
    let ax = x / (1.0 + rnpb[2][2]);
    let xs = 1.0 - ax * x;
    let ys = -ax * rnpb[2][1];
    let zs = -x;
    let p = rnpb[0][0] * xs + rnpb[0][1] * ys + rnpb[0][2] * zs;
    let q = rnpb[1][0] * xs + rnpb[1][1] * ys + rnpb[1][2] * zs;
    if p != 0.0 || q != 0.0 { s - q.atan2(p) } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precession::bias_precession_nutation_matrix;

    #[test]
    fn cio_locator_reference() {
        let s = cio_locator(
            JulianPair::new(2_400_000.5, 53_736.0),
            0.579_130_848_670_601_1e-3,
            0.402_057_981_673_296_121_9e-4,
        );
        assert!((s - -0.122_003_221_307_646_311_7e-7).abs() < 5e-11, "s = {s}");
    }

    #[test]
    fn c2i_matrix_reference() {
        let r = celestial_to_intermediate(
            0.579_130_848_670_601_1e-3,
            0.402_057_981_673_296_121_9e-4,
            -0.122_004_084_847_227_197_8e-7,
        );
        let expected = [
            [
                0.999_999_832_303_715_713_8,
                0.558_198_486_916_849_914_9e-9,
                -0.579_130_849_161_128_218e-3,
            ],
            [
                -0.238_426_164_267_044_031_7e-7,
                0.999_999_999_191_746_896_4,
                -0.402_057_911_016_966_893_1e-4,
            ],
            [
                0.579_130_848_670_601_1e-3,
                0.402_057_981_673_296_121_9e-4,
                0.999_999_831_495_462_759,
            ],
        ];
        for i in 0..3 {
            for j in 0..3 {
                assert!((r[i][j] - expected[i][j]).abs() < 1e-12, "[{i}][{j}] = {}", r[i][j]);
            }
        }
    }

    #[test]
    fn equation_of_origins_reference() {
        let rnpb = [
            [
                0.999_998_944_047_610_360_8,
                -0.133_288_176_124_001_151_8e-2,
                -0.579_076_743_473_008_509_7e-3,
            ],
            [
                0.133_285_825_430_895_445_3e-2,
                0.999_999_110_904_450_594_4,
                -0.409_778_271_040_155_575_9e-4,
            ],
            [
                0.579_130_847_216_815_332e-3,
                0.402_059_566_159_399_439_6e-4,
                0.999_999_831_495_457_236_5,
            ],
        ];
        let eo = equation_of_origins(&rnpb, -0.122_004_084_847_227_197_8e-7);
        assert!((eo - -0.133_288_271_513_074_460_6e-2).abs() < 1e-14, "eo = {eo}");
    }

    #[test]
    fn cip_row_is_unit_and_s_is_tiny() {
        let tt = JulianPair::new(2_452_878.0, -0.47);
        let rnpb = bias_precession_nutation_matrix(tt);
        let (x, y) = cip_xy(&rnpb);
        let s = cio_locator(tt, x, y);
        // s stays below 0.1″ this century.
        assert!(s.abs() < 0.1 * ARCSEC_TO_RAD, "s = {s}");
        let m = celestial_to_intermediate(x, y, s);
        assert!((m[2][0] - x).abs() < 1e-18 && (m[2][1] - y).abs() < 1e-18);
    }
}
