//! IAU 2000B truncated nutation model (77 luni-solar terms).
//!
//! Computes nutation in longitude (Δψ) and obliquity (Δε) with the
//! simplified IAU 2000B model, good to about 1 mas between 1995 and 2050.
//! Planetary nutation is replaced by fixed offsets.
//!
//! Source: McCarthy & Luzum 2003, _Celestial Mechanics and Dynamical
//! Astronomy_ 85, 37-49; IERS Conventions 2010, Chapter 5, Table 5.3b.
//! Fundamental arguments from IERS Conventions 2010, Table 5.2e.
//! Public domain (IAU standard).

use std::f64::consts::TAU;

use crate::precession::ARCSEC_TO_RAD;

/// Arcseconds in a full turn.
const TURN_ARCSEC: f64 = 1_296_000.0;

/// Table units (0.1 µas) to radians.
const UNIT_TO_RAD: f64 = ARCSEC_TO_RAD / 1e7;

/// Fixed offset standing in for planetary nutation in longitude: −0.135 mas.
const DPSI_PLANETARY: f64 = -0.135e-3 * ARCSEC_TO_RAD;

/// Fixed offset standing in for planetary nutation in obliquity: +0.388 mas.
const DEPS_PLANETARY: f64 = 0.388e-3 * ARCSEC_TO_RAD;

/// Compute the five Delaunay fundamental arguments in radians.
///
/// `t` = Julian centuries of TT since J2000.0.
///
/// Returns `[l, l', F, D, Ω]` where:
/// - `l`  = mean anomaly of the Moon
/// - `l'` = mean anomaly of the Sun
/// - `F`  = mean argument of latitude of the Moon
/// - `D`  = mean elongation of the Moon from the Sun
/// - `Ω`  = mean longitude of the ascending node of the Moon
///
/// Polynomial coefficients from IERS Conventions 2010, Table 5.2e.
pub fn fundamental_arguments(t: f64) -> [f64; 5] {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let l = 485_868.249_036 + 1_717_915_923.217_8 * t + 31.879_2 * t2 + 0.051_635 * t3
        - 0.000_244_70 * t4;
    let lp = 1_287_104.793_05 + 129_596_581.048_1 * t - 0.553_2 * t2 + 0.000_136 * t3
        - 0.000_011_49 * t4;
    let f = 335_779.526_232 + 1_739_527_262.847_8 * t - 12.751_2 * t2 - 0.001_037 * t3
        + 0.000_004_17 * t4;
    let d = 1_072_260.703_69 + 1_602_961_601.209_0 * t - 6.370_6 * t2 + 0.006_593 * t3
        - 0.000_031_69 * t4;
    let om = 450_160.398_036 - 6_962_890.543_1 * t + 7.472_2 * t2 + 0.007_702 * t3
        - 0.000_059_39 * t4;

    [l, lp, f, d, om].map(|arcsec| (arcsec % TURN_ARCSEC) * ARCSEC_TO_RAD)
}

/// Delaunay arguments truncated to their linear terms (Simon et al. 1994),
/// as the 2000B model prescribes.
fn linear_arguments(t: f64) -> [f64; 5] {
    [
        485_868.249_036 + 1_717_915_923.217_8 * t,
        1_287_104.793_05 + 129_596_581.048_1 * t,
        335_779.526_232 + 1_739_527_262.847_8 * t,
        1_072_260.703_69 + 1_602_961_601.209_0 * t,
        450_160.398_036 - 6_962_890.543_1 * t,
    ]
    .map(|arcsec| (arcsec % TURN_ARCSEC) * ARCSEC_TO_RAD)
}

/// IAU 2000B luni-solar nutation term coefficients.
///
/// Each row: `[nl, nl', nF, nD, nΩ, S, Ṡ, C', C, Ċ, S']`. Longitude
/// contributes `(S + Ṡ·t)·sin + C'·cos`, obliquity `(C + Ċ·t)·cos + S'·sin`.
/// Amplitudes in 0.1 µas (1e-7 arcsec); the out-of-phase amplitudes C', S'
/// are carried for the ten largest terms.
///
/// Source: IERS Conventions 2010, Table 5.3b (77 terms).
#[rustfmt::skip]
static NUTATION_COEFFS: [[i64; 11]; 77] = [
    //  nl  nl'  nF   nD   nΩ           S        Ṡ      C'           C       Ċ      S'
    [   0,   0,   0,   0,   1,  -172064161, -174666,  33386,   92052331,   9086,  15377],
    [   0,   0,   2,  -2,   2,   -13170906,   -1675, -13696,    5730336,  -3015,  -4587],
    [   0,   0,   2,   0,   2,    -2276413,    -234,   2796,     978459,   -485,   1374],
    [   0,   0,   0,   0,   2,     2074554,     207,   -698,    -897492,    470,   -291],
    [   0,   1,   0,   0,   0,     1475877,   -3633,  11817,      73871,   -184,  -1924],
    [   0,   1,   2,  -2,   2,     -516821,    1226,   -524,     224386,   -677,   -174],
    [   1,   0,   0,   0,   0,      711159,      73,   -872,      -6750,      0,    358],
    [   0,   0,   2,   0,   1,     -387298,    -367,    380,     200728,     18,    318],
    [   1,   0,   2,   0,   2,     -301461,     -36,    816,     129025,    -63,    367],
    [   0,  -1,   2,  -2,   2,      215829,    -494,    111,     -95929,    299,    132],
    [   0,   0,   2,  -2,   1,      128227,     137,      0,     -68982,     -9,      0],
    [  -1,   0,   2,   0,   2,      123457,      11,      0,     -53311,     32,      0],
    [  -1,   0,   0,   2,   0,      156994,      10,      0,      -1235,      0,      0],
    [   1,   0,   0,   0,   1,       63110,      63,      0,     -33228,      0,      0],
    [  -1,   0,   0,   0,   1,      -57976,     -63,      0,      31429,      0,      0],
    [  -1,   0,   2,   2,   2,      -59641,     -11,      0,      25543,    -11,      0],
    [   1,   0,   2,   0,   1,      -51613,     -42,      0,      26366,      0,      0],
    [  -2,   0,   2,   0,   1,       45893,      50,      0,     -24236,    -10,      0],
    [   0,   0,   0,   2,   0,       63384,      11,      0,      -1220,      0,      0],
    [   0,   0,   2,   2,   2,      -38571,      -1,      0,      16452,    -11,      0],
    [   0,  -2,   2,  -2,   2,       32481,       0,      0,     -13870,      0,      0],
    [  -2,   0,   0,   2,   0,      -47722,       0,      0,        477,      0,      0],
    [   2,   0,   2,   0,   2,      -31046,      -1,      0,      13238,    -11,      0],
    [   1,   0,   2,  -2,   2,       28593,       0,      0,     -12338,     10,      0],
    [  -1,   0,   2,   0,   1,       20441,      21,      0,     -10758,      0,      0],
    [   2,   0,   0,   0,   0,       29243,       0,      0,       -609,      0,      0],
    [   0,   0,   2,   0,   0,       25887,       0,      0,       -550,      0,      0],
    [   0,   1,   0,   0,   1,      -14053,     -25,      0,       8551,     -2,      0],
    [  -1,   0,   0,   2,   1,       15164,      10,      0,      -8001,      0,      0],
    [   0,   2,   2,  -2,   2,      -15794,      72,      0,       6850,    -42,      0],
    [   0,   0,  -2,   2,   0,       21783,       0,      0,       -167,      0,      0],
    [   1,   0,   0,  -2,   1,      -12873,     -10,      0,       6953,      0,      0],
    [   0,  -1,   0,   0,   1,      -12654,      11,      0,       6415,      0,      0],
    [  -1,   0,   2,   2,   1,      -10204,       0,      0,       5222,      0,      0],
    [   0,   2,   0,   0,   0,       16707,     -85,      0,        168,     -1,      0],
    [   1,   0,   2,   2,   2,       -7691,       0,      0,       3268,      0,      0],
    [  -2,   0,   2,   0,   0,      -11024,       0,      0,        104,      0,      0],
    [   0,   1,   2,   0,   2,        7566,     -21,      0,      -3250,      0,      0],
    [   0,   0,   2,   2,   1,       -6637,     -11,      0,       3353,      0,      0],
    [   0,  -1,   2,   0,   2,       -7141,      21,      0,       3070,      0,      0],
    [   0,   0,   0,   2,   1,       -6302,     -11,      0,       3272,      0,      0],
    [   1,   0,   2,  -2,   1,        5800,      10,      0,      -3045,      0,      0],
    [   2,   0,   2,  -2,   2,        6443,       0,      0,      -2768,      0,      0],
    [  -2,   0,   0,   2,   1,       -5774,     -11,      0,       3041,      0,      0],
    [   2,   0,   2,   0,   1,       -5350,       0,      0,       2695,      0,      0],
    [   0,  -1,   2,  -2,   1,       -4752,     -11,      0,       2719,      0,      0],
    [   0,   0,   0,  -2,   1,       -4940,     -11,      0,       2720,      0,      0],
    [  -1,  -1,   0,   2,   0,        7350,       0,      0,        -51,      0,      0],
    [   2,   0,   0,  -2,   1,       -4803,     -11,      0,       2556,      0,      0],
    [   1,   0,   0,   2,   0,       -7677,       0,      0,        462,      0,      0],
    [   0,   1,   2,  -2,   1,        5417,       0,      0,      -2520,      0,      0],
    [   1,  -1,   0,   0,   0,        6624,       0,      0,       -468,      0,      0],
    [  -2,   0,   2,   0,   2,       -5433,       0,      0,       2334,      0,      0],
    [   3,   0,   2,   0,   2,       -4632,       0,      0,       1991,      0,      0],
    [   0,  -1,   0,   2,   0,        6106,       0,      0,       -167,      0,      0],
    [   1,  -1,   2,   0,   2,       -3593,       0,      0,       1556,      0,      0],
    [   0,   0,   0,   1,   0,       -4766,       0,      0,        270,      0,      0],
    [  -1,  -1,   2,   2,   2,       -4095,       0,      0,       1793,      0,      0],
    [  -1,   0,   2,   0,   0,        4229,       0,      0,       -101,      0,      0],
    [   0,  -1,   2,   2,   2,       -3372,       0,      0,       1487,      0,      0],
    [   2,   0,   0,   0,   1,       -3353,       0,      0,       1758,      0,      0],
    [   1,   0,   2,   0,   0,       -3523,       0,      0,        246,      0,      0],
    [   1,   1,   0,   0,   0,       -3613,       0,      0,        329,      0,      0],
    [  -1,   0,   2,  -2,   1,        3522,       0,      0,      -1830,      0,      0],
    [   2,   0,   0,   0,  -1,        3312,       0,      0,      -1730,      0,      0],
    [   0,   0,  -2,   2,   1,       -3142,       0,      0,       1704,      0,      0],
    [   0,   1,   0,   0,  -1,       -2927,       0,      0,       1564,      0,      0],
    [   0,   1,   2,   0,   1,       -2887,       0,      0,       1401,      0,      0],
    [   0,  -1,   2,   0,   1,        2451,       0,      0,      -1200,      0,      0],
    [   2,   0,  -2,   0,   0,       -2790,       0,      0,        410,      0,      0],
    [  -1,   0,   0,   2,  -1,        2145,       0,      0,      -1154,      0,      0],
    [   0,   0,   2,  -2,   0,        2816,       0,      0,        286,      0,      0],
    [   0,   1,   0,  -2,   0,        2700,       0,      0,       -258,      0,      0],
    [   1,   0,   0,  -1,   0,       -2330,       0,      0,        -37,      0,      0],
    [   0,   0,   0,   0,   2,        2283,       0,      0,      -1039,      0,      0],
    [   1,   0,  -2,   0,   0,       -2321,       0,      0,        284,      0,      0],
    [  -1,   0,   0,   1,   1,       -2049,       0,      0,       1112,      0,      0],
];

/// IAU 2000B nutation: returns (Δψ, Δε) in radians.
///
/// # Arguments
/// * `t` — Julian centuries of TT since J2000.0
pub fn nutation_iau2000b(t: f64) -> (f64, f64) {
    let args = linear_arguments(t);

    let mut dpsi: f64 = 0.0;
    let mut deps: f64 = 0.0;

    // Smallest terms first.
    for row in NUTATION_COEFFS.iter().rev() {
        let arg = (row[0] as f64 * args[0]
            + row[1] as f64 * args[1]
            + row[2] as f64 * args[2]
            + row[3] as f64 * args[3]
            + row[4] as f64 * args[4])
            % TAU;
        let (sin_arg, cos_arg) = arg.sin_cos();

        dpsi += (row[5] as f64 + row[6] as f64 * t) * sin_arg + row[7] as f64 * cos_arg;
        deps += (row[8] as f64 + row[9] as f64 * t) * cos_arg + row[10] as f64 * sin_arg;
    }

    (
        dpsi * UNIT_TO_RAD + DPSI_PLANETARY,
        deps * UNIT_TO_RAD + DEPS_PLANETARY,
    )
}
