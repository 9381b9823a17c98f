//! Integration tests against a real NAIF leap-second kernel (naif0012.tls).
//!
//! Skips gracefully when the kernel is absent.

use std::path::Path;

use meridian_time::{
    BuiltinLeapSeconds, LeapSecondKernel, LeapSecondProvider, UtcTime, normalize,
};

fn lsk_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../kernels/data/naif0012.tls")
}

fn load_lsk() -> Option<LeapSecondKernel> {
    let path = lsk_path();
    if !path.exists() {
        eprintln!("Skipping: LSK not found at {}", path.display());
        return None;
    }
    Some(LeapSecondKernel::load(&path).expect("should load naif0012.tls"))
}

#[test]
fn load_real_lsk() {
    let Some(lsk) = load_lsk() else { return };

    // naif0012.tls has 28 entries: 10 s in 1972 through 37 s in 2017.
    assert!(
        lsk.data().leap_seconds.len() >= 28,
        "expected >= 28 leap seconds, got {}",
        lsk.data().leap_seconds.len()
    );
    let last = lsk.data().leap_seconds.last().unwrap();
    assert_eq!(last.tai_minus_utc, 37.0);
    assert!((lsk.data().delta_t_a - 32.184).abs() < 1e-12);
}

#[test]
fn real_lsk_agrees_with_builtin_table() {
    let Some(lsk) = load_lsk() else { return };

    for year in 1972..=2030 {
        for month in [1, 6, 7, 12] {
            let a = lsk.tai_minus_utc(year, month, 15, 0.0).unwrap();
            let b = BuiltinLeapSeconds.tai_minus_utc(year, month, 15, 0.0).unwrap();
            assert_eq!(a, b, "{year}-{month:02}-15");
        }
    }
}

#[test]
fn real_lsk_normalizes_observation_epoch() {
    let Some(lsk) = load_lsk() else { return };

    let utc: UtcTime = "2024-06-15T00:00:00Z".parse().unwrap();
    let ts = normalize(utc.to_julian_pair().unwrap(), 0.0, &lsk).unwrap();
    assert_eq!(ts.tai_minus_utc, 37.0);
    assert!((ts.tt.seconds_since(ts.utc) - 69.184).abs() < 1e-6);
    assert_eq!(ts.tt.jd1, 2_460_476.5);
}
