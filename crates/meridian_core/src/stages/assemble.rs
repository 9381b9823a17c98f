//! Stage 6: observed coordinates from the refracted zenith distance.

use meridian_frames::matrix::Vec3;

use crate::error::EngineError;
use crate::stages::orientation::{SiteFrame, TopocentricPlace};
use crate::types::ObservedCoordinates;

/// Horizon vector with the geometric direction's azimuth and the observed
/// zenith distance.
///
/// At the zenith the azimuth is undefined and the vector points straight
/// up whatever the horizontal direction.
pub fn refracted_horizon(geometric: &Vec3, zenith_distance: f64) -> Vec3 {
    let [x, y, _] = *geometric;
    let r = x.hypot(y);
    let (ux, uy) = if r > 0.0 { (x / r, y / r) } else { (-1.0, 0.0) };
    let (s, c) = zenith_distance.sin_cos();
    [ux * s, uy * s, c]
}

/// Final observed coordinates.
///
/// The refracted vector keeps the geometric horizontal direction, so the
/// hour angle stays defined at a polar site where the azimuth is reported
/// as zero.
pub fn assemble(
    topocentric: &TopocentricPlace,
    zenith_distance: f64,
    frame: &SiteFrame,
    equation_of_origins: f64,
) -> Result<ObservedCoordinates, EngineError> {
    let horizon = refracted_horizon(&topocentric.horizon, zenith_distance);
    let (hour_angle, declination) = frame.hour_angle_declination(&horizon);

    let observed = ObservedCoordinates {
        azimuth: frame.azimuth(&horizon),
        zenith_distance,
        hour_angle,
        declination,
        right_ascension: frame.right_ascension(hour_angle),
        equation_of_origins,
    };

    for (name, value) in [
        ("azimuth", observed.azimuth),
        ("zenith_distance", observed.zenith_distance),
        ("hour_angle", observed.hour_angle),
        ("declination", observed.declination),
        ("right_ascension", observed.right_ascension),
        ("equation_of_origins", observed.equation_of_origins),
    ] {
        if !value.is_finite() {
            return Err(EngineError::NumericDegenerate(format!("{name} is {value}")));
        }
    }
    Ok(observed)
}
