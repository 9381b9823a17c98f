//! Stage 1: time-scale normalisation.

use meridian_time::{LeapSecondProvider, TimeScales, normalize};

use crate::error::EngineError;
use crate::types::ObservationTime;

/// Convert the request's UTC and ΔUT1 into TAI, TT and UT1.
pub fn normalize_time(
    time: &ObservationTime,
    leap: &dyn LeapSecondProvider,
) -> Result<TimeScales, EngineError> {
    Ok(normalize(time.utc(), time.dut1, leap)?)
}
