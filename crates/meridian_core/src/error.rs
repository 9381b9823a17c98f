//! Engine error type.

use meridian_time::TimeError;
use thiserror::Error;

/// Errors from request validation, engine construction or the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Time argument non-finite or outside the supported range.
    #[error("invalid time: {field} = {value} ({reason})")]
    InvalidTimeRange {
        field: &'static str,
        value: f64,
        reason: String,
    },
    /// Site or polar-motion argument non-finite or out of range.
    #[error("invalid geodetic input: {field} = {value} ({reason})")]
    InvalidGeodeticInput {
        field: &'static str,
        value: f64,
        reason: String,
    },
    /// Weather or wavelength argument out of range.
    #[error("invalid atmosphere: {field} = {value} ({reason})")]
    InvalidAtmosphere {
        field: &'static str,
        value: f64,
        reason: String,
    },
    /// Catalog position, motion or parallax invalid.
    #[error("invalid star: {field} = {value} ({reason})")]
    InvalidStar {
        field: &'static str,
        value: f64,
        reason: String,
    },
    /// A pipeline output came out NaN or infinite.
    #[error("numeric degeneracy: {0}")]
    NumericDegenerate(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("kernel load error: {0}")]
    KernelLoad(String),
}

impl EngineError {
    pub(crate) fn time(field: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidTimeRange {
            field,
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn geodetic(field: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidGeodeticInput {
            field,
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn atmosphere(field: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidAtmosphere {
            field,
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn star(field: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidStar {
            field,
            value,
            reason: reason.into(),
        }
    }
}

impl From<TimeError> for EngineError {
    fn from(e: TimeError) -> Self {
        match e {
            TimeError::LskParse(_) | TimeError::EopParse(_) | TimeError::Io(_) => {
                Self::KernelLoad(e.to_string())
            }
            TimeError::Dut1OutOfRange(v) => Self::time("dut1", v, e.to_string()),
            TimeError::DayFractionOutOfRange(v) => Self::time("utc2", v, e.to_string()),
            TimeError::NonFinite(field) => Self::time(field, f64::NAN, "must be finite"),
            TimeError::OutOfRange { year, .. } => Self::time("utc", f64::from(year), e.to_string()),
            other => Self::time("utc", f64::NAN, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_lower_case_kind_then_detail() {
        let e = EngineError::atmosphere("relative_humidity", 1.5, "must be within [0, 1]");
        assert_eq!(
            e.to_string(),
            "invalid atmosphere: relative_humidity = 1.5 (must be within [0, 1])"
        );
        assert_eq!(
            EngineError::InvalidConfig("bad").to_string(),
            "invalid config: bad"
        );
    }

    #[test]
    fn time_errors_map_to_engine_errors() {
        assert!(matches!(
            EngineError::from(TimeError::LskParse("x".into())),
            EngineError::KernelLoad(_)
        ));
        assert!(matches!(
            EngineError::from(TimeError::OutOfRange { year: 2150, min: 1960, max: 2100 }),
            EngineError::InvalidTimeRange { field: "utc", value, .. } if value == 2150.0
        ));
        assert!(matches!(
            EngineError::from(TimeError::NonFinite("dut1")),
            EngineError::InvalidTimeRange { field: "dut1", .. }
        ));
        assert!(matches!(
            EngineError::from(TimeError::DayFractionOutOfRange(1.5)),
            EngineError::InvalidTimeRange { field: "utc2", value, .. } if value == 1.5
        ));
        assert!(matches!(
            EngineError::from(TimeError::Pre1972Utc),
            EngineError::InvalidTimeRange { .. }
        ));
    }
}
