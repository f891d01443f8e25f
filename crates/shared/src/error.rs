use thiserror::Error;

/// Rejected [`VehicleTuning`](crate::VehicleTuning) values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("max reverse speed must be negative, got {0}")]
    ReverseSpeedNotNegative(f32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown track '{0}' (expected rectangular or rounded)")]
pub struct ParseTrackError(pub String);
