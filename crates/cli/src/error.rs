//! Error types for the lapline CLI

use lapline_shared::TuningError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("unknown driver '{0}' (expected one of: {drivers})", drivers = crate::DRIVER_NAMES.join(", "))]
    UnknownDriver(String),

    #[error("invalid vehicle tuning: {0}")]
    InvalidTuning(#[from] TuningError),
}
