//! Constants and plain data types shared by the simulation core and its shells.

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::*;
pub use types::*;
