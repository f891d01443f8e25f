pub mod track;
pub mod physics;
pub mod lap;
pub mod race_loop;
pub mod driver;
pub mod drivers;

pub use driver::*;
pub use lap::*;
pub use physics::*;
pub use race_loop::*;
pub use track::*;
pub use drivers::AutopilotDriver;
