pub mod autopilot;

pub use autopilot::AutopilotDriver;
