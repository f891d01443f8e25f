use lapline_shared::Controls;

use crate::physics::VehicleState;
use crate::track::TrackGeometry;

/// Something that holds down controls each tick: a scripted pilot in headless runs.
pub trait Driver: Send {
    fn name(&self) -> &str;
    fn drive(&mut self, vehicle: &VehicleState, track: &dyn TrackGeometry) -> Controls;
}

/// Driver that touches nothing - useful for testing.
pub struct IdleDriver;

impl Driver for IdleDriver {
    fn name(&self) -> &str {
        "idle"
    }

    fn drive(&mut self, _vehicle: &VehicleState, _track: &dyn TrackGeometry) -> Controls {
        Controls::none()
    }
}

/// Flat out in a straight line until something stops it.
pub struct FullThrottleDriver;

impl Driver for FullThrottleDriver {
    fn name(&self) -> &str {
        "full_throttle"
    }

    fn drive(&mut self, _vehicle: &VehicleState, _track: &dyn TrackGeometry) -> Controls {
        Controls {
            accelerate: true,
            ..Controls::none()
        }
    }
}
