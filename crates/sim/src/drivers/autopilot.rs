use lapline_shared::*;
use glam::Vec2;

use crate::driver::Driver;
use crate::physics::VehicleState;
use crate::track::TrackGeometry;

/// Cruise speed on the racing line.
pub const AUTOPILOT_TARGET_SPEED: f32 = 10.0;
/// How many racing-line samples ahead of the nearest one to aim at.
pub const AUTOPILOT_LOOKAHEAD: usize = 4;
/// Heading error (degrees) tolerated before steering.
pub const AUTOPILOT_HEADING_DEADBAND: f32 = 2.0;
/// Brake only once this far above the target speed.
pub const AUTOPILOT_BRAKE_MARGIN: f32 = 2.0;
/// Above this heading error the car is pointing the wrong way; slow down to turn.
pub const AUTOPILOT_SHARP_ERROR: f32 = 45.0;

/// Pure pursuit around the track's racing line.
///
/// Steers bang-bang toward a point a few samples ahead of the closest racing-line sample
/// and holds a cruise speed with throttle and brake.
pub struct AutopilotDriver {
    pub target_speed: f32,
    pub lookahead: usize,
    line: Vec<Vec2>,
    line_track: Option<TrackSelection>,
}

impl AutopilotDriver {
    pub fn new() -> Self {
        Self::with_target_speed(AUTOPILOT_TARGET_SPEED)
    }

    pub fn with_target_speed(target_speed: f32) -> Self {
        Self {
            target_speed,
            lookahead: AUTOPILOT_LOOKAHEAD,
            line: Vec::new(),
            line_track: None,
        }
    }

    fn aim_point(&self, position: Vec2) -> Option<Vec2> {
        let nearest = self
            .line
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(i, _)| i)?;
        self.line
            .get((nearest + self.lookahead) % self.line.len())
            .copied()
    }
}

impl Default for AutopilotDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for AutopilotDriver {
    fn name(&self) -> &str {
        "autopilot"
    }

    fn drive(&mut self, vehicle: &VehicleState, track: &dyn TrackGeometry) -> Controls {
        if self.line_track != Some(track.selection()) {
            self.line = track.racing_line();
            self.line_track = Some(track.selection());
        }

        let Some(aim) = self.aim_point(vehicle.position) else {
            return Controls::none();
        };

        let to_aim = aim - vehicle.position;
        let desired = to_aim.x.atan2(to_aim.y).to_degrees();
        let error = heading_error(desired, vehicle.heading);

        let cruise = if error.abs() > AUTOPILOT_SHARP_ERROR {
            self.target_speed * 0.5
        } else {
            self.target_speed
        };

        Controls {
            accelerate: vehicle.speed < cruise,
            brake: vehicle.speed > cruise + AUTOPILOT_BRAKE_MARGIN,
            turn_left: error > AUTOPILOT_HEADING_DEADBAND,
            turn_right: error < -AUTOPILOT_HEADING_DEADBAND,
        }
    }
}

/// Signed shortest rotation from `current` to `target`, degrees in `(-180, 180]`.
/// Positive means turn left (increase heading).
pub fn heading_error(target: f32, current: f32) -> f32 {
    let diff = (target - current).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}
