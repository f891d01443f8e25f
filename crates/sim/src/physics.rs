use lapline_shared::*;
use glam::Vec2;

use crate::track::TrackGeometry;

/// Kinematic state of the player's car.
///
/// `position` is in the ground plane: `.x` is world x, `.y` is world z.
#[derive(Debug, Clone)]
pub struct VehicleState {
    pub position: Vec2,
    /// Degrees, kept in `[0, 360)`.
    pub heading: f32,
    /// Signed: positive is forward along `heading`.
    pub speed: f32,
    pub tuning: VehicleTuning,
    pub dimensions: VehicleDimensions,
    previous_position: Vec2,
    controls: Controls,
}

/// What a single [`VehicleState::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    AtRest,
    /// The candidate position was off track; the car was put back and stopped.
    Collided,
}

impl VehicleState {
    pub fn new(position: Vec2, heading: f32, tuning: VehicleTuning) -> Self {
        Self {
            position,
            heading: normalize_heading(heading),
            speed: 0.0,
            tuning,
            dimensions: VehicleDimensions::default(),
            previous_position: position,
            controls: Controls::none(),
        }
    }

    /// Car parked on the track's start pose.
    pub fn on_grid(track: &dyn TrackGeometry, tuning: VehicleTuning) -> Self {
        let (position, heading) = track.start_pose();
        Self::new(position, heading, tuning)
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Press or release one control. Pressing accelerate releases brake and vice versa.
    pub fn set_control(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Accelerate => {
                self.controls.accelerate = pressed;
                if pressed {
                    self.controls.brake = false;
                }
            }
            Control::Brake => {
                self.controls.brake = pressed;
                if pressed {
                    self.controls.accelerate = false;
                }
            }
            Control::TurnLeft => self.controls.turn_left = pressed,
            Control::TurnRight => self.controls.turn_right = pressed,
        }
    }

    /// Apply a full control set through [`set_control`](Self::set_control).
    pub fn apply_controls(&mut self, controls: Controls) {
        self.set_control(Control::Accelerate, controls.accelerate);
        self.set_control(Control::Brake, controls.brake);
        self.set_control(Control::TurnLeft, controls.turn_left);
        self.set_control(Control::TurnRight, controls.turn_right);
    }

    /// Unit vector along the heading. Heading 0 faces +z, 90 faces +x.
    pub fn forward(&self) -> Vec2 {
        let rad = self.heading.to_radians();
        Vec2::new(rad.sin(), rad.cos())
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            x: self.position.x,
            z: self.position.y,
            heading: self.heading,
            speed: self.speed,
        }
    }

    /// Advance one fixed tick.
    pub fn step(&mut self, track: &dyn TrackGeometry, dt: f32) -> StepOutcome {
        self.previous_position = self.position;

        // Turning
        if self.speed.abs() > TURN_DEADZONE_SPEED {
            let turn_rate = turn_rate_at_speed(&self.tuning, self.speed);
            if self.controls.turn_left {
                self.heading += turn_rate * dt;
            }
            if self.controls.turn_right {
                self.heading -= turn_rate * dt;
            }
        }
        self.heading = normalize_heading(self.heading);

        // Throttle and brakes
        let mut accel = 0.0;
        if self.controls.accelerate {
            accel = self.tuning.acceleration_rate;
        }
        if self.controls.brake {
            if self.speed > BRAKE_SPEED_EPSILON {
                accel -= self.tuning.braking_rate;
            } else if self.speed < -BRAKE_SPEED_EPSILON {
                accel += self.tuning.braking_rate;
            }
        }
        self.speed += accel * dt;

        // Rolling friction, never past zero
        let coasting = !self.controls.accelerate && !self.controls.brake;
        if coasting && self.speed.abs() > FRICTION_SPEED_EPSILON {
            let friction = self.tuning.friction_deceleration * dt;
            if self.speed > 0.0 {
                self.speed = (self.speed - friction).max(0.0);
            } else {
                self.speed = (self.speed + friction).min(0.0);
            }
        }

        self.speed = self
            .speed
            .clamp(self.tuning.max_reverse_speed, self.tuning.max_forward_speed);

        if self.speed.abs() <= REST_SPEED_EPSILON {
            self.speed = 0.0;
            return StepOutcome::AtRest;
        }

        let candidate = self.position + self.forward() * self.speed * dt;
        if track.contains(candidate) {
            self.position = candidate;
            StepOutcome::Moved
        } else {
            self.position = self.previous_position;
            self.speed = 0.0;
            StepOutcome::Collided
        }
    }
}

/// Turn rate in degrees per second at `speed`. Full rate up to 30% of top speed, then
/// falling off linearly, never below 15% of the base rate.
pub fn turn_rate_at_speed(tuning: &VehicleTuning, speed: f32) -> f32 {
    let abs_speed = speed.abs();
    if abs_speed <= TURN_FALLOFF_ONSET_SPEED {
        return tuning.base_turn_rate;
    }
    let onset = tuning.max_forward_speed * TURN_FALLOFF_START_FRACTION;
    let span = tuning.max_forward_speed * (1.0 - TURN_FALLOFF_START_FRACTION);
    let factor = 1.0 - (abs_speed - onset).max(0.0) / span;
    tuning.base_turn_rate * factor.max(MIN_TURN_FRACTION)
}

/// Normalize degrees into `[0, 360)`.
pub fn normalize_heading(degrees: f32) -> f32 {
    let h = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{RectangularTrack, RoundedTrack};

    fn car_at(x: f32, z: f32, heading: f32) -> VehicleState {
        VehicleState::new(Vec2::new(x, z), heading, VehicleTuning::default())
    }

    #[test]
    fn test_turn_rate_at_speeds() {
        let tuning = VehicleTuning::default();
        assert_eq!(turn_rate_at_speed(&tuning, 0.5), BASE_TURN_RATE);
        assert_eq!(turn_rate_at_speed(&tuning, 8.0), BASE_TURN_RATE);
        assert_eq!(turn_rate_at_speed(&tuning, -8.0), BASE_TURN_RATE);

        let rate_mid = turn_rate_at_speed(&tuning, 20.0);
        assert!(rate_mid < BASE_TURN_RATE);
        assert!(rate_mid > BASE_TURN_RATE * MIN_TURN_FRACTION);

        let rate_top = turn_rate_at_speed(&tuning, MAX_FORWARD_SPEED);
        assert!((rate_top - BASE_TURN_RATE * MIN_TURN_FRACTION).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(725.0), 5.0);
        let tiny = normalize_heading(-1e-6);
        assert!((0.0..360.0).contains(&tiny), "got {tiny}");
    }

    #[test]
    fn test_forward_vector() {
        let car = car_at(0.0, 0.0, 0.0);
        assert!((car.forward() - Vec2::new(0.0, 1.0)).length() < 1e-6);
        let car = car_at(0.0, 0.0, 90.0);
        assert!((car.forward() - Vec2::new(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_accelerate_and_brake_are_exclusive() {
        let mut car = car_at(45.0, 0.0, 0.0);
        car.set_control(Control::Accelerate, true);
        car.set_control(Control::Brake, true);
        assert!(!car.controls().accelerate);
        assert!(car.controls().brake);

        car.set_control(Control::Accelerate, true);
        assert!(car.controls().accelerate);
        assert!(!car.controls().brake);

        // Releasing brake does not touch the throttle.
        car.set_control(Control::Brake, false);
        assert!(car.controls().accelerate);
    }

    #[test]
    fn test_cannot_turn_in_place() {
        let track = RectangularTrack::default();
        let mut car = car_at(45.0, 0.0, 0.0);
        car.set_control(Control::TurnLeft, true);
        for _ in 0..60 {
            assert_eq!(car.step(&track, DT), StepOutcome::AtRest);
        }
        assert_eq!(car.heading, 0.0);
        assert_eq!(car.position, Vec2::new(45.0, 0.0));
    }

    #[test]
    fn test_turning_left_and_right() {
        let track = RectangularTrack::default();
        let mut car = car_at(45.0, 0.0, 0.0);
        car.speed = 5.0;
        car.set_control(Control::TurnLeft, true);
        car.step(&track, DT);
        assert!((car.heading - BASE_TURN_RATE * DT).abs() < 1e-4);

        let mut car = car_at(45.0, 0.0, 0.0);
        car.speed = 5.0;
        car.set_control(Control::TurnRight, true);
        car.step(&track, DT);
        assert!(car.heading > 350.0 && car.heading < 360.0, "got {}", car.heading);
    }

    #[test]
    fn test_braking_opposes_reverse_roll() {
        let track = RectangularTrack::default();
        let mut car = car_at(45.0, 0.0, 0.0);
        car.speed = -4.0;
        car.set_control(Control::Brake, true);
        car.step(&track, DT);
        assert!((car.speed - (-4.0 + BRAKING_RATE * DT)).abs() < 1e-5);
    }

    #[test]
    fn test_braking_from_rest_holds_still() {
        let track = RectangularTrack::default();
        let mut car = car_at(45.0, 0.0, 0.0);
        car.set_control(Control::Brake, true);
        for _ in 0..30 {
            car.step(&track, DT);
        }
        assert_eq!(car.speed, 0.0);
        assert_eq!(car.position, Vec2::new(45.0, 0.0));
    }

    #[test]
    fn test_friction_stops_without_reversing() {
        let track = RectangularTrack::default();
        let mut car = car_at(45.0, -30.0, 0.0);
        car.speed = 0.5;
        for _ in 0..60 {
            car.step(&track, DT);
            assert!(car.speed >= 0.0);
        }
        assert_eq!(car.speed, 0.0);

        let mut car = car_at(45.0, 30.0, 0.0);
        car.speed = -0.5;
        for _ in 0..60 {
            car.step(&track, DT);
            assert!(car.speed <= 0.0);
        }
        assert_eq!(car.speed, 0.0);
    }

    #[test]
    fn test_speed_clamping() {
        let track = RoundedTrack::default();
        let mut car = car_at(45.0, -50.0, 0.0);
        car.speed = MAX_FORWARD_SPEED + 10.0;
        car.set_control(Control::Accelerate, true);
        car.step(&track, DT);
        assert!(car.speed <= MAX_FORWARD_SPEED);

        let mut car = car_at(45.0, 50.0, 0.0);
        car.speed = MAX_REVERSE_SPEED - 10.0;
        car.step(&track, DT);
        assert!(car.speed >= MAX_REVERSE_SPEED);
    }

    #[test]
    fn test_wall_hit_reverts_and_stops() {
        let track = RectangularTrack::default();
        // Heading 270 faces -x, straight at the inner wall at x = 40.
        let mut car = car_at(40.2, 0.0, 270.0);
        car.speed = 20.0;
        let before = car.position;
        assert_eq!(car.step(&track, DT), StepOutcome::Collided);
        assert_eq!(car.position, before);
        assert_eq!(car.speed, 0.0);
    }

    #[test]
    fn test_reverse_moves_backward() {
        let track = RectangularTrack::default();
        let mut car = car_at(45.0, 0.0, 0.0);
        car.speed = -3.0;
        assert_eq!(car.step(&track, DT), StepOutcome::Moved);
        assert!(car.position.y < 0.0);
    }
}
