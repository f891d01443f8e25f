use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseTrackError, TuningError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSelection {
    /// Sharp-cornered rectangular ring road.
    #[default]
    Rectangular,
    /// Rectangle with quarter-circle corners.
    Rounded,
}

impl TrackSelection {
    pub const ALL: [TrackSelection; 2] = [TrackSelection::Rectangular, TrackSelection::Rounded];

    pub fn name(&self) -> &'static str {
        match self {
            TrackSelection::Rectangular => "rectangular",
            TrackSelection::Rounded => "rounded",
        }
    }
}

impl fmt::Display for TrackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrackSelection {
    type Err = ParseTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangular" | "rect" => Ok(TrackSelection::Rectangular),
            "rounded" | "round" => Ok(TrackSelection::Rounded),
            _ => Err(ParseTrackError(s.to_string())),
        }
    }
}

/// One of the four inputs a driver can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Accelerate,
    Brake,
    TurnLeft,
    TurnRight,
}

/// Full control state for one tick, as produced by a driver.
///
/// If both `accelerate` and `brake` are set, brake wins when applied to a vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub accelerate: bool,
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl Controls {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::Accelerate => self.accelerate,
            Control::Brake => self.brake,
            Control::TurnLeft => self.turn_left,
            Control::TurnRight => self.turn_right,
        }
    }
}

/// Physics constants for one car. Fixed for the duration of a race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleTuning {
    pub acceleration_rate: f32,
    pub braking_rate: f32,
    pub friction_deceleration: f32,
    /// Degrees per second at low speed.
    pub base_turn_rate: f32,
    pub max_forward_speed: f32,
    pub max_reverse_speed: f32,
}

impl VehicleTuning {
    /// Constant set used for a given track.
    pub fn for_track(track: TrackSelection) -> Self {
        match track {
            TrackSelection::Rectangular | TrackSelection::Rounded => Self {
                acceleration_rate: crate::ACCELERATION_RATE,
                braking_rate: crate::BRAKING_RATE,
                friction_deceleration: crate::FRICTION_DECELERATION,
                base_turn_rate: crate::BASE_TURN_RATE,
                max_forward_speed: crate::MAX_FORWARD_SPEED,
                max_reverse_speed: crate::MAX_REVERSE_SPEED,
            },
        }
    }

    /// Check that every rate is finite and positive and that
    /// `max_reverse_speed < 0 < max_forward_speed`.
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("acceleration_rate", self.acceleration_rate),
            ("braking_rate", self.braking_rate),
            ("friction_deceleration", self.friction_deceleration),
            ("base_turn_rate", self.base_turn_rate),
            ("max_forward_speed", self.max_forward_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if !self.max_reverse_speed.is_finite() {
            return Err(TuningError::NotFinite {
                field: "max_reverse_speed",
                value: self.max_reverse_speed,
            });
        }
        if self.max_reverse_speed >= 0.0 {
            return Err(TuningError::ReverseSpeedNotNegative(self.max_reverse_speed));
        }
        Ok(())
    }
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self::for_track(TrackSelection::default())
    }
}

/// Car body size, used only for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleDimensions {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

impl Default for VehicleDimensions {
    fn default() -> Self {
        Self {
            width: crate::CAR_WIDTH,
            height: crate::CAR_HEIGHT,
            length: crate::CAR_LENGTH,
        }
    }
}

/// A line of constant z, counted only between `x_start` and `x_end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishLine {
    pub z: f32,
    pub x_start: f32,
    pub x_end: f32,
    pub thickness: f32,
}

impl FinishLine {
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x_start && x <= self.x_end
    }
}

impl Default for FinishLine {
    fn default() -> Self {
        Self {
            z: crate::FINISH_LINE_Z,
            x_start: crate::FINISH_LINE_X_START,
            x_end: crate::FINISH_LINE_X_END,
            thickness: crate::FINISH_LINE_THICKNESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub x: f32,
    pub z: f32,
    pub heading: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapSnapshot {
    pub armed: bool,
    pub current_lap_ms: u64,
    pub last_lap_ms: Option<u64>,
    pub best_lap_ms: Option<u64>,
    pub laps_completed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionFrame {
    pub tick: u32,
    pub vehicle: VehicleSnapshot,
    pub lap: LapSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    pub lap: u32,
    pub duration_ms: u64,
    pub personal_best: bool,
    pub completed_at_tick: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub track: TrackSelection,
    pub driver: String,
    pub max_ticks: u32,
    /// Stop early once this many laps are completed.
    pub target_laps: Option<u32>,
    /// Overrides the track's default tuning.
    pub tuning: Option<VehicleTuning>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            track: TrackSelection::default(),
            driver: "autopilot".into(),
            max_ticks: crate::MAX_TICKS,
            target_laps: None,
            tuning: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEndReason {
    TickLimit,
    LapTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub config: SessionConfig,
    pub frames: Vec<SessionFrame>,
    pub laps: Vec<LapRecord>,
    pub best_lap_ms: Option<u64>,
    pub collisions: u32,
    pub final_tick: u32,
    pub reason: SessionEndReason,
}
