use lapline_shared::*;
use glam::Vec2;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapPhase {
    NotArmed,
    /// Crossed the line forward once; the next forward crossing completes a lap.
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapEvent {
    /// First forward crossing since the race started or since a backward crossing.
    Armed,
    Completed { duration_ms: u64, personal_best: bool },
    /// Crossed the line backward.
    Disarmed,
}

/// Car positions around one dynamics tick, as seen by the finish line.
#[derive(Debug, Clone, Copy)]
pub struct LineSample {
    pub previous_z: f32,
    pub current_z: f32,
    pub x: f32,
    pub speed: f32,
}

impl LineSample {
    pub fn new(before: Vec2, after: Vec2, speed: f32) -> Self {
        Self {
            previous_z: before.y,
            current_z: after.y,
            x: after.x,
            speed,
        }
    }
}

/// Lap timing and finish-line arm/complete protocol.
#[derive(Debug, Clone)]
pub struct RaceState {
    pub phase: LapPhase,
    /// Unset until the first tick of the race supplies a timestamp.
    pub lap_start_ms: Option<u64>,
    pub current_lap_ms: u64,
    pub last_lap_ms: Option<u64>,
    pub best_lap_ms: Option<u64>,
    pub laps_completed: u32,
    finish_line: FinishLine,
}

impl RaceState {
    /// Fresh timing for a car starting at `start`. Starts armed only if the car is already
    /// on or past the line within its span.
    pub fn new(finish_line: FinishLine, start: Vec2) -> Self {
        let phase = if finish_line.spans(start.x) && start.y >= finish_line.z {
            LapPhase::Armed
        } else {
            LapPhase::NotArmed
        };
        Self {
            phase,
            lap_start_ms: None,
            current_lap_ms: 0,
            last_lap_ms: None,
            best_lap_ms: None,
            laps_completed: 0,
            finish_line,
        }
    }

    pub fn finish_line(&self) -> FinishLine {
        self.finish_line
    }

    pub fn is_armed(&self) -> bool {
        self.phase == LapPhase::Armed
    }

    pub fn snapshot(&self) -> LapSnapshot {
        LapSnapshot {
            armed: self.is_armed(),
            current_lap_ms: self.current_lap_ms,
            last_lap_ms: self.last_lap_ms,
            best_lap_ms: self.best_lap_ms,
            laps_completed: self.laps_completed,
        }
    }

    /// Advance the lap clock to `now_ms` and run the finish-line transitions.
    pub fn update(&mut self, sample: LineSample, now_ms: u64) -> Option<LapEvent> {
        let lap_start = *self.lap_start_ms.get_or_insert(now_ms);
        if now_ms >= lap_start {
            self.current_lap_ms = now_ms - lap_start;
        } else {
            warn!(now_ms, lap_start, "clock went backward, restarting lap clock");
            self.restart_clock(now_ms);
        }

        let line = self.finish_line;
        if !line.spans(sample.x) {
            return None;
        }

        let crossed_forward = sample.previous_z < line.z && sample.current_z >= line.z;
        let crossed_backward = sample.previous_z >= line.z && sample.current_z < line.z;

        if crossed_forward && sample.speed > MOVING_FORWARD_SPEED {
            Some(self.on_forward_crossing(now_ms))
        } else if crossed_backward {
            debug!("finish line crossed backward");
            self.phase = LapPhase::NotArmed;
            Some(LapEvent::Disarmed)
        } else {
            None
        }
    }

    fn on_forward_crossing(&mut self, now_ms: u64) -> LapEvent {
        match self.phase {
            LapPhase::Armed => {
                let duration_ms = self.current_lap_ms;
                self.last_lap_ms = Some(duration_ms);
                let personal_best =
                    duration_ms > 0 && self.best_lap_ms.is_none_or(|best| duration_ms < best);
                if personal_best {
                    self.best_lap_ms = Some(duration_ms);
                }
                self.laps_completed += 1;
                self.restart_clock(now_ms);
                info!(
                    lap = self.laps_completed,
                    duration_ms, personal_best, "lap completed"
                );
                LapEvent::Completed {
                    duration_ms,
                    personal_best,
                }
            }
            LapPhase::NotArmed => {
                debug!(now_ms, "finish line armed");
                self.phase = LapPhase::Armed;
                self.restart_clock(now_ms);
                LapEvent::Armed
            }
        }
    }

    fn restart_clock(&mut self, now_ms: u64) {
        self.lap_start_ms = Some(now_ms);
        self.current_lap_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: f32 = 45.0;

    fn fresh() -> RaceState {
        RaceState::new(FinishLine::default(), Vec2::new(START_X, START_Z))
    }

    fn forward(prev: f32, cur: f32) -> LineSample {
        LineSample {
            previous_z: prev,
            current_z: cur,
            x: X,
            speed: 10.0,
        }
    }

    fn backward(prev: f32, cur: f32) -> LineSample {
        LineSample {
            previous_z: prev,
            current_z: cur,
            x: X,
            speed: -3.0,
        }
    }

    #[test]
    fn test_starts_not_armed_behind_line() {
        let race = fresh();
        assert_eq!(race.phase, LapPhase::NotArmed);
        assert_eq!(race.lap_start_ms, None);
        assert_eq!(race.last_lap_ms, None);
        assert_eq!(race.best_lap_ms, None);
    }

    #[test]
    fn test_starts_armed_past_line() {
        let race = RaceState::new(FinishLine::default(), Vec2::new(X, 2.0));
        assert!(race.is_armed());

        let race = RaceState::new(FinishLine::default(), Vec2::new(-45.0, 2.0));
        assert!(!race.is_armed(), "past the line but outside its span");
    }

    #[test]
    fn test_first_tick_starts_clock() {
        let mut race = fresh();
        assert_eq!(race.update(forward(-5.0, -4.9), 1_000), None);
        assert_eq!(race.lap_start_ms, Some(1_000));
        assert_eq!(race.current_lap_ms, 0);
        race.update(forward(-4.9, -4.8), 1_250);
        assert_eq!(race.current_lap_ms, 250);
    }

    #[test]
    fn test_first_crossing_arms_second_completes() {
        let mut race = fresh();
        race.update(forward(-5.0, -0.1), 0);

        assert_eq!(race.update(forward(-0.1, 0.05), 500), Some(LapEvent::Armed));
        assert!(race.is_armed());
        assert_eq!(race.last_lap_ms, None);
        assert_eq!(race.current_lap_ms, 0);
        assert_eq!(race.lap_start_ms, Some(500));

        // Round the circuit.
        race.update(forward(10.0, 11.0), 30_000);
        assert_eq!(race.current_lap_ms, 29_500);

        let event = race.update(forward(-0.2, 0.0), 60_500);
        assert_eq!(
            event,
            Some(LapEvent::Completed {
                duration_ms: 60_000,
                personal_best: true
            })
        );
        assert_eq!(race.last_lap_ms, Some(60_000));
        assert_eq!(race.best_lap_ms, Some(60_000));
        assert_eq!(race.laps_completed, 1);
        assert_eq!(race.current_lap_ms, 0);
        assert!(race.is_armed());
    }

    #[test]
    fn test_best_lap_only_improves() {
        let mut race = fresh();
        race.update(forward(-0.1, 0.1), 0);

        race.update(forward(-0.1, 0.1), 50_000);
        assert_eq!(race.best_lap_ms, Some(50_000));

        let slower = race.update(forward(-0.1, 0.1), 110_000);
        assert_eq!(
            slower,
            Some(LapEvent::Completed {
                duration_ms: 60_000,
                personal_best: false
            })
        );
        assert_eq!(race.last_lap_ms, Some(60_000));
        assert_eq!(race.best_lap_ms, Some(50_000));

        race.update(forward(-0.1, 0.1), 155_000);
        assert_eq!(race.last_lap_ms, Some(45_000));
        assert_eq!(race.best_lap_ms, Some(45_000));
        assert_eq!(race.laps_completed, 3);
    }

    #[test]
    fn test_zero_length_lap_never_becomes_best() {
        let mut race = fresh();
        race.update(forward(-0.1, 0.1), 1_000);
        let event = race.update(forward(-0.1, 0.1), 1_000);
        assert_eq!(
            event,
            Some(LapEvent::Completed {
                duration_ms: 0,
                personal_best: false
            })
        );
        assert_eq!(race.last_lap_ms, Some(0));
        assert_eq!(race.best_lap_ms, None);
    }

    #[test]
    fn test_backward_crossing_disarms() {
        let mut race = fresh();
        race.update(forward(-0.1, 0.1), 0);
        assert!(race.is_armed());

        assert_eq!(race.update(backward(0.1, -0.1), 2_000), Some(LapEvent::Disarmed));
        assert!(!race.is_armed());

        // Forward again only re-arms.
        assert_eq!(race.update(forward(-0.1, 0.1), 3_000), Some(LapEvent::Armed));
        assert_eq!(race.last_lap_ms, None);
        assert_eq!(race.laps_completed, 0);

        // The crossing after that completes.
        let event = race.update(forward(-0.1, 0.1), 63_000);
        assert_eq!(
            event,
            Some(LapEvent::Completed {
                duration_ms: 60_000,
                personal_best: true
            })
        );
    }

    #[test]
    fn test_creeping_over_line_does_not_count() {
        let mut race = fresh();
        let creep = LineSample {
            previous_z: -0.001,
            current_z: 0.0005,
            x: X,
            speed: MOVING_FORWARD_SPEED / 2.0,
        };
        assert_eq!(race.update(creep, 0), None);
        assert!(!race.is_armed());
    }

    #[test]
    fn test_crossing_outside_span_is_ignored() {
        let mut race = fresh();
        let mut sample = forward(-0.1, 0.1);
        sample.x = -45.0;
        assert_eq!(race.update(sample, 0), None);
        assert!(!race.is_armed());

        race.update(forward(-0.1, 0.1), 100);
        let mut sample = backward(0.1, -0.1);
        sample.x = 20.0;
        assert_eq!(race.update(sample, 200), None);
        assert!(race.is_armed());
    }

    #[test]
    fn test_clock_going_backward_restarts_lap_clock() {
        let mut race = fresh();
        race.update(forward(-5.0, -4.9), 10_000);
        race.update(forward(-4.9, -4.8), 12_000);
        assert_eq!(race.current_lap_ms, 2_000);

        assert_eq!(race.update(forward(-4.8, -4.7), 9_000), None);
        assert_eq!(race.current_lap_ms, 0);
        assert_eq!(race.lap_start_ms, Some(9_000));

        race.update(forward(-4.7, -4.6), 9_400);
        assert_eq!(race.current_lap_ms, 400);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut race = fresh();
        race.update(forward(-0.1, 0.1), 0);
        race.update(forward(-0.1, 0.1), 42_123);
        let snap = race.snapshot();
        assert!(snap.armed);
        assert_eq!(snap.last_lap_ms, Some(42_123));
        assert_eq!(snap.best_lap_ms, Some(42_123));
        assert_eq!(snap.laps_completed, 1);
        assert_eq!(snap.current_lap_ms, 0);
    }
}
