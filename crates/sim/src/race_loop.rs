use lapline_shared::*;
use tracing::{info, trace};

use crate::driver::Driver;
use crate::lap::{LapEvent, LineSample, RaceState};
use crate::physics::{StepOutcome, VehicleState};
use crate::track::{track_for, TrackGeometry};

/// Result of one [`Race::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: StepOutcome,
    pub lap_event: Option<LapEvent>,
}

/// One car on one track: the vehicle, its lap timing and the track it is confined to.
pub struct Race {
    selection: TrackSelection,
    track: Box<dyn TrackGeometry>,
    tuning_override: Option<VehicleTuning>,
    vehicle: VehicleState,
    race: RaceState,
    tick: u32,
    collisions: u32,
}

impl Race {
    pub fn new(selection: TrackSelection) -> Self {
        Self::build(selection, None)
    }

    /// Race with custom vehicle tuning, kept across track changes and resets.
    pub fn with_tuning(selection: TrackSelection, tuning: VehicleTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(selection, Some(tuning)))
    }

    fn build(selection: TrackSelection, tuning_override: Option<VehicleTuning>) -> Self {
        let track = track_for(selection);
        let tuning = tuning_override.unwrap_or_else(|| VehicleTuning::for_track(selection));
        let vehicle = VehicleState::on_grid(track.as_ref(), tuning);
        let race = RaceState::new(track.finish_line(), vehicle.position);
        Self {
            selection,
            track,
            tuning_override,
            vehicle,
            race,
            tick: 0,
            collisions: 0,
        }
    }

    pub fn set_control(&mut self, control: Control, pressed: bool) {
        self.vehicle.set_control(control, pressed);
    }

    pub fn apply_controls(&mut self, controls: Controls) {
        self.vehicle.apply_controls(controls);
    }

    /// Switch tracks. Puts the car back on the grid with fresh lap timing.
    pub fn select_track(&mut self, selection: TrackSelection) {
        info!(track = %selection, "track selected");
        *self = Self::build(selection, self.tuning_override);
    }

    /// Restart on the current track.
    pub fn reset(&mut self) {
        info!(track = %self.selection, "race reset");
        *self = Self::build(self.selection, self.tuning_override);
    }

    /// Advance one fixed tick at time `now_ms`: dynamics first, then the finish line.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        let before = self.vehicle.position;
        let outcome = self.vehicle.step(self.track.as_ref(), DT);
        if outcome == StepOutcome::Collided {
            self.collisions += 1;
            trace!(
                tick = self.tick,
                x = before.x,
                z = before.y,
                "hit the track edge"
            );
        }

        let sample = LineSample::new(before, self.vehicle.position, self.vehicle.speed);
        let lap_event = self.race.update(sample, now_ms);
        self.tick += 1;

        TickReport { outcome, lap_event }
    }

    pub fn selection(&self) -> TrackSelection {
        self.selection
    }

    pub fn track(&self) -> &dyn TrackGeometry {
        self.track.as_ref()
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn race_state(&self) -> &RaceState {
        &self.race
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    pub fn snapshot(&self) -> SessionFrame {
        SessionFrame {
            tick: self.tick,
            vehicle: self.vehicle.snapshot(),
            lap: self.race.snapshot(),
        }
    }
}

/// Session clock for a tick index, in whole milliseconds.
pub fn session_time_ms(tick: u32) -> u64 {
    tick as u64 * 1000 / TICK_RATE as u64
}

/// Run a deterministic headless session with one driver.
pub fn run_session(
    config: &SessionConfig,
    driver: &mut dyn Driver,
) -> Result<SessionReport, TuningError> {
    let mut race = match config.tuning {
        Some(tuning) => Race::with_tuning(config.track, tuning)?,
        None => Race::new(config.track),
    };
    info!(track = %config.track, driver = driver.name(), max_ticks = config.max_ticks, "session started");

    let mut frames = vec![race.snapshot()];
    let mut laps = Vec::new();
    let mut reason = SessionEndReason::TickLimit;

    while race.tick_count() < config.max_ticks {
        if config
            .target_laps
            .is_some_and(|target| race.race_state().laps_completed >= target)
        {
            reason = SessionEndReason::LapTarget;
            break;
        }

        let controls = driver.drive(race.vehicle(), race.track());
        race.apply_controls(controls);
        let report = race.tick(session_time_ms(race.tick_count()));

        if let Some(LapEvent::Completed {
            duration_ms,
            personal_best,
        }) = report.lap_event
        {
            laps.push(LapRecord {
                lap: race.race_state().laps_completed,
                duration_ms,
                personal_best,
                completed_at_tick: race.tick_count(),
            });
        }

        if race.tick_count() % FRAME_INTERVAL == 0 {
            frames.push(race.snapshot());
        }
    }

    if config
        .target_laps
        .is_some_and(|target| race.race_state().laps_completed >= target)
    {
        reason = SessionEndReason::LapTarget;
    }

    // Capture final frame
    if race.tick_count() % FRAME_INTERVAL != 0 {
        frames.push(race.snapshot());
    }

    info!(
        ticks = race.tick_count(),
        laps = laps.len(),
        collisions = race.collisions(),
        ?reason,
        "session finished"
    );

    Ok(SessionReport {
        config: config.clone(),
        frames,
        laps,
        best_lap_ms: race.race_state().best_lap_ms,
        collisions: race.collisions(),
        final_tick: race.tick_count(),
        reason,
    })
}
