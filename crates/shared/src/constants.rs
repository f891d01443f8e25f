// Tick rate
pub const TICK_RATE: u32 = 60;
pub const DT: f32 = 1.0 / TICK_RATE as f32;
pub const TICK_DURATION_MS: u64 = 1000 / TICK_RATE as u64;

// Session
pub const SESSION_DURATION_SECS: u32 = 180;
pub const MAX_TICKS: u32 = TICK_RATE * SESSION_DURATION_SECS; // 10800

// Frame recording
pub const FRAME_INTERVAL: u32 = 6; // record every 6th tick = 10fps

// Vehicle tuning (shared by both tracks)
pub const ACCELERATION_RATE: f32 = 7.0;
pub const BRAKING_RATE: f32 = 12.0;
pub const FRICTION_DECELERATION: f32 = 1.8;
pub const BASE_TURN_RATE: f32 = 100.0; // deg/s
pub const MAX_FORWARD_SPEED: f32 = 35.0;
pub const MAX_REVERSE_SPEED: f32 = -8.0;

// Turning falloff
pub const TURN_DEADZONE_SPEED: f32 = 0.1; // no turning in place
pub const TURN_FALLOFF_ONSET_SPEED: f32 = 1.0;
pub const TURN_FALLOFF_START_FRACTION: f32 = 0.3; // of max forward speed
pub const MIN_TURN_FRACTION: f32 = 0.15; // of base turn rate

// Speed thresholds
pub const BRAKE_SPEED_EPSILON: f32 = 0.01;
pub const FRICTION_SPEED_EPSILON: f32 = 0.01;
pub const REST_SPEED_EPSILON: f32 = 0.001;
pub const MOVING_FORWARD_SPEED: f32 = 0.1;

// Vehicle dimensions (render only)
pub const CAR_WIDTH: f32 = 1.0;
pub const CAR_HEIGHT: f32 = 0.5;
pub const CAR_LENGTH: f32 = 2.2;
pub const CAR_RIDE_HEIGHT: f32 = CAR_HEIGHT / 2.0;

// Track (ground plane: x across, z along the start straight)
pub const COLLISION_EPSILON: f32 = 0.1;
pub const ROAD_WIDTH: f32 = 10.0;
pub const HALF_ROAD_WIDTH: f32 = ROAD_WIDTH / 2.0;
pub const TRACK_MAIN_WIDTH: f32 = 90.0; // centerline extent along x
pub const TRACK_MAIN_LENGTH: f32 = 150.0; // centerline extent along z
pub const CENTERLINE_HALF_X: f32 = TRACK_MAIN_WIDTH / 2.0;
pub const CENTERLINE_HALF_Z: f32 = TRACK_MAIN_LENGTH / 2.0;

// Rectangular track
pub const RECT_OUTER_HALF_X: f32 = CENTERLINE_HALF_X + HALF_ROAD_WIDTH; // 50
pub const RECT_OUTER_HALF_Z: f32 = CENTERLINE_HALF_Z + HALF_ROAD_WIDTH; // 80
pub const RECT_INNER_HALF_X: f32 = CENTERLINE_HALF_X - HALF_ROAD_WIDTH; // 40
pub const RECT_INNER_HALF_Z: f32 = CENTERLINE_HALF_Z - HALF_ROAD_WIDTH; // 70
pub const RECT_RACING_LINE_RADIUS: f32 = 10.0;

// Rounded track
pub const ROUND_CORNER_RADIUS: f32 = ROAD_WIDTH * 1.5; // centerline radius, 15
pub const ROUND_INNER_CORNER_RADIUS: f32 = ROUND_CORNER_RADIUS - HALF_ROAD_WIDTH; // 10
pub const ROUND_OUTER_CORNER_RADIUS: f32 = ROUND_CORNER_RADIUS + HALF_ROAD_WIDTH; // 20
pub const ROUND_STRAIGHT_X_LIMIT: f32 = CENTERLINE_HALF_X - ROUND_CORNER_RADIUS; // 30
pub const ROUND_STRAIGHT_Z_LIMIT: f32 = CENTERLINE_HALF_Z - ROUND_CORNER_RADIUS; // 60

// Finish line (right straight on both tracks)
pub const FINISH_LINE_Z: f32 = 0.0;
pub const FINISH_LINE_X_START: f32 = CENTERLINE_HALF_X - HALF_ROAD_WIDTH; // 40
pub const FINISH_LINE_X_END: f32 = CENTERLINE_HALF_X + HALF_ROAD_WIDTH; // 50
pub const FINISH_LINE_THICKNESS: f32 = 1.0;

// Start grid
pub const START_X: f32 = CENTERLINE_HALF_X;
pub const START_Z: f32 = FINISH_LINE_Z - 5.0;
pub const START_HEADING: f32 = 0.0; // facing +z

// Polyline sampling
pub const CENTERLINE_SPACING: f32 = 1.0;
