use lapline_shared::*;
use glam::Vec2;

// Points in the ground plane are `Vec2`s where `.x` is world x and `.y` is world z.

/// On/off-track membership for one track topology.
///
/// Implementations are immutable; a race picks one when it starts and never swaps it.
pub trait TrackGeometry: Send + Sync {
    fn selection(&self) -> TrackSelection;

    /// True if `point` is drivable road, boundaries included.
    fn contains(&self, point: Vec2) -> bool;

    /// Closed centerline in driving order, sampled roughly every `spacing` units.
    fn centerline(&self, spacing: f32) -> Vec<Vec2>;

    /// Closed line a pursuit driver can follow without clipping the inner corners.
    fn racing_line(&self) -> Vec<Vec2>;

    fn finish_line(&self) -> FinishLine {
        FinishLine::default()
    }

    /// Starting position and heading (degrees).
    fn start_pose(&self) -> (Vec2, f32) {
        (Vec2::new(START_X, START_Z), START_HEADING)
    }
}

/// Ring road between two concentric axis-aligned rectangles.
#[derive(Debug, Clone, Copy)]
pub struct RectangularTrack {
    pub outer_half: Vec2,
    pub inner_half: Vec2,
    pub epsilon: f32,
}

impl Default for RectangularTrack {
    fn default() -> Self {
        Self {
            outer_half: Vec2::new(RECT_OUTER_HALF_X, RECT_OUTER_HALF_Z),
            inner_half: Vec2::new(RECT_INNER_HALF_X, RECT_INNER_HALF_Z),
            epsilon: COLLISION_EPSILON,
        }
    }
}

impl TrackGeometry for RectangularTrack {
    fn selection(&self) -> TrackSelection {
        TrackSelection::Rectangular
    }

    fn contains(&self, point: Vec2) -> bool {
        let abs = point.abs();

        let outside_outer =
            abs.x > self.outer_half.x + self.epsilon || abs.y > self.outer_half.y + self.epsilon;
        if outside_outer {
            return false;
        }

        let inside_inner =
            abs.x < self.inner_half.x - self.epsilon && abs.y < self.inner_half.y - self.epsilon;
        !inside_inner
    }

    fn centerline(&self, spacing: f32) -> Vec<Vec2> {
        let half = (self.outer_half + self.inner_half) / 2.0;
        rounded_loop(half, 0.0, spacing)
    }

    fn racing_line(&self) -> Vec<Vec2> {
        let half = (self.outer_half + self.inner_half) / 2.0;
        rounded_loop(half, RECT_RACING_LINE_RADIUS, CENTERLINE_SPACING)
    }
}

/// Four straights joined by quarter-circle corners.
#[derive(Debug, Clone, Copy)]
pub struct RoundedTrack {
    /// Half extents of the centerline rectangle.
    pub centerline_half: Vec2,
    pub half_road_width: f32,
    /// Centerline radius of every corner.
    pub corner_radius: f32,
    pub epsilon: f32,
}

impl Default for RoundedTrack {
    fn default() -> Self {
        Self {
            centerline_half: Vec2::new(CENTERLINE_HALF_X, CENTERLINE_HALF_Z),
            half_road_width: HALF_ROAD_WIDTH,
            corner_radius: ROUND_CORNER_RADIUS,
            epsilon: COLLISION_EPSILON,
        }
    }
}

impl RoundedTrack {
    /// |x| bound of the top/bottom straights and |z| bound of the side straights.
    pub fn straight_limits(&self) -> Vec2 {
        self.centerline_half - Vec2::splat(self.corner_radius)
    }

    pub fn inner_corner_radius(&self) -> f32 {
        self.corner_radius - self.half_road_width
    }

    pub fn outer_corner_radius(&self) -> f32 {
        self.corner_radius + self.half_road_width
    }

    /// Corner circle center for a point beyond both straight limits, if it is in one.
    ///
    /// The four quadrants are strict (`>`), the straights use `<=`, so every point is either
    /// in exactly one straight zone test or exactly one corner.
    pub fn corner_center(&self, point: Vec2) -> Option<Vec2> {
        let limits = self.straight_limits();
        if point.x.abs() > limits.x && point.y.abs() > limits.y {
            Some(Vec2::new(
                limits.x.copysign(point.x),
                limits.y.copysign(point.y),
            ))
        } else {
            None
        }
    }

    fn on_straight(&self, point: Vec2) -> bool {
        let abs = point.abs();
        let limits = self.straight_limits();
        let reach = self.half_road_width + self.epsilon;

        // Each straight is gated by its own longitudinal limit so its road band
        // cannot leak into the corner dead zones.
        let top_or_bottom =
            abs.x <= limits.x && (abs.y - self.centerline_half.y).abs() <= reach;
        let left_or_right =
            abs.y <= limits.y && (abs.x - self.centerline_half.x).abs() <= reach;
        top_or_bottom || left_or_right
    }

    fn on_corner(&self, point: Vec2) -> bool {
        let Some(center) = self.corner_center(point) else {
            return false;
        };
        let inner = (self.inner_corner_radius() - self.epsilon).max(0.0);
        let outer = self.outer_corner_radius() + self.epsilon;
        let dist_sq = point.distance_squared(center);
        dist_sq >= inner * inner && dist_sq <= outer * outer
    }
}

impl TrackGeometry for RoundedTrack {
    fn selection(&self) -> TrackSelection {
        TrackSelection::Rounded
    }

    fn contains(&self, point: Vec2) -> bool {
        self.on_straight(point) || self.on_corner(point)
    }

    fn centerline(&self, spacing: f32) -> Vec<Vec2> {
        rounded_loop(self.centerline_half, self.corner_radius, spacing)
    }

    fn racing_line(&self) -> Vec<Vec2> {
        self.centerline(CENTERLINE_SPACING)
    }
}

/// Build the geometry for a track selection.
pub fn track_for(selection: TrackSelection) -> Box<dyn TrackGeometry> {
    match selection {
        TrackSelection::Rectangular => Box::new(RectangularTrack::default()),
        TrackSelection::Rounded => Box::new(RoundedTrack::default()),
    }
}

/// Stateless membership test against the default geometry of `selection`.
pub fn is_on_track(x: f32, z: f32, selection: TrackSelection) -> bool {
    let point = Vec2::new(x, z);
    match selection {
        TrackSelection::Rectangular => RectangularTrack::default().contains(point),
        TrackSelection::Rounded => RoundedTrack::default().contains(point),
    }
}

/// Closed rectangle with filleted corners, starting at `(half.x, 0)` heading +z and running
/// up the right side, across the top, down the left side and back along the bottom.
///
/// A zero `radius` gives sharp corners.
pub fn rounded_loop(half: Vec2, radius: f32, spacing: f32) -> Vec<Vec2> {
    let spacing = spacing.max(0.01);
    let c = half - Vec2::splat(radius);
    let mut points = Vec::new();

    push_segment(&mut points, Vec2::new(half.x, 0.0), Vec2::new(half.x, c.y), spacing);
    push_arc(&mut points, Vec2::new(c.x, c.y), radius, 0.0, spacing);
    push_segment(&mut points, Vec2::new(c.x, half.y), Vec2::new(-c.x, half.y), spacing);
    push_arc(&mut points, Vec2::new(-c.x, c.y), radius, 90.0, spacing);
    push_segment(&mut points, Vec2::new(-half.x, c.y), Vec2::new(-half.x, -c.y), spacing);
    push_arc(&mut points, Vec2::new(-c.x, -c.y), radius, 180.0, spacing);
    push_segment(&mut points, Vec2::new(-c.x, -half.y), Vec2::new(c.x, -half.y), spacing);
    push_arc(&mut points, Vec2::new(c.x, -c.y), radius, 270.0, spacing);
    push_segment(&mut points, Vec2::new(half.x, -c.y), Vec2::new(half.x, 0.0), spacing);

    points
}

/// Samples `from` up to but excluding `to`.
fn push_segment(points: &mut Vec<Vec2>, from: Vec2, to: Vec2, spacing: f32) {
    let steps = (from.distance(to) / spacing).ceil().max(1.0) as usize;
    for i in 0..steps {
        points.push(from.lerp(to, i as f32 / steps as f32));
    }
}

/// Quarter arc counter-clockwise in the x/z plane from `start_deg`, end excluded.
fn push_arc(points: &mut Vec<Vec2>, center: Vec2, radius: f32, start_deg: f32, spacing: f32) {
    let sweep = std::f32::consts::FRAC_PI_2;
    let steps = (radius * sweep / spacing).ceil().max(1.0) as usize;
    let start = start_deg.to_radians();
    for i in 0..steps {
        let angle = start + sweep * i as f32 / steps as f32;
        points.push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
    }
}
