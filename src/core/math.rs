//=========================================================================
// Geometry Helpers
//=========================================================================
//
// Small 2D geometry vocabulary shared by entities and the viewport:
// integer rectangles, named normalized pivots, and segment tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use rand::Rng;

//=== Rect ================================================================

/// Axis-aligned integer rectangle (top-left origin, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Top-left corner as a float vector.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Returns `true` if the point lies inside (right/bottom edges exclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.x < self.right() as f32
            && point.y >= self.y as f32
            && point.y < self.bottom() as f32
    }

    /// Returns `true` if the two rectangles overlap by a non-zero area.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }
}

//=== Origins =============================================================

/// Named normalized pivots for [`Entity::set_origin`](crate::core::entity::Entity::set_origin).
///
/// (0,0) is top-left, (0.5,0.5) center, (1,1) bottom-right.
pub mod origins {
    use glam::Vec2;

    pub const TOP_LEFT: Vec2 = Vec2::new(0.0, 0.0);
    pub const TOP_CENTER: Vec2 = Vec2::new(0.5, 0.0);
    pub const TOP_RIGHT: Vec2 = Vec2::new(1.0, 0.0);
    pub const CENTER_LEFT: Vec2 = Vec2::new(0.0, 0.5);
    pub const CENTER: Vec2 = Vec2::new(0.5, 0.5);
    pub const CENTER_RIGHT: Vec2 = Vec2::new(1.0, 0.5);
    pub const BOTTOM_LEFT: Vec2 = Vec2::new(0.0, 1.0);
    pub const BOTTOM_CENTER: Vec2 = Vec2::new(0.5, 1.0);
    pub const BOTTOM_RIGHT: Vec2 = Vec2::new(1.0, 1.0);
}

//=== Segment Tests =======================================================

/// Returns `true` if segment A (`a0`→`a1`) crosses segment B (`b0`→`b1`).
///
/// Parallel segments are reported as non-intersecting, including the
/// collinear overlapping case.
pub fn segments_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let b = a1 - a0;
    let d = b1 - b0;
    let denom = b.perp_dot(d);

    if denom == 0.0 {
        return false;
    }

    let c = b0 - a0;
    let t = c.perp_dot(d) / denom;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }

    let u = c.perp_dot(b) / denom;
    (0.0..=1.0).contains(&u)
}

/// Returns `true` if the segment crosses any edge of the rectangle.
///
/// A segment lying entirely inside the rectangle touches no edge and
/// therefore reports `false`.
pub fn segment_intersects_rect(start: Vec2, end: Vec2, rect: &Rect) -> bool {
    let top_left = rect.position();
    let top_right = top_left + Vec2::new(rect.width as f32, 0.0);
    let bottom_left = top_left + Vec2::new(0.0, rect.height as f32);
    let bottom_right = top_left + Vec2::new(rect.width as f32, rect.height as f32);

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_left, bottom_left)
        || segments_intersect(start, end, bottom_left, bottom_right)
        || segments_intersect(start, end, top_right, bottom_right)
}

//=== Directions ==========================================================

/// Rotates a direction 90° clockwise (screen space, y down).
pub fn rotate_clockwise(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

/// Rotates a direction 90° counter-clockwise (screen space, y down).
pub fn rotate_counter_clockwise(dir: Vec2) -> Vec2 {
    Vec2::new(dir.y, -dir.x)
}

/// Returns the direction pointing the opposite way.
pub fn opposite(dir: Vec2) -> Vec2 {
    -dir
}

/// Unit vector pointing from `from` towards `to` (zero if they coincide).
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Pushes `point` further away from `anchor` by `distance`.
///
/// Returns `point` unchanged when both points coincide.
pub fn extend_from(point: Vec2, anchor: Vec2, distance: f32) -> Vec2 {
    point + direction(anchor, point) * distance
}

//=== Random Ranges =======================================================

/// Random integer in `min..=max`. Returns `min` for an empty range.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Random float in `min..max`. Returns `min` for an empty range.
pub fn random_f64<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Random float in `min..max`. Returns `min` for an empty range.
pub fn random_f32<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

//=========================================================================
// Unit Tests
//=========================================================================
