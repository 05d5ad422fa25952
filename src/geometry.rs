//! Collision predicates shared by the games.
//!
//! Coordinates are field units with the origin in the top-left corner and y
//! growing downwards. Every predicate is strict at the boundary: touching edges
//! do not count as overlap.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Axis-aligned overlap test.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Circle vs rectangle, using the circle's bounding box.
pub fn circle_hits_rect(center: Point, radius: f64, rect: &Rect) -> bool {
    center.x + radius > rect.x
        && center.x - radius < rect.right()
        && center.y + radius > rect.y
        && center.y - radius < rect.bottom()
}

/// Circle vs circle: true when the centres are closer than `threshold`.
pub fn within(a: Point, b: Point, threshold: f64) -> bool {
    a.distance(b) < threshold
}

/// Signed length of the overlap between `[a_left, a_right]` and
/// `[b_left, b_right]`. Zero or negative means the spans are disjoint.
pub fn span_overlap(a_left: f64, a_right: f64, b_left: f64, b_right: f64) -> f64 {
    a_right.min(b_right) - a_left.max(b_left)
}

/// Moves `current` a fixed fraction of the way towards `target`.
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}
