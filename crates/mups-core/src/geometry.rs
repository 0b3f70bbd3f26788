use serde::{Deserialize, Serialize};

/// Tolerance used by overlap and adjacency tests. Two rects whose edges are
/// within this distance are considered flush rather than overlapping.
pub const CONTACT_EPSILON: f32 = 1e-3;

/// 2D vector in screen space (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of the given size whose bottom edge is centered on `(center_x, bottom)`.
    pub fn from_mid_bottom(center_x: f32, bottom: f32, w: f32, h: f32) -> Self {
        Self::new(center_x - w / 2.0, bottom - h, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.top())
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Grow the rect by `dx` horizontally and `dy` vertically, keeping the center.
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx / 2.0, self.y - dy / 2.0, self.w + dx, self.h + dy)
    }

    /// Interior overlap. Edges that merely touch do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right() - CONTACT_EPSILON
            && self.right() > other.left() + CONTACT_EPSILON
            && self.top() < other.bottom() - CONTACT_EPSILON
            && self.bottom() > other.top() + CONTACT_EPSILON
    }

    /// True when the vertical extents share more than a contact sliver.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top() < other.bottom() - CONTACT_EPSILON
            && self.bottom() > other.top() + CONTACT_EPSILON
    }

    /// True when the horizontal extents share more than a contact sliver.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() < other.right() - CONTACT_EPSILON
            && self.right() > other.left() + CONTACT_EPSILON
    }

    /// Our right edge is flush against `other`'s left edge.
    pub fn touches_left_side_of(&self, other: &Rect) -> bool {
        (self.right() - other.left()).abs() <= CONTACT_EPSILON && self.overlaps_vertically(other)
    }

    /// Our left edge is flush against `other`'s right edge.
    pub fn touches_right_side_of(&self, other: &Rect) -> bool {
        (self.left() - other.right()).abs() <= CONTACT_EPSILON && self.overlaps_vertically(other)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}
