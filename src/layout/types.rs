//! Core geometry types for the box-layout engine
//!
//! All box geometry is normalized: `0.0..=1.0` on both axes, as fractions of
//! the reference image's width and height.

/// Slack allowed when checking `x + w <= 1` after floating-point arithmetic
const EDGE_EPSILON: f64 = 1e-9;

/// A 2D point, either in viewport pixels or in normalized image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates into the unit square
    pub fn clamp_unit(self) -> Self {
        Self::new(clamp_unit(self.x), clamp_unit(self.y))
    }
}

/// A width/height pair in pixels (or PDF points for page sizes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or not finite
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A fully set, normalized placement box for one field.
///
/// A `FieldBox` can only be constructed in a valid state: every scalar is
/// finite and inside `[0, 1]`, both sizes are strictly positive and the box
/// lies entirely inside the unit square. "Unset" is expressed as
/// `Option<FieldBox>::None`, never as a partially filled box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBox {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl FieldBox {
    /// Build a box from its top-left corner and size, rejecting invalid geometry
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Option<Self> {
        let valid = [x, y, w, h].iter().all(|v| is_unit(*v))
            && w > 0.0
            && h > 0.0
            && x + w <= 1.0 + EDGE_EPSILON
            && y + h <= 1.0 + EDGE_EPSILON;
        valid.then_some(Self { x, y, w, h })
    }

    /// Build a box from its four edges
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Option<Self> {
        Self::new(left, top, right - left, bottom - top)
    }

    /// The axis-aligned box spanning two corner points, in any order.
    ///
    /// Both points are clamped into the unit square first. Returns `None`
    /// when the span is degenerate on either axis.
    pub fn spanning(a: Point, b: Point) -> Option<Self> {
        let (a, b) = (a.clamp_unit(), b.clamp_unit());
        Self::from_edges(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if this box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Translate by a delta, clamped so the whole box stays inside the unit square
    pub fn translated_within(&self, dx: f64, dy: f64) -> Self {
        let x = (self.x + dx).min(1.0 - self.w).max(0.0);
        let y = (self.y + dy).min(1.0 - self.h).max(0.0);
        Self { x, y, ..*self }
    }

    /// Round to a fixed number of decimals.
    ///
    /// Edges are rounded rather than sizes so that a box touching the image
    /// border keeps touching it. Falls back to `self` if rounding would
    /// collapse the box.
    pub fn rounded(&self, decimals: u32) -> Self {
        let left = round_to(self.x, decimals);
        let top = round_to(self.y, decimals);
        let w = round_to(round_to(self.right(), decimals) - left, decimals);
        let h = round_to(round_to(self.bottom(), decimals) - top, decimals);
        Self::new(left, top, w, h).unwrap_or(*self)
    }

    /// Compare against another box with an absolute tolerance per scalar
    pub fn approx_eq(&self, other: &FieldBox, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.w - other.w).abs() <= tolerance
            && (self.h - other.h).abs() <= tolerance
    }
}

/// An edge or corner of a box that can be dragged to resize it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    S,
    E,
    W,
    NW,
    NE,
    SW,
    SE,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
        Handle::NW,
        Handle::NE,
        Handle::SW,
        Handle::SE,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::W | Handle::NW | Handle::SW)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::E | Handle::NE | Handle::SE)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::N | Handle::NW | Handle::NE)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::S | Handle::SW | Handle::SE)
    }

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::NW | Handle::NE | Handle::SW | Handle::SE)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::NW => "nw",
            Handle::NE => "ne",
            Handle::SW => "sw",
            Handle::SE => "se",
        }
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a box a pointer position falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    /// Interior, beyond the edge tolerance: dragging moves the box
    Body,
    /// An edge or corner: dragging resizes the box
    Handle(Handle),
}

impl std::fmt::Display for HitRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HitRegion::Body => f.write_str("move"),
            HitRegion::Handle(handle) => handle.fmt(f),
        }
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn is_unit(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_partial_and_out_of_range() {
        assert!(FieldBox::new(0.1, 0.1, 0.2, 0.2).is_some());
        assert!(FieldBox::new(-1.0, 0.1, 0.2, 0.2).is_none());
        assert!(FieldBox::new(0.1, 0.1, 0.0, 0.2).is_none());
        assert!(FieldBox::new(0.9, 0.1, 0.2, 0.2).is_none());
        assert!(FieldBox::new(f64::NAN, 0.1, 0.2, 0.2).is_none());
        assert!(FieldBox::new(0.1, 0.1, f64::INFINITY, 0.2).is_none());
    }

    #[test]
    fn test_box_touching_border_is_valid() {
        let b = FieldBox::new(0.8, 0.9, 0.2, 0.1).unwrap();
        assert!((b.right() - 1.0).abs() < 1e-12);
        assert!((b.bottom() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_spanning_orders_corners() {
        let b = FieldBox::spanning(Point::new(0.4, 0.3), Point::new(0.2, 0.2)).unwrap();
        assert!(b.approx_eq(&FieldBox::new(0.2, 0.2, 0.2, 0.1).unwrap(), 1e-12));
    }

    #[test]
    fn test_spanning_clamps_outside_points() {
        let b = FieldBox::spanning(Point::new(0.5, 0.5), Point::new(1.7, -3.0)).unwrap();
        assert_eq!(b.right(), 1.0);
        assert_eq!(b.y(), 0.0);
    }

    #[test]
    fn test_spanning_degenerate_is_none() {
        assert!(FieldBox::spanning(Point::new(0.5, 0.2), Point::new(0.5, 0.4)).is_none());
    }

    #[test]
    fn test_translated_within_clamps_right() {
        let b = FieldBox::new(0.7, 0.5, 0.2, 0.1).unwrap();
        let moved = b.translated_within(0.3, 0.0);
        assert!((moved.x() - 0.8).abs() < 1e-12);
        assert_eq!(moved.w(), 0.2);
    }

    #[test]
    fn test_translated_within_clamps_top_left() {
        let b = FieldBox::new(0.1, 0.1, 0.2, 0.1).unwrap();
        let moved = b.translated_within(-0.5, -0.5);
        assert_eq!(moved.origin(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_rounded_keeps_border_contact() {
        let b = FieldBox::from_edges(0.123_456_78, 0.5, 1.0, 0.600_000_4).unwrap();
        let r = b.rounded(6);
        assert_eq!(r.x(), 0.123457);
        assert!(r.right() <= 1.0 + EDGE_EPSILON);
        assert_eq!(r.h(), 0.1);
    }

    #[test]
    fn test_handle_edges() {
        assert!(Handle::SE.moves_right() && Handle::SE.moves_bottom());
        assert!(!Handle::SE.moves_left() && !Handle::SE.moves_top());
        assert!(Handle::W.moves_left() && !Handle::W.is_corner());
        assert_eq!(Handle::ALL.iter().filter(|h| h.is_corner()).count(), 4);
    }

    #[test]
    fn test_region_display() {
        assert_eq!(HitRegion::Body.to_string(), "move");
        assert_eq!(HitRegion::Handle(Handle::NE).to_string(), "ne");
    }
}
