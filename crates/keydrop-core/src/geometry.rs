#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are `f64` in a shared, viewport-relative coordinate space with
//! the origin at the top-left and `y` growing downwards. Nothing here traps
//! NaN or infinities; they propagate to the caller, which decides how to
//! treat an unmeasurable rectangle (see [`Rect::is_finite`]).

use std::ops::{Add, Sub};

/// A point (or offset) in the shared coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned bounding rectangle.
///
/// `right` and `bottom` are derived from `left + width` and `top + height`,
/// so the edge invariants hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Horizontal extent, never negative for rectangles built via constructors.
    pub width: f64,
    /// Vertical extent, never negative for rectangles built via constructors.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle. Negative extents are clamped to zero.
    #[inline]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }

    /// Create a rectangle from its four edges.
    ///
    /// An inverted edge pair collapses to a zero extent at the leading edge.
    #[inline]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Area of the rectangle.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check that every field is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Check if a point lies inside the rectangle. Edges are inclusive.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Check whether two rectangles overlap on both axes.
    ///
    /// Touching edges do not count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Compute the overlapping region, returning `None` if the rectangles
    /// do not overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::from_edges(left, top, right, bottom))
    }

    /// The smallest rectangle that contains both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Move the rectangle by an offset, keeping its size.
    #[inline]
    pub fn translate(&self, delta: Point) -> Rect {
        Rect {
            left: self.left + delta.x,
            top: self.top + delta.y,
            ..*self
        }
    }

    /// Move the rectangle so its top-left corner sits at `origin`.
    #[inline]
    pub fn at(&self, origin: Point) -> Rect {
        Rect {
            left: origin.x,
            top: origin.y,
            ..*self
        }
    }
}

// `f64::max` swallows NaN, which would hide an unmeasurable extent.
#[inline]
fn clamp_extent(extent: f64) -> f64 {
    if extent < 0.0 { 0.0 } else { extent }
}

/// The four corners of a rectangle: top-left, top-right, bottom-left,
/// bottom-right.
#[inline]
pub fn corners(rect: &Rect) -> [Point; 4] {
    [
        Point::new(rect.left, rect.top),
        Point::new(rect.right(), rect.top),
        Point::new(rect.left, rect.bottom()),
        Point::new(rect.right(), rect.bottom()),
    ]
}

/// Midpoint of a rectangle.
#[inline]
pub fn center(rect: &Rect) -> Point {
    Point::new(
        rect.left + rect.width * 0.5,
        rect.top + rect.height * 0.5,
    )
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
