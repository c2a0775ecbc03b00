//! # Geometry
//!
//! Points, rectangles, edge insets and affine transforms in PDF user space
//! (1/72 inch, origin bottom-left). Rectangles are plain values: every
//! operation that changes one returns a new rectangle.

pub mod line_art;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Tolerance used for geometric comparisons.
pub const EPSILON: f64 = 1e-6;

/// A point in user space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Edge values (top, right, bottom, left) used for margin, padding and
/// border widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub const ZERO: Edges = Edges {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Edges) -> Edges {
        Edges::new(
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
            self.left + other.left,
        )
    }

    /// Fails when any edge is negative or not finite.
    pub fn validate(&self, what: &'static str) -> Result<(), InputError> {
        for v in [self.top, self.right, self.bottom, self.left] {
            if !v.is_finite() {
                return Err(InputError::NonFinite { what });
            }
            if v < 0.0 {
                return Err(InputError::NegativeDimension { what, value: v });
            }
        }
        Ok(())
    }
}

/// An axis-aligned rectangle. `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Construct a rectangle, rejecting negative or non-finite sizes.
    pub fn try_new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, InputError> {
        for (what, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !v.is_finite() {
                return Err(InputError::NonFinite { what });
            }
        }
        if width < 0.0 {
            return Err(InputError::NegativeDimension {
                what: "width",
                value: width,
            });
        }
        if height < 0.0 {
            return Err(InputError::NegativeDimension {
                what: "height",
                value: height,
            });
        }
        Ok(Self::new(x, y, width, height))
    }

    /// A rectangle of the given size whose top edge sits at `top`.
    pub fn from_top(x: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(x, top - height, width, height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Grow by `d` on every side.
    pub fn grow(&self, d: f64) -> Rect {
        self.grow_edges(&Edges::uniform(d))
    }

    /// Shrink by `d` on every side. Sizes clamp at zero.
    pub fn shrink(&self, d: f64) -> Rect {
        self.shrink_edges(&Edges::uniform(d))
    }

    pub fn grow_edges(&self, e: &Edges) -> Rect {
        Rect::new(
            self.x - e.left,
            self.y - e.bottom,
            self.width + e.horizontal(),
            self.height + e.vertical(),
        )
    }

    /// Shrink by the given insets, keeping the top-left corner anchored
    /// when the rectangle would become degenerate.
    pub fn shrink_edges(&self, e: &Edges) -> Rect {
        let width = (self.width - e.horizontal()).max(0.0);
        let height = (self.height - e.vertical()).max(0.0);
        Rect::new(self.x + e.left, self.top() - e.top - height, width, height)
    }

    /// The overlapping region, if the rectangles overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.left().max(other.left());
        let y0 = self.bottom().max(other.bottom());
        let x1 = self.right().min(other.right());
        let y1 = self.top().min(other.top());
        if x1 + EPSILON < x0 || y1 + EPSILON < y0 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0)))
    }

    /// True when `other` lies entirely inside `self` (within [`EPSILON`]).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() + EPSILON >= self.left()
            && other.right() <= self.right() + EPSILON
            && other.bottom() + EPSILON >= self.bottom()
            && other.top() <= self.top() + EPSILON
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x + EPSILON >= self.left()
            && p.x <= self.right() + EPSILON
            && p.y + EPSILON >= self.bottom()
            && p.y <= self.top() + EPSILON
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Same top-left corner, new size.
    pub fn with_size(&self, width: f64, height: f64) -> Rect {
        Rect::from_top(self.x, self.top(), width, height)
    }

    /// Smallest rectangle containing every point; `None` for no points.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in iter {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} x {:.2} at ({:.2}, {:.2})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// A 2D affine transform `[a b c d e f]`, as used by the `cm` operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Matrix {
            a: sx,
            d: sy,
            ..Matrix::IDENTITY
        }
    }

    /// Counter-clockwise rotation by `degrees`.
    pub fn rotate(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Maps the unit square onto `rect` (the image placement matrix).
    pub fn unit_to(rect: &Rect) -> Self {
        Matrix {
            a: rect.width,
            b: 0.0,
            c: 0.0,
            d: rect.height,
            e: rect.x,
            f: rect.y,
        }
    }

    /// `self` applied first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_then_grow_round_trips() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let back = r.shrink(5.0).grow(5.0);
        assert!((back.x - r.x).abs() < EPSILON);
        assert!((back.y - r.y).abs() < EPSILON);
        assert!((back.width - r.width).abs() < EPSILON);
        assert!((back.height - r.height).abs() < EPSILON);
    }

    #[test]
    fn shrink_keeps_top_left_when_degenerate() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let s = r.shrink(8.0);
        assert_eq!(s.width, 0.0);
        assert_eq!(s.height, 0.0);
        assert!((s.x - 8.0).abs() < EPSILON);
        assert!((s.top() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn intersect_overlapping_and_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        let c = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Rect::new(90.0, 90.0, 20.0, 5.0)));
        assert!(outer.contains_point(outer.center()));
    }

    #[test]
    fn try_new_rejects_negative_sizes() {
        assert!(matches!(
            Rect::try_new(0.0, 0.0, -1.0, 4.0),
            Err(InputError::NegativeDimension { what: "width", .. })
        ));
        assert!(Rect::try_new(0.0, 0.0, f64::NAN, 4.0).is_err());
        assert!(Rect::try_new(0.0, 0.0, 1.0, 4.0).is_ok());
    }

    #[test]
    fn edges_validate() {
        assert!(Edges::uniform(2.0).validate("padding").is_ok());
        assert!(Edges::new(1.0, -1.0, 0.0, 0.0).validate("padding").is_err());
    }

    #[test]
    fn matrix_composition() {
        let m = Matrix::scale(2.0, 3.0).then(&Matrix::translate(10.0, 20.0));
        assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(12.0, 23.0));
        let r = Matrix::rotate(90.0).apply(Point::new(1.0, 0.0));
        assert!(r.x.abs() < EPSILON && (r.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn bounding_box_of_points() {
        let pts = [Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(4.0, -1.0)];
        assert_eq!(Rect::bounding(pts), Some(Rect::new(-2.0, -1.0, 6.0, 6.0)));
        assert_eq!(Rect::bounding(Vec::<Point>::new()), None);
    }
}
