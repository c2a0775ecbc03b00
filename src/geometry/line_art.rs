//! # Line Art
//!
//! A catalogue of pure shape factories. Every factory maps a bounding
//! rectangle to a [`LineArt`] whose points span exactly that rectangle:
//! shapes are generated in a local coordinate system and then stretched so
//! their bounding box coincides with the target.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::InputError;

use super::{Point, Rect};

/// Samples used for curved outlines.
const CURVE_SAMPLES: usize = 96;

/// Upper bound on dragon-curve iterations (2^16 segments).
pub const MAX_DRAGON_ITERATIONS: u32 = 16;

/// Upper bound on either Lissajous frequency. Sampling grows linearly with
/// the larger one.
pub const MAX_LISSAJOUS_FREQUENCY: u32 = 256;

/// Geometry produced by the factory.
#[derive(Debug, Clone, PartialEq)]
pub enum LineArt {
    /// A closed polyline. The closing edge back to the first point is implicit.
    Closed(Vec<Point>),
    /// An open polyline.
    Open(Vec<Point>),
    /// Disjoint line segments.
    Segments(Vec<(Point, Point)>),
    /// Several parts that share one bounding box.
    Group(Vec<LineArt>),
}

impl LineArt {
    /// Every point of the shape, in drawing order.
    pub fn points(&self) -> Vec<Point> {
        match self {
            LineArt::Closed(pts) | LineArt::Open(pts) => pts.clone(),
            LineArt::Segments(segs) => segs.iter().flat_map(|(a, b)| [*a, *b]).collect(),
            LineArt::Group(parts) => parts.iter().flat_map(LineArt::points).collect(),
        }
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(self.points())
    }

    /// True when the shape has an interior that can be filled.
    pub fn is_fillable(&self) -> bool {
        match self {
            LineArt::Closed(_) => true,
            LineArt::Open(_) | LineArt::Segments(_) => false,
            LineArt::Group(parts) => parts.iter().any(LineArt::is_fillable),
        }
    }

    fn map(&self, f: &impl Fn(Point) -> Point) -> LineArt {
        match self {
            LineArt::Closed(pts) => LineArt::Closed(pts.iter().map(|p| f(*p)).collect()),
            LineArt::Open(pts) => LineArt::Open(pts.iter().map(|p| f(*p)).collect()),
            LineArt::Segments(segs) => {
                LineArt::Segments(segs.iter().map(|(a, b)| (f(*a), f(*b))).collect())
            }
            LineArt::Group(parts) => LineArt::Group(parts.iter().map(|p| p.map(f)).collect()),
        }
    }

    /// Stretch the shape so its bounding box equals `target`.
    ///
    /// A degenerate axis (all points share one coordinate) collapses onto
    /// the target's low edge.
    pub fn fit_to(&self, target: &Rect) -> LineArt {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        let sx = if bbox.width > 0.0 { target.width / bbox.width } else { 0.0 };
        let sy = if bbox.height > 0.0 { target.height / bbox.height } else { 0.0 };
        self.map(&|p| {
            Point::new(
                target.x + (p.x - bbox.x) * sx,
                target.y + (p.y - bbox.y) * sy,
            )
        })
    }
}

fn unit(points: &[(f64, f64)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn closed(points: Vec<Point>, rect: &Rect) -> LineArt {
    LineArt::Closed(points).fit_to(rect)
}

pub fn rectangle(rect: &Rect) -> LineArt {
    LineArt::Closed(vec![
        Point::new(rect.left(), rect.bottom()),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.right(), rect.top()),
        Point::new(rect.left(), rect.top()),
    ])
}

/// Regular polygon with `n` vertices, the first one at twelve o'clock.
pub fn polygon(rect: &Rect, n: usize) -> Result<LineArt, InputError> {
    check_range("polygon vertex count", n, 3, 12)?;
    let pts = (0..n)
        .map(|i| {
            let a = FRAC_PI_2 + TAU * i as f64 / n as f64;
            Point::new(a.cos(), a.sin())
        })
        .collect();
    Ok(closed(pts, rect))
}

/// Star with `n` outer points.
pub fn star(rect: &Rect, n: usize) -> Result<LineArt, InputError> {
    check_range("star point count", n, 4, 12)?;
    let inner = 0.45;
    let pts = (0..2 * n)
        .map(|i| {
            let a = FRAC_PI_2 + PI * i as f64 / n as f64;
            let r = if i % 2 == 0 { 1.0 } else { inner };
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect();
    Ok(closed(pts, rect))
}

pub fn diamond(rect: &Rect) -> LineArt {
    closed(unit(&[(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)]), rect)
}

const ARROW_UP: [(f64, f64); 7] = [
    (0.5, 1.0),
    (1.0, 0.55),
    (0.7, 0.55),
    (0.7, 0.0),
    (0.3, 0.0),
    (0.3, 0.55),
    (0.0, 0.55),
];

pub fn arrow_up(rect: &Rect) -> LineArt {
    closed(unit(&ARROW_UP), rect)
}

pub fn arrow_down(rect: &Rect) -> LineArt {
    let pts = ARROW_UP.iter().map(|&(x, y)| Point::new(x, 1.0 - y)).collect();
    closed(pts, rect)
}

pub fn arrow_right(rect: &Rect) -> LineArt {
    let pts = ARROW_UP.iter().map(|&(x, y)| Point::new(y, 1.0 - x)).collect();
    closed(pts, rect)
}

pub fn arrow_left(rect: &Rect) -> LineArt {
    let pts = ARROW_UP.iter().map(|&(x, y)| Point::new(1.0 - y, x)).collect();
    closed(pts, rect)
}

/// Tear-drop with its tip at the top.
pub fn droplet(rect: &Rect) -> LineArt {
    let pts = (0..CURVE_SAMPLES)
        .map(|i| {
            let t = TAU * i as f64 / CURVE_SAMPLES as f64;
            Point::new(t.sin() * (t / 2.0).sin(), t.cos())
        })
        .collect();
    closed(pts, rect)
}

pub fn heart(rect: &Rect) -> LineArt {
    let pts = (0..CURVE_SAMPLES)
        .map(|i| {
            let t = TAU * i as f64 / CURVE_SAMPLES as f64;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            Point::new(x, y)
        })
        .collect();
    closed(pts, rect)
}

/// Lissajous figure `x = sin(fx·t + π/2)`, `y = sin(fy·t)`.
pub fn lissajous(rect: &Rect, fx: u32, fy: u32) -> Result<LineArt, InputError> {
    for value in [fx, fy] {
        if value == 0 || value > MAX_LISSAJOUS_FREQUENCY {
            return Err(InputError::OutOfRange {
                what: "lissajous frequency",
                value: value as usize,
                min: 1,
                max: MAX_LISSAJOUS_FREQUENCY as usize,
            });
        }
    }
    let samples = (fx.max(fy) as usize)
        .checked_mul(CURVE_SAMPLES * 2)
        .ok_or_else(|| InputError::Invalid("lissajous sample count overflows".to_string()))?;
    let pts = (0..samples)
        .map(|i| {
            let t = TAU * i as f64 / samples as f64;
            Point::new((fx as f64 * t + FRAC_PI_2).sin(), (fy as f64 * t).sin())
        })
        .collect();
    Ok(closed(pts, rect))
}

/// Heighway dragon after `iterations` folds, as disjoint unit segments.
pub fn dragon_curve(rect: &Rect, iterations: u32) -> Result<LineArt, InputError> {
    if iterations > MAX_DRAGON_ITERATIONS {
        return Err(InputError::OutOfRange {
            what: "dragon curve iterations",
            value: iterations as usize,
            min: 0,
            max: MAX_DRAGON_ITERATIONS as usize,
        });
    }
    // Turn sequence: true = right turn.
    let mut turns: Vec<bool> = Vec::new();
    for _ in 0..iterations {
        let mut next = turns.clone();
        next.push(true);
        next.extend(turns.iter().rev().map(|t| !t));
        turns = next;
    }

    let (mut x, mut y) = (0i64, 0i64);
    let (mut dx, mut dy) = (1i64, 0i64);
    let mut segments = Vec::with_capacity(turns.len() + 1);
    let mut step = |x: &mut i64, y: &mut i64, dx: i64, dy: i64| {
        let from = Point::new(*x as f64, *y as f64);
        *x += dx;
        *y += dy;
        segments.push((from, Point::new(*x as f64, *y as f64)));
    };
    step(&mut x, &mut y, dx, dy);
    for right in turns {
        (dx, dy) = if right { (dy, -dx) } else { (-dy, dx) };
        step(&mut x, &mut y, dx, dy);
    }
    Ok(LineArt::Segments(segments).fit_to(rect))
}

// Flowchart symbols.

pub fn flow_process(rect: &Rect) -> LineArt {
    rectangle(rect)
}

pub fn flow_decision(rect: &Rect) -> LineArt {
    diamond(rect)
}

/// Parallelogram.
pub fn flow_data(rect: &Rect) -> LineArt {
    closed(unit(&[(0.0, 0.0), (0.8, 0.0), (1.0, 1.0), (0.2, 1.0)]), rect)
}

/// Rectangle whose bottom edge is a single sine wave.
pub fn flow_document(rect: &Rect) -> LineArt {
    let mut pts = vec![Point::new(1.0, 1.0), Point::new(0.0, 1.0)];
    let n = CURVE_SAMPLES / 2;
    for i in 0..=n {
        let t = i as f64 / n as f64;
        pts.push(Point::new(t, 0.1 + 0.1 * (TAU * t).sin()));
    }
    closed(pts, rect)
}

/// Rectangle with two inner vertical bars.
pub fn flow_predefined_process(rect: &Rect) -> LineArt {
    LineArt::Group(vec![
        LineArt::Closed(unit(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])),
        LineArt::Segments(vec![
            (Point::new(0.1, 0.0), Point::new(0.1, 1.0)),
            (Point::new(0.9, 0.0), Point::new(0.9, 1.0)),
        ]),
    ])
    .fit_to(rect)
}

/// Stadium: a rectangle with semicircular ends.
pub fn flow_terminator(rect: &Rect) -> LineArt {
    let n = CURVE_SAMPLES / 2;
    let mut pts = Vec::with_capacity(2 * (n + 1));
    for i in 0..=n {
        let a = -FRAC_PI_2 + PI * i as f64 / n as f64;
        pts.push(Point::new(3.0 + a.cos(), a.sin()));
    }
    for i in 0..=n {
        let a = FRAC_PI_2 + PI * i as f64 / n as f64;
        pts.push(Point::new(a.cos(), a.sin()));
    }
    closed(pts, rect)
}

pub fn flow_manual_input(rect: &Rect) -> LineArt {
    closed(unit(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.7)]), rect)
}

/// Elongated hexagon.
pub fn flow_preparation(rect: &Rect) -> LineArt {
    closed(
        unit(&[(0.0, 0.5), (0.2, 0.0), (0.8, 0.0), (1.0, 0.5), (0.8, 1.0), (0.2, 1.0)]),
        rect,
    )
}

/// Trapezoid, wide edge on top.
pub fn flow_manual_operation(rect: &Rect) -> LineArt {
    closed(unit(&[(0.2, 0.0), (0.8, 0.0), (1.0, 1.0), (0.0, 1.0)]), rect)
}

/// Pentagon pointing down.
pub fn flow_off_page_reference(rect: &Rect) -> LineArt {
    closed(
        unit(&[(0.5, 0.0), (1.0, 0.3), (1.0, 1.0), (0.0, 1.0), (0.0, 0.3)]),
        rect,
    )
}

pub fn flow_merge(rect: &Rect) -> LineArt {
    closed(unit(&[(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)]), rect)
}

pub fn flow_extract(rect: &Rect) -> LineArt {
    closed(unit(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)]), rect)
}

/// Flat left edge, semicircular right edge.
pub fn flow_delay(rect: &Rect) -> LineArt {
    let mut pts = vec![Point::new(0.0, 1.0), Point::new(0.0, -1.0)];
    let n = CURVE_SAMPLES / 2;
    for i in 0..=n {
        let a = -FRAC_PI_2 + PI * i as f64 / n as f64;
        pts.push(Point::new(1.0 + a.cos(), a.sin()));
    }
    closed(pts, rect)
}

/// Pointed left edge, rounded right edge.
pub fn flow_display(rect: &Rect) -> LineArt {
    let mut pts = vec![Point::new(-0.6, 0.0)];
    pts.push(Point::new(0.0, -1.0));
    let n = CURVE_SAMPLES / 2;
    for i in 0..=n {
        let a = -FRAC_PI_2 + PI * i as f64 / n as f64;
        pts.push(Point::new(1.5 + 0.5 * a.cos(), a.sin()));
    }
    pts.push(Point::new(0.0, 1.0));
    closed(pts, rect)
}

/// Circle used as an on-page connector.
pub fn flow_connector(rect: &Rect) -> LineArt {
    let pts = (0..CURVE_SAMPLES)
        .map(|i| {
            let a = TAU * i as f64 / CURVE_SAMPLES as f64;
            Point::new(a.cos(), a.sin())
        })
        .collect();
    closed(pts, rect)
}

fn check_range(what: &'static str, value: usize, min: usize, max: usize) -> Result<(), InputError> {
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EPSILON;

    fn assert_spans(art: &LineArt, rect: &Rect) {
        let bbox = art.bounding_box().unwrap();
        assert!((bbox.x - rect.x).abs() < 1e-6, "{bbox} vs {rect}");
        assert!((bbox.y - rect.y).abs() < 1e-6, "{bbox} vs {rect}");
        assert!((bbox.width - rect.width).abs() < 1e-6, "{bbox} vs {rect}");
        assert!((bbox.height - rect.height).abs() < 1e-6, "{bbox} vs {rect}");
    }

    #[test]
    fn every_shape_spans_its_rect() {
        let r = Rect::new(10.0, 20.0, 80.0, 40.0);
        let shapes = vec![
            rectangle(&r),
            polygon(&r, 5).unwrap(),
            star(&r, 7).unwrap(),
            diamond(&r),
            arrow_up(&r),
            arrow_down(&r),
            arrow_left(&r),
            arrow_right(&r),
            droplet(&r),
            heart(&r),
            lissajous(&r, 3, 2).unwrap(),
            dragon_curve(&r, 6).unwrap(),
            flow_process(&r),
            flow_decision(&r),
            flow_data(&r),
            flow_document(&r),
            flow_predefined_process(&r),
            flow_terminator(&r),
            flow_manual_input(&r),
            flow_preparation(&r),
            flow_manual_operation(&r),
            flow_off_page_reference(&r),
            flow_merge(&r),
            flow_extract(&r),
            flow_delay(&r),
            flow_display(&r),
            flow_connector(&r),
        ];
        for art in &shapes {
            assert_spans(art, &r);
            assert!(art.points().iter().all(|p| r.contains_point(*p)));
        }
    }

    #[test]
    fn polygon_vertex_count_is_checked() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(polygon(&r, 2).is_err());
        assert!(polygon(&r, 13).is_err());
        match polygon(&r, 6).unwrap() {
            LineArt::Closed(pts) => assert_eq!(pts.len(), 6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn star_alternates_outer_and_inner_points() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(star(&r, 3).is_err());
        match star(&r, 5).unwrap() {
            LineArt::Closed(pts) => assert_eq!(pts.len(), 10),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dragon_segment_count_doubles() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        for n in 1..5u32 {
            match dragon_curve(&r, n).unwrap() {
                LineArt::Segments(s) => assert_eq!(s.len(), 1 << n),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(dragon_curve(&r, MAX_DRAGON_ITERATIONS + 1).is_err());
    }

    #[test]
    fn degenerate_axis_collapses() {
        let line = LineArt::Open(vec![Point::new(0.0, 5.0), Point::new(10.0, 5.0)]);
        let fitted = line.fit_to(&Rect::new(0.0, 0.0, 20.0, 8.0));
        let pts = fitted.points();
        assert!(pts.iter().all(|p| p.y.abs() < EPSILON));
        assert!((pts[1].x - 20.0).abs() < EPSILON);
    }

    #[test]
    fn lissajous_rejects_zero_frequency() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(lissajous(&r, 0, 1).is_err());
    }

    #[test]
    fn lissajous_rejects_huge_frequency() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            lissajous(&r, u32::MAX, 1),
            Err(InputError::OutOfRange { what: "lissajous frequency", min: 1, .. })
        ));
        assert!(lissajous(&r, 1, MAX_LISSAJOUS_FREQUENCY + 1).is_err());
        let art = lissajous(&r, MAX_LISSAJOUS_FREQUENCY, 3).unwrap();
        assert_eq!(art.points().len(), CURVE_SAMPLES * 2 * MAX_LISSAJOUS_FREQUENCY as usize);
    }
}
