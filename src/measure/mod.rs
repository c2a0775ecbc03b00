//! # Measurement Engine
//!
//! Intrinsic sizes computed on demand from [`LayoutElement::measure`].
//! Leaves measure themselves directly; containers use the helpers here:
//! [`inline`] partitions inline children into lines and [`table`] places
//! cells on a grid, sizes columns and derives row heights.
//!
//! Measurement never touches a page, so calling it any number of times
//! between paints has no observable effect.

pub mod inline;
pub mod table;

use crate::element::{Fit, LayoutElement};
use crate::error::Result;
use crate::geometry::Rect;

/// Width and height used for "unconstrained" measurement.
pub const UNCONSTRAINED: f64 = 1.0e6;

/// Binary search stops once the bracket is narrower than this.
const SEARCH_TOLERANCE: f64 = 0.01;

/// An available rectangle of `width` and unbounded height.
pub fn column_of(width: f64) -> Rect {
    Rect::new(0.0, 0.0, width, UNCONSTRAINED)
}

/// Intrinsic width bounds of an element, and its height at the maximum
/// width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    /// Narrowest width at which the element lays out without overflow.
    pub min_width: f64,
    /// Width the element takes when nothing constrains it.
    pub max_width: f64,
    /// Height at `max_width`.
    pub min_height: f64,
}

/// Measured width and height at `width`, or `None` on overflow.
pub fn size_at(element: &dyn LayoutElement, width: f64) -> Result<Option<(f64, f64)>> {
    Ok(match element.measure(&column_of(width))? {
        Fit::Fits(r) => Some((r.width, r.height)),
        Fit::Overflow { .. } => None,
    })
}

/// Compute [`SizeBounds`] for `element`.
///
/// `max_width` is the width measured at [`UNCONSTRAINED`]; `min_width` is
/// found by binary search between 1 and `max_width` for the smallest
/// available width that still fits.
pub fn size_bounds(element: &dyn LayoutElement) -> Result<SizeBounds> {
    let (max_width, min_height) = match element.measure(&column_of(UNCONSTRAINED))? {
        Fit::Fits(r) => (r.width, r.height),
        Fit::Overflow { width, height } => {
            return Err(crate::error::Error::Overflow {
                kind: element.kind(),
                needed_width: width,
                needed_height: height,
                available: column_of(UNCONSTRAINED),
            })
        }
    };

    let min_width = if max_width <= 1.0 {
        max_width
    } else if let Some((w, _)) = size_at(element, 1.0)? {
        w
    } else {
        let (mut lo, mut hi) = (1.0, max_width);
        let mut best = max_width;
        while hi - lo > SEARCH_TOLERANCE {
            let mid = (lo + hi) / 2.0;
            match size_at(element, mid)? {
                Some((w, _)) => {
                    hi = mid;
                    best = w;
                }
                None => lo = mid,
            }
        }
        best
    };

    Ok(SizeBounds {
        min_width: min_width.min(max_width),
        max_width,
        min_height,
    })
}
