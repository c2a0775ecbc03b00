//! # Placement Engine
//!
//! Page-level layout policies. A policy owns a cursor into the usable page
//! region, asks each element to measure itself against the space left,
//! paints it when it fits and otherwise moves on to the next column or a
//! fresh page.
//!
//! Pagination is driven by the [`Fit`] result of `measure`; a paint that
//! still overflows is rolled back with [`Page::snapshot`] before the retry.
//! An element that does not fit on an empty page fails with
//! [`Error::PageOverflow`]; blocks are never split across pages.
//!
//! [`Page::snapshot`]: crate::pdf::Page::snapshot
//! [`Error::PageOverflow`]: crate::error::Error::PageOverflow

pub mod browser;
pub mod column;

use serde::Serialize;

use crate::element::{Fit, LayoutElement, PaintContext};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::pdf::Document;

pub use browser::BrowserLayout;
pub use column::ColumnLayout;

/// Where a top-level element ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub kind: &'static str,
    pub page_index: usize,
    pub rect: Rect,
}

/// A page-level layout policy.
pub trait PageLayout {
    /// Place `element` after everything added so far. Policies that buffer
    /// inline content may defer painting until [`finish`](Self::finish) or
    /// the next block.
    fn add(&mut self, doc: &mut Document, element: Box<dyn LayoutElement>) -> Result<()>;

    /// Paint anything still pending.
    fn finish(&mut self, _doc: &mut Document) -> Result<()> {
        Ok(())
    }

    fn placements(&self) -> &[Placement];
}

/// Measure `element` against `available` and paint it there when it fits.
///
/// Returns `Ok(None)` when the element does not fit; the page and paint log
/// are left exactly as they were.
pub(crate) fn try_paint(
    doc: &mut Document,
    page_index: usize,
    element: &dyn LayoutElement,
    available: &Rect,
) -> Result<Option<Rect>> {
    if available.width < 0.0 || available.height < 0.0 {
        return Ok(None);
    }
    let Fit::Fits(_) = element.measure(available)? else {
        return Ok(None);
    };

    let snapshot = doc
        .page(page_index)
        .ok_or_else(|| Error::Internal(format!("page {} does not exist", page_index)))?
        .snapshot();
    let log_len = doc.paint_log().len();

    let painted = {
        let mut ctx = PaintContext::new(doc, page_index)?;
        element.paint(&mut ctx, available)
    };
    match painted {
        Ok(rect) => Ok(Some(rect)),
        Err(e) if e.is_overflow() => {
            log::debug!("rolling back {} on page {}: {}", element.kind(), page_index + 1, e);
            if let Some(page) = doc.page_mut(page_index) {
                page.restore(&snapshot);
            }
            doc.truncate_log(log_len);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
