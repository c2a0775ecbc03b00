//! Browser-like flow.
//!
//! Block elements start a new row at the full column width, and the
//! vertical margin between two block siblings is the larger of the two
//! rather than their sum. Inline elements collect on the current row until
//! it is full; the row is painted once it is complete, with every element
//! resting on the row's bottom edge. Inline elements have no vertical
//! margins; neighbours on a row are separated by the larger of the left
//! one's right margin and the right one's left margin.

use crate::element::{Fit, LayoutElement, PaintContext};
use crate::error::Result;
use crate::geometry::{Edges, Rect, EPSILON};
use crate::measure::column_of;
use crate::pdf::Document;
use crate::style::{Display, StyleBox};

use super::{ColumnLayout, PageLayout, Placement};

#[derive(Debug)]
struct Pending {
    element: Box<dyn LayoutElement>,
    margin: Edges,
}

/// One wrapped line of inline elements, painted as a single block.
#[derive(Debug)]
struct InlineRow<'a> {
    style: StyleBox,
    /// Element, space before it, measured width and height.
    items: Vec<(&'a dyn LayoutElement, f64, f64, f64)>,
}

impl InlineRow<'_> {
    fn width(&self) -> f64 {
        self.items.iter().map(|(_, gap, w, _)| gap + w).sum()
    }

    fn height(&self) -> f64 {
        self.items.iter().map(|(_, _, _, h)| *h).fold(0.0, f64::max)
    }
}

impl LayoutElement for InlineRow<'_> {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "InlineRow"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        Ok(Fit::check(available, self.width(), self.height()))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let height = self.height();
        let bottom = content_box.top() - height;
        let mut x = content_box.x;
        for (element, gap, w, h) in &self.items {
            x += gap;
            element.paint(ctx, &Rect::new(x, bottom, *w, *h))?;
            x += w;
        }
        Ok(Rect::from_top(content_box.x, content_box.top(), self.width(), height))
    }
}

#[derive(Debug)]
pub struct BrowserLayout {
    column: ColumnLayout,
    pending: Vec<Pending>,
    /// Bottom margin of the last block, already applied below it.
    prev_bottom: f64,
}

impl BrowserLayout {
    /// Flow over one column spanning the usable page area.
    pub fn new(doc: &Document) -> Self {
        Self::in_column(ColumnLayout::single(doc))
    }

    /// Flow through an existing column geometry.
    pub fn in_column(column: ColumnLayout) -> Self {
        Self {
            column,
            pending: Vec::new(),
            prev_bottom: 0.0,
        }
    }

    /// Number of inline elements waiting for their row to be painted.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn add_block(&mut self, doc: &mut Document, element: &dyn LayoutElement) -> Result<()> {
        self.flush(doc)?;
        let margin = element
            .style()
            .margin()
            .unwrap_or(doc.config().element_margin);
        let collapsed = Edges {
            top: (margin.top - self.prev_bottom).max(0.0),
            ..margin
        };
        self.column.place_with_margin(doc, element, collapsed)?;
        self.prev_bottom = margin.bottom;
        Ok(())
    }

    /// Break the pending inline elements into rows and place each row.
    fn flush(&mut self, doc: &mut Document) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let width = self.column.column_width();
        // Measure before taking the queue so a failure leaves it intact.
        let sizes = self
            .pending
            .iter()
            .map(|p| p.element.measure(&column_of(width)).map(|fit| fit.size()))
            .collect::<Result<Vec<_>>>()?;
        let pending = std::mem::take(&mut self.pending);

        let mut rows: Vec<InlineRow<'_>> = Vec::new();
        let mut row: Vec<(&dyn LayoutElement, f64, f64, f64)> = Vec::new();
        let mut row_width = 0.0;
        let mut prev_right: f64 = 0.0;
        for (p, (w, h)) in pending.iter().zip(sizes) {
            let mut gap = if row.is_empty() {
                p.margin.left
            } else {
                prev_right.max(p.margin.left)
            };
            if !row.is_empty() && row_width + gap + w > width + EPSILON {
                rows.push(finish_row(&mut row));
                row_width = 0.0;
                gap = p.margin.left;
            }
            row.push((p.element.as_ref(), gap, w, h));
            row_width += gap + w;
            prev_right = p.margin.right;
            if p.element.forces_break() {
                rows.push(finish_row(&mut row));
                row_width = 0.0;
            }
        }
        if !row.is_empty() {
            rows.push(finish_row(&mut row));
        }

        log::debug!("flushing {} inline elements as {} rows", pending.len(), rows.len());
        for r in &rows {
            self.column.place_with_margin(doc, r, Edges::ZERO)?;
        }
        self.prev_bottom = 0.0;
        Ok(())
    }
}

fn finish_row<'a>(items: &mut Vec<(&'a dyn LayoutElement, f64, f64, f64)>) -> InlineRow<'a> {
    InlineRow {
        style: StyleBox::default(),
        items: std::mem::take(items),
    }
}

impl PageLayout for BrowserLayout {
    fn add(&mut self, doc: &mut Document, element: Box<dyn LayoutElement>) -> Result<()> {
        match element.display() {
            Display::Block => self.add_block(doc, element.as_ref()),
            Display::Inline => {
                let mut margin = element
                    .style()
                    .margin()
                    .unwrap_or(doc.config().element_margin);
                margin.top = 0.0;
                margin.bottom = 0.0;
                self.pending.push(Pending { element, margin });
                Ok(())
            }
        }
    }

    fn finish(&mut self, doc: &mut Document) -> Result<()> {
        self.flush(doc)
    }

    fn placements(&self) -> &[Placement] {
        self.column.placements()
    }
}
