//! Single- and multi-column page layouts.
//!
//! Elements stack top to bottom in the current column. When one does not
//! fit in the space left, the layout moves to the next column, and after
//! the last column to a fresh page with the same column geometry. Pages
//! are created lazily, on the first element that needs one.

use crate::element::{Fit, LayoutElement};
use crate::error::{Error, InputError, Result};
use crate::geometry::{Edges, Rect, EPSILON};
use crate::pdf::Document;

use super::{try_paint, PageLayout, Placement};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Column {
    /// Distance from the left edge of the usable area.
    offset: f64,
    width: f64,
}

#[derive(Debug, Clone)]
pub struct ColumnLayout {
    area: Rect,
    columns: Vec<Column>,
    page_index: Option<usize>,
    column: usize,
    /// Top of the free space in the current column.
    cursor: f64,
    page_has_content: bool,
    placements: Vec<Placement>,
}

impl ColumnLayout {
    fn from_columns(area: Rect, columns: Vec<Column>) -> Self {
        Self {
            area,
            columns,
            page_index: None,
            column: 0,
            cursor: area.top(),
            page_has_content: false,
            placements: Vec::new(),
        }
    }

    /// One column spanning the usable page area.
    pub fn single(doc: &Document) -> Self {
        let area = doc.config().usable_area();
        Self::from_columns(
            area,
            vec![Column {
                offset: 0.0,
                width: area.width,
            }],
        )
    }

    /// `count` equal columns separated by the configured column gap.
    pub fn multi(doc: &Document, count: usize) -> std::result::Result<Self, InputError> {
        if count == 0 {
            return Err(InputError::Invalid("a layout needs at least one column".into()));
        }
        let area = doc.config().usable_area();
        let gap = doc.config().column_gap;
        let width = (area.width - gap * (count - 1) as f64) / count as f64;
        let widths = vec![width; count];
        let gaps = vec![gap; count - 1];
        Self::with_columns(doc, &widths, &gaps)
    }

    /// Columns of the given widths, separated by `gaps` (one fewer than
    /// `widths`), starting at the left edge of the usable page area.
    pub fn with_columns(
        doc: &Document,
        widths: &[f64],
        gaps: &[f64],
    ) -> std::result::Result<Self, InputError> {
        if widths.is_empty() {
            return Err(InputError::Invalid("a layout needs at least one column".into()));
        }
        if gaps.len() + 1 != widths.len() {
            return Err(InputError::Invalid(format!(
                "{} columns need {} gaps (got {})",
                widths.len(),
                widths.len() - 1,
                gaps.len()
            )));
        }
        for &w in widths {
            if !w.is_finite() || w <= 0.0 {
                return Err(InputError::NegativeDimension {
                    what: "column width",
                    value: w,
                });
            }
        }
        for &g in gaps {
            if !g.is_finite() || g < 0.0 {
                return Err(InputError::NegativeDimension {
                    what: "column gap",
                    value: g,
                });
            }
        }

        let area = doc.config().usable_area();
        let mut columns = Vec::with_capacity(widths.len());
        let mut offset = 0.0;
        for (i, &width) in widths.iter().enumerate() {
            columns.push(Column { offset, width });
            offset += width + gaps.get(i).copied().unwrap_or(0.0);
        }
        let total = offset;
        if total > area.width + EPSILON {
            return Err(InputError::Invalid(format!(
                "columns need {:.2}pt but the page has {:.2}pt",
                total, area.width
            )));
        }
        Ok(Self::from_columns(area, columns))
    }

    /// Index of the page being filled, if any page was created yet.
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    pub fn current_column(&self) -> usize {
        self.column
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Full width of the current column.
    pub fn column_width(&self) -> f64 {
        self.columns[self.column].width
    }

    /// Free space left in the current column.
    pub fn remaining(&self) -> Rect {
        let col = self.columns[self.column];
        let bottom = self.area.bottom();
        Rect::new(
            self.area.x + col.offset,
            bottom,
            col.width,
            (self.cursor - bottom).max(0.0),
        )
    }

    fn ensure_page(&mut self, doc: &mut Document) -> usize {
        match self.page_index {
            Some(i) => i,
            None => {
                let i = doc.new_page();
                self.page_index = Some(i);
                self.column = 0;
                self.cursor = self.area.top();
                self.page_has_content = false;
                i
            }
        }
    }

    /// Place `element` with the margin it declares, or the configured
    /// element margin when it declares none.
    pub fn place(&mut self, doc: &mut Document, element: &dyn LayoutElement) -> Result<Rect> {
        let margin = element
            .style()
            .margin()
            .unwrap_or(doc.config().element_margin);
        self.place_with_margin(doc, element, margin)
    }

    pub(crate) fn place_with_margin(
        &mut self,
        doc: &mut Document,
        element: &dyn LayoutElement,
        margin: Edges,
    ) -> Result<Rect> {
        // Cursor state from before a retry page, restored if the retry fails.
        let mut resume: Option<(usize, usize, f64)> = None;
        loop {
            let page_index = self.ensure_page(doc);
            let col = self.columns[self.column];
            let top = self.cursor - margin.top;
            let bottom = self.area.bottom() + margin.bottom;
            let available = Rect::new(
                self.area.x + col.offset + margin.left,
                bottom,
                col.width - margin.horizontal(),
                top - bottom,
            );

            if let Some(painted) = self.paint_at_top(doc, page_index, element, &available)? {
                self.cursor = painted.bottom() - margin.bottom;
                self.page_has_content = true;
                log::trace!(
                    "placed {} at {} on page {}, column {}",
                    element.kind(),
                    painted,
                    page_index + 1,
                    self.column + 1
                );
                self.placements.push(Placement {
                    kind: element.kind(),
                    page_index,
                    rect: painted,
                });
                return Ok(painted);
            }

            if self.column + 1 < self.columns.len() {
                self.column += 1;
                self.cursor = self.area.top();
                log::debug!(
                    "{} moves to column {} of page {}",
                    element.kind(),
                    self.column + 1,
                    page_index + 1
                );
            } else if self.page_has_content && resume.is_none() {
                log::debug!(
                    "{} does not fit on page {}, starting a new page",
                    element.kind(),
                    page_index + 1
                );
                resume = Some((page_index, self.column, self.cursor));
                self.page_index = None;
            } else {
                if let Some((previous, column, cursor)) = resume {
                    if doc.discard_empty_page(page_index) {
                        self.page_index = Some(previous);
                        self.column = column;
                        self.cursor = cursor;
                        self.page_has_content = true;
                    }
                }
                let fresh = Rect::new(0.0, 0.0, col.width - margin.horizontal(), self.area.height);
                let (width, height) = element.measure(&fresh)?.size();
                return Err(Error::PageOverflow {
                    kind: element.kind(),
                    width,
                    height,
                });
            }
        }
    }

    /// Paint `element` anchored at the top of `available`, in a slot exactly
    /// as tall as it measures.
    fn paint_at_top(
        &self,
        doc: &mut Document,
        page_index: usize,
        element: &dyn LayoutElement,
        available: &Rect,
    ) -> Result<Option<Rect>> {
        if available.width < 0.0 || available.height < 0.0 {
            return Ok(None);
        }
        let Fit::Fits(measured) = element.measure(available)? else {
            return Ok(None);
        };
        let slot = Rect::from_top(available.x, available.top(), available.width, measured.height);
        try_paint(doc, page_index, element, &slot)
    }
}

impl PageLayout for ColumnLayout {
    fn add(&mut self, doc: &mut Document, element: Box<dyn LayoutElement>) -> Result<()> {
        self.place(doc, element.as_ref()).map(|_| ())
    }

    fn placements(&self) -> &[Placement] {
        &self.placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DocumentConfig, PageSize};
    use crate::element::tests::Block;

    fn doc(width: f64, height: f64, margin: f64) -> Document {
        Document::new(DocumentConfig {
            page_size: PageSize::Custom { width, height },
            page_margin: Edges::uniform(margin),
            ..DocumentConfig::default()
        })
    }

    #[test]
    fn stacks_then_paginates() {
        let mut doc = doc(200.0, 300.0, 50.0);
        let mut layout = ColumnLayout::single(&doc);
        assert_eq!(doc.page_count(), 0);
        for _ in 0..5 {
            layout.add(&mut doc, Box::new(Block::new(100.0, 60.0))).unwrap();
        }
        // 200pt of usable height holds three 60pt blocks.
        assert_eq!(doc.page_count(), 2);
        let pages: Vec<usize> = layout.placements().iter().map(|p| p.page_index).collect();
        assert_eq!(pages, [0, 0, 0, 1, 1]);
        assert_eq!(layout.placements()[1].rect, Rect::new(50.0, 130.0, 100.0, 60.0));
        assert_eq!(layout.placements()[3].rect, Rect::new(50.0, 190.0, 100.0, 60.0));
    }

    #[test]
    fn margins_advance_the_cursor() {
        let mut doc = doc(200.0, 300.0, 50.0);
        let mut layout = ColumnLayout::single(&doc);
        let mut b = Block::new(40.0, 20.0);
        b.style.set_margin(Some(Edges::new(10.0, 0.0, 5.0, 8.0))).unwrap();
        let first = layout.place(&mut doc, &b).unwrap();
        assert_eq!(first, Rect::new(58.0, 220.0, 40.0, 20.0));
        let second = layout.place(&mut doc, &b).unwrap();
        // Previous bottom margin (5) plus this top margin (10).
        assert_eq!(second.top(), 205.0);
    }

    #[test]
    fn too_tall_for_any_page() {
        let mut doc = doc(200.0, 300.0, 50.0);
        let mut layout = ColumnLayout::single(&doc);
        layout.add(&mut doc, Box::new(Block::new(10.0, 10.0))).unwrap();
        let err = layout
            .add(&mut doc, Box::new(Block::new(10.0, 250.0)))
            .unwrap_err();
        match err {
            Error::PageOverflow { kind, height, .. } => {
                assert_eq!(kind, "Block");
                assert_eq!(height, 250.0);
            }
            other => panic!("unexpected {other}"),
        }
        // The retry page is rolled back and layout resumes where it was.
        assert_eq!(doc.page_count(), 1);
        layout.add(&mut doc, Box::new(Block::new(10.0, 10.0))).unwrap();
        let placed = layout.placements();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1].page_index, 0);
        assert!(placed[1].rect.top() <= placed[0].rect.bottom() + EPSILON);
    }

    #[test]
    fn columns_fill_left_to_right() {
        let mut doc = doc(220.0, 200.0, 10.0);
        let mut layout = ColumnLayout::multi(&doc, 2).unwrap();
        assert_eq!(layout.column_width(), 94.0);
        for _ in 0..5 {
            layout.add(&mut doc, Box::new(Block::new(50.0, 80.0))).unwrap();
        }
        let spots: Vec<(usize, f64)> = layout
            .placements()
            .iter()
            .map(|p| (p.page_index, p.rect.x))
            .collect();
        assert_eq!(
            spots,
            [(0, 10.0), (0, 10.0), (0, 116.0), (0, 116.0), (1, 10.0)]
        );
    }

    #[test]
    fn column_geometry_is_validated() {
        let doc = doc(200.0, 200.0, 10.0);
        assert!(ColumnLayout::multi(&doc, 0).is_err());
        assert!(ColumnLayout::with_columns(&doc, &[50.0, 50.0], &[]).is_err());
        assert!(ColumnLayout::with_columns(&doc, &[100.0, 100.0], &[10.0]).is_err());
        assert!(ColumnLayout::with_columns(&doc, &[80.0, 80.0], &[10.0]).is_ok());
    }

    #[test]
    fn wide_element_moves_to_wider_column() {
        let mut doc = doc(300.0, 200.0, 10.0);
        let mut layout = ColumnLayout::with_columns(&doc, &[60.0, 200.0], &[10.0]).unwrap();
        let r = layout.place(&mut doc, &Block::new(150.0, 20.0)).unwrap();
        assert_eq!(r.x, 80.0);
        assert_eq!(layout.current_column(), 1);
    }
}
