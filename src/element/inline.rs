//! Inline flow: children laid out left to right and wrapped into lines.

use crate::error::Result;
use crate::geometry::Rect;
use crate::measure::inline::{self, InlineItem, InlineLine};
use crate::measure::UNCONSTRAINED;
use crate::style::StyleBox;

use super::{Fit, LayoutElement, PaintContext};

/// A container that breaks its children into lines greedily.
///
/// Children on a line share the line's bottom edge; the line is as tall as
/// its tallest child.
#[derive(Debug, Default)]
pub struct InlineFlow {
    pub style: StyleBox,
    children: Vec<Box<dyn LayoutElement>>,
    /// Horizontal space between neighbours on a line.
    pub gap: f64,
}

impl InlineFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: impl LayoutElement + 'static) -> &mut Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn push_boxed(&mut self, child: Box<dyn LayoutElement>) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn children(&self) -> &[Box<dyn LayoutElement>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Measure every child at `width`; `Err` carries the size of the first
    /// child that does not fit.
    fn items(&self, width: f64) -> Result<std::result::Result<Vec<InlineItem>, (f64, f64)>> {
        let avail = Rect::new(0.0, 0.0, width, UNCONSTRAINED);
        let mut items = Vec::with_capacity(self.children.len());
        for child in &self.children {
            match child.measure(&avail)? {
                Fit::Fits(r) => items.push(InlineItem {
                    width: r.width,
                    height: r.height,
                    forces_break: child.forces_break(),
                }),
                Fit::Overflow { width, height } => return Ok(Err((width, height))),
            }
        }
        Ok(Ok(items))
    }

    /// Lines the children break into at `width`.
    pub fn lines(&self, width: f64) -> Result<Vec<InlineLine>> {
        Ok(match self.items(width)? {
            Ok(items) => inline::partition(&items, self.gap, width),
            Err(_) => Vec::new(),
        })
    }
}

impl LayoutElement for InlineFlow {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "InlineFlow"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        let items = match self.items(available.width)? {
            Ok(items) => items,
            Err((width, height)) => return Ok(Fit::Overflow { width, height }),
        };
        let lines = inline::partition(&items, self.gap, available.width);
        Ok(Fit::check(
            available,
            inline::max_width(&lines),
            inline::total_height(&lines),
        ))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let items = match self.items(content_box.width)? {
            Ok(items) => items,
            Err((width, height)) => {
                return Fit::Overflow { width, height }
                    .into_rect(self.kind(), content_box)
            }
        };
        let lines = inline::partition(&items, self.gap, content_box.width);

        let mut top = content_box.top();
        for line in &lines {
            let bottom = top - line.height;
            let mut x = content_box.x;
            for i in line.start..line.end {
                let item = &items[i];
                let slot = Rect::new(x, bottom, item.width, item.height);
                self.children[i].paint(ctx, &slot)?;
                x += item.width + self.gap;
            }
            top = bottom;
        }

        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            inline::max_width(&lines),
            inline::total_height(&lines),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tests::{doc_with_page, Block};
    use crate::element::LineBreakChunk;

    #[test]
    fn wraps_and_stacks_lines() {
        let mut flow = InlineFlow::new();
        for _ in 0..10 {
            flow.push(Block::new(60.0, 14.0));
        }
        let lines = flow.lines(500.0).unwrap();
        assert_eq!(lines.iter().map(|l| l.len()).collect::<Vec<_>>(), [8, 2]);

        let fit = flow.measure(&Rect::new(0.0, 0.0, 500.0, 100.0)).unwrap();
        assert_eq!(fit.size(), (480.0, 28.0));
    }

    #[test]
    fn children_share_the_line_bottom() {
        let mut doc = doc_with_page();
        let mut flow = InlineFlow::new();
        flow.push(Block::new(10.0, 5.0)).push(Block::new(10.0, 20.0));
        let mut ctx = PaintContext::new(&mut doc, 0).unwrap();
        flow.paint(&mut ctx, &Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();

        let log = doc.paint_log();
        assert_eq!(log[0].painted, Rect::new(0.0, 80.0, 10.0, 5.0));
        assert_eq!(log[1].painted, Rect::new(10.0, 80.0, 10.0, 20.0));
        assert_eq!(log[2].kind, "InlineFlow");
    }

    #[test]
    fn line_break_chunk_forces_a_new_line() {
        let mut flow = InlineFlow::new();
        flow.push(Block::new(10.0, 5.0))
            .push(LineBreakChunk::new())
            .push(Block::new(10.0, 5.0));
        let fit = flow.measure(&Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(fit.size(), (10.0, 10.0));
    }

    #[test]
    fn too_wide_child_overflows() {
        let mut flow = InlineFlow::new();
        flow.push(Block::new(150.0, 5.0));
        let fit = flow.measure(&Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(fit, Fit::Overflow { width: 150.0, height: 5.0 });
    }
}
