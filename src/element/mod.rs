//! # Layout Elements
//!
//! Every element embeds a [`StyleBox`] and implements [`LayoutElement`]:
//! a side-effect-free `measure` and a `paint` that emits operators into a
//! page. The box protocol (padding, alignment, background before content,
//! borders after content) lives in the provided methods of the trait;
//! concrete elements only implement `measure_content` / `paint_content` on
//! their content box.
//!
//! ```text
//! available ┐
//!           ├─ box (aligned, measured size)  <- background, borders
//!           │   └─ content box (box minus padding and border)
//!           │        └─ paint_content
//! ```

pub mod equation;
pub mod image;
pub mod inline;
pub mod list;
pub mod shape;
pub mod table;
pub mod text;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::font::Font;
use crate::geometry::{Point, Rect, EPSILON};
use crate::image::ImageSource;
use crate::pdf::{Document, Operators, Page, PaintRecord};
use crate::pdf::resources::ImageXObject;
use crate::style::{Display, StyleBox};

pub use equation::Equation;
pub use self::image::Image;
pub use inline::InlineFlow;
pub use list::{List, ListItem, ListStyle};
pub use shape::{HorizontalRule, Shape};
pub use table::{Table, TableCell};
pub use text::{Chunk, LineBreakChunk, Paragraph};

/// Result of measuring an element against an available rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fit {
    /// The element's box, top-aligned with the available rectangle.
    Fits(Rect),
    /// The element needs at least this much room.
    Overflow { width: f64, height: f64 },
}

impl Fit {
    /// `Fits` when `width x height` fits inside `available`, anchored at its
    /// top-left corner.
    pub fn check(available: &Rect, width: f64, height: f64) -> Fit {
        if width > available.width + EPSILON || height > available.height + EPSILON {
            Fit::Overflow { width, height }
        } else {
            Fit::Fits(Rect::from_top(available.x, available.top(), width, height))
        }
    }

    pub fn size(&self) -> (f64, f64) {
        match self {
            Fit::Fits(r) => (r.width, r.height),
            Fit::Overflow { width, height } => (*width, *height),
        }
    }

    pub fn fits(&self) -> bool {
        matches!(self, Fit::Fits(_))
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Fit::Fits(r) => Some(*r),
            Fit::Overflow { .. } => None,
        }
    }

    /// Turn an overflow into the error `paint` reports.
    pub fn into_rect(self, kind: &'static str, available: &Rect) -> Result<Rect> {
        match self {
            Fit::Fits(r) => Ok(r),
            Fit::Overflow { width, height } => Err(Error::Overflow {
                kind,
                needed_width: width,
                needed_height: height,
                available: *available,
            }),
        }
    }
}

/// Where an element is being painted: one page plus the paint log.
pub struct PaintContext<'a> {
    pub page: &'a mut Page,
    pub page_index: usize,
    log: &'a mut Vec<PaintRecord>,
}

impl fmt::Debug for PaintContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintContext")
            .field("page_index", &self.page_index)
            .field("records", &self.log.len())
            .finish()
    }
}

impl<'a> PaintContext<'a> {
    pub fn new(doc: &'a mut Document, page_index: usize) -> Result<Self> {
        let (page, log) = doc.page_and_log(page_index)?;
        Ok(Self {
            page,
            page_index,
            log,
        })
    }

    pub fn append(&mut self, ops: &Operators) {
        self.page.content.append(ops);
    }

    /// Resource name of `font` on this page.
    pub fn use_font(&mut self, font: &Arc<dyn Font>) -> String {
        self.page.resources.register_font(font)
    }

    /// Resource name of `image` on this page.
    pub fn use_image(&mut self, kind: &'static str, image: &dyn ImageSource) -> Result<String> {
        let xobject = ImageXObject::from_source(image).map_err(|e| Error::resource(kind, e))?;
        Ok(self.page.resources.register_image(xobject))
    }

    fn record(&mut self, kind: &'static str, available: Rect, painted: Rect) {
        log::trace!("painted {} at {} on page {}", kind, painted, self.page_index + 1);
        self.log.push(PaintRecord {
            seq: self.log.len(),
            kind,
            page_index: self.page_index,
            available,
            painted,
        });
    }
}

/// The layout-element contract.
pub trait LayoutElement: fmt::Debug {
    fn style(&self) -> &StyleBox;

    /// Type name used in errors and the paint log.
    fn kind(&self) -> &'static str;

    /// Size of the content alone inside `available` (already shrunk by
    /// padding and border).
    fn measure_content(&self, available: &Rect) -> Result<Fit>;

    /// Emit the content inside `content_box`; returns the painted region.
    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect>;

    fn default_display(&self) -> Display {
        Display::Block
    }

    fn display(&self) -> Display {
        self.style().display.unwrap_or_else(|| self.default_display())
    }

    /// Inline flows end the current line after this element.
    fn forces_break(&self) -> bool {
        false
    }

    /// The box fills the whole available rectangle instead of its
    /// measured size.
    fn stretches(&self) -> bool {
        false
    }

    /// The element's box including padding and border.
    fn measure(&self, available: &Rect) -> Result<Fit> {
        let insets = self.style().insets();
        let (ih, iv) = (insets.horizontal(), insets.vertical());
        if ih > available.width + EPSILON || iv > available.height + EPSILON {
            return Ok(Fit::Overflow {
                width: ih,
                height: iv,
            });
        }
        let inner = available.shrink_edges(&insets);
        Ok(match self.measure_content(&inner)? {
            Fit::Fits(r) => Fit::check(available, r.width + ih, r.height + iv),
            Fit::Overflow { width, height } => Fit::Overflow {
                width: width + ih,
                height: height + iv,
            },
        })
    }

    /// Paint inside `available`: background, content, then borders.
    /// Returns the painted box, which always lies within `available`.
    fn paint(&self, ctx: &mut PaintContext<'_>, available: &Rect) -> Result<Rect> {
        let style = self.style();
        let boxed = if self.stretches() {
            self.measure(available)?.into_rect(self.kind(), available)?;
            *available
        } else {
            let measured = self.measure(available)?.into_rect(self.kind(), available)?;
            style
                .align(measured.width, measured.height, available)
                .ok_or(Error::Overflow {
                    kind: self.kind(),
                    needed_width: measured.width,
                    needed_height: measured.height,
                    available: *available,
                })?
        };

        ctx.append(&background_ops(style, &boxed));
        let content_box = boxed.shrink_edges(&style.insets());
        self.paint_content(ctx, &content_box)?;
        ctx.append(&border_ops(style, &boxed));

        ctx.record(self.kind(), *available, boxed);
        Ok(boxed)
    }
}

/// `q rg <path> f Q`, or nothing without a background.
pub fn background_ops(style: &StyleBox, rect: &Rect) -> Operators {
    let mut ops = Operators::new();
    let Some(color) = style.background else {
        return ops;
    };
    ops.save_state().fill_color(color);
    let radius = style.border_radius();
    if radius.is_zero() {
        ops.rect(rect);
    } else {
        ops.rounded_rect(rect, &radius);
    }
    ops.fill().restore_state();
    ops
}

/// `q RG w <edges> S Q` for the enabled sides, or nothing.
pub fn border_ops(style: &StyleBox, rect: &Rect) -> Operators {
    let mut ops = Operators::new();
    if !style.has_border() {
        return ops;
    }
    ops.save_state()
        .stroke_color(style.border_color)
        .line_width(style.border_width());

    let radius = style.border_radius();
    if style.border.all() && !radius.is_zero() {
        ops.rounded_rect(rect, &radius).stroke();
    } else {
        let (l, r, b, t) = (rect.left(), rect.right(), rect.bottom(), rect.top());
        let sides = [
            (style.border.top, Point::new(l, t), Point::new(r, t)),
            (style.border.right, Point::new(r, t), Point::new(r, b)),
            (style.border.bottom, Point::new(r, b), Point::new(l, b)),
            (style.border.left, Point::new(l, b), Point::new(l, t)),
        ];
        for (on, from, to) in sides {
            if on {
                ops.move_to(from).line_to(to);
            }
        }
        ops.stroke();
    }
    ops.restore_state();
    ops
}
