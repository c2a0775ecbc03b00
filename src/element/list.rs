//! Ordered and unordered lists.
//!
//! A list lays out as two columns: markers on the left at the width of the
//! widest marker, item content on the right in the remaining width. Nested
//! lists sit in the content column without a marker of their own and carry
//! their nesting depth explicitly, which picks the bullet glyph.

use std::sync::Arc;

use crate::error::Result;
use crate::font::{StandardFont, StandardFontKind};
use crate::geometry::Rect;
use crate::measure::{column_of, UNCONSTRAINED};
use crate::style::StyleBox;
use crate::text::TextStyle;

use super::text::Chunk;
use super::{Fit, LayoutElement, PaintContext};

/// ZapfDingbats codes for filled circle, hollow circle and square.
const BULLETS: [char; 3] = ['l', 'm', 'n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    #[default]
    Unordered,
    Decimal,
    LowerAlpha,
    UpperRoman,
}

impl ListStyle {
    /// Marker text for the item at `index` (0-based) of a list at `depth`.
    pub fn marker(&self, index: usize, depth: usize) -> String {
        let n = index + 1;
        match self {
            ListStyle::Unordered => BULLETS[depth % BULLETS.len()].to_string(),
            ListStyle::Decimal => format!("{n}."),
            ListStyle::LowerAlpha => format!("{}.", alphabetic(n)),
            ListStyle::UpperRoman => format!("{}.", roman(n)),
        }
    }

    pub fn is_ordered(&self) -> bool {
        !matches!(self, ListStyle::Unordered)
    }
}

/// a, b, ... z, aa, ab, ...
fn alphabetic(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

#[derive(Debug)]
pub enum ListItem {
    Element(Box<dyn LayoutElement>),
    Nested(List),
}

impl ListItem {
    fn element(&self) -> &dyn LayoutElement {
        match self {
            ListItem::Element(e) => e.as_ref(),
            ListItem::Nested(list) => list,
        }
    }
}

/// One row of a laid-out list.
#[derive(Debug, Clone, Copy)]
struct Row {
    width: f64,
    height: f64,
}

#[derive(Debug)]
pub struct List {
    pub style: StyleBox,
    items: Vec<ListItem>,
    list_style: ListStyle,
    text_style: TextStyle,
    bullet_style: TextStyle,
    depth: usize,
    /// Space between the marker column and the content column.
    pub marker_gap: f64,
}

impl List {
    /// A list whose ordered markers use `text_style`; unordered bullets are
    /// drawn in ZapfDingbats at the same size.
    pub fn new(list_style: ListStyle, text_style: TextStyle) -> Self {
        let mut bullet_style = text_style.clone();
        bullet_style.font = Arc::new(StandardFont::new(StandardFontKind::ZapfDingbats));
        let marker_gap = text_style.size() / 2.0;
        Self {
            style: StyleBox::default(),
            items: Vec::new(),
            list_style,
            text_style,
            bullet_style,
            depth: 0,
            marker_gap,
        }
    }

    pub fn push(&mut self, item: impl LayoutElement + 'static) -> &mut Self {
        self.items.push(ListItem::Element(Box::new(item)));
        self
    }

    pub fn push_boxed(&mut self, item: Box<dyn LayoutElement>) -> &mut Self {
        self.items.push(ListItem::Element(item));
        self
    }

    /// Nest `list` one level below this one.
    pub fn push_list(&mut self, mut list: List) -> &mut Self {
        list.set_depth(self.depth + 1);
        self.items.push(ListItem::Nested(list));
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn list_style(&self) -> ListStyle {
        self.list_style
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        for item in &mut self.items {
            if let ListItem::Nested(list) = item {
                list.set_depth(depth + 1);
            }
        }
    }

    /// One marker per item; nested lists get none and do not advance the
    /// count.
    fn markers(&self) -> Vec<Option<Chunk>> {
        let style = if self.list_style.is_ordered() {
            &self.text_style
        } else {
            &self.bullet_style
        };
        let mut index = 0;
        self.items
            .iter()
            .map(|item| match item {
                ListItem::Nested(_) => None,
                ListItem::Element(_) => {
                    let text = self.list_style.marker(index, self.depth);
                    index += 1;
                    Some(Chunk::new(text, style.clone()))
                }
            })
            .collect()
    }

    fn marker_column(&self, markers: &[Option<Chunk>]) -> Result<f64> {
        let mut widest: Option<f64> = None;
        for marker in markers.iter().flatten() {
            let (w, _) = marker.measure(&column_of(UNCONSTRAINED))?.size();
            widest = Some(widest.unwrap_or(0.0).max(w));
        }
        Ok(widest.map_or(0.0, |w| w + self.marker_gap))
    }

    /// Row sizes at `width`, or the overflow of the first item that does
    /// not fit.
    fn rows(
        &self,
        markers: &[Option<Chunk>],
        content_width: f64,
    ) -> Result<std::result::Result<Vec<Row>, (f64, f64)>> {
        let avail = column_of(content_width);
        let mut rows = Vec::with_capacity(self.items.len());
        for (item, marker) in self.items.iter().zip(markers) {
            let (w, h) = match item.element().measure(&avail)? {
                Fit::Fits(r) => (r.width, r.height),
                Fit::Overflow { width, height } => return Ok(Err((width, height))),
            };
            let marker_h = match marker {
                Some(m) => m.measure(&avail)?.size().1,
                None => 0.0,
            };
            rows.push(Row {
                width: w,
                height: h.max(marker_h),
            });
        }
        Ok(Ok(rows))
    }
}

impl LayoutElement for List {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "List"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        let markers = self.markers();
        let column = self.marker_column(&markers)?;
        let rows = match self.rows(&markers, (available.width - column).max(0.0))? {
            Ok(rows) => rows,
            Err((w, h)) => {
                return Ok(Fit::Overflow {
                    width: column + w,
                    height: h,
                })
            }
        };
        let width = column + rows.iter().map(|r| r.width).fold(0.0, f64::max);
        let height = rows.iter().map(|r| r.height).sum();
        Ok(Fit::check(available, width, height))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let markers = self.markers();
        let column = self.marker_column(&markers)?;
        let content_width = (content_box.width - column).max(0.0);
        let rows = match self.rows(&markers, content_width)? {
            Ok(rows) => rows,
            Err((w, h)) => {
                return Fit::Overflow {
                    width: column + w,
                    height: h,
                }
                .into_rect(self.kind(), content_box)
            }
        };

        let mut top = content_box.top();
        for ((item, marker), row) in self.items.iter().zip(&markers).zip(&rows) {
            if let Some(marker) = marker {
                let slot = Rect::from_top(content_box.x, top, column, row.height);
                marker.paint(ctx, &slot)?;
            }
            let slot = Rect::from_top(content_box.x + column, top, content_width, row.height);
            item.element().paint(ctx, &slot)?;
            top -= row.height;
        }

        let width = column + rows.iter().map(|r| r.width).fold(0.0, f64::max);
        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            width,
            content_box.top() - top,
        ))
    }
}
