//! Text elements: word-wrapped paragraphs, single-line chunks and forced
//! line breaks.

use crate::error::Result;
use crate::geometry::{Rect, EPSILON};
use crate::pdf::{Operators, TextItem};
use crate::style::{Display, HAlign, StyleBox};
use crate::text::{BrokenLine, TextStyle};

use super::{Fit, LayoutElement, PaintContext};

/// Word-wrapped text. Lines follow the paragraph's horizontal alignment;
/// justified lines stretch their spaces, except the last line of each
/// paragraph.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub style: StyleBox,
    text: String,
    text_style: TextStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, text_style: TextStyle) -> Self {
        Self {
            style: StyleBox::default(),
            text: text.into(),
            text_style,
        }
    }

    pub fn with_style(mut self, style: StyleBox) -> Self {
        self.style = style;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    fn lines(&self, width: f64) -> Vec<BrokenLine> {
        self.text_style.break_into_lines(&self.text, width)
    }

    fn content_width(&self, lines: &[BrokenLine], available: f64) -> f64 {
        if self.style.h_align == HAlign::Justified && lines.len() > 1 {
            return available;
        }
        lines.iter().map(|l| l.width).fold(0.0, f64::max)
    }
}

/// `TJ` items spreading `extra` points over the spaces of `line`.
fn justified_items(line: &BrokenLine, extra: f64, text_style: &TextStyle) -> Vec<TextItem> {
    let adjust = -(extra / line.spaces as f64) * 1000.0 / text_style.size();
    let mut items = Vec::new();
    let mut word = String::new();
    for c in line.text.chars() {
        word.push(c);
        if c == ' ' {
            items.push(TextItem::Text(text_style.font.encode(&word)));
            items.push(TextItem::Adjust(adjust));
            word.clear();
        }
    }
    if !word.is_empty() {
        items.push(TextItem::Text(text_style.font.encode(&word)));
    }
    items
}

impl LayoutElement for Paragraph {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Paragraph"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        let widest = self.text_style.widest_word(&self.text);
        if widest > available.width + EPSILON {
            return Ok(Fit::Overflow {
                width: widest,
                height: self.text_style.block_height(1),
            });
        }
        let lines = self.lines(available.width);
        let width = self.content_width(&lines, available.width);
        let height = self.text_style.block_height(lines.len());
        Ok(Fit::check(available, width, height))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let ts = &self.text_style;
        let lines = self.lines(content_box.width);
        let font_name = ctx.use_font(&ts.font);
        ctx.page.resources.note_glyphs(&font_name, &self.text);

        let mut ops = Operators::new();
        ops.begin_text()
            .set_font(&font_name, ts.size())
            .fill_color(ts.color);

        let mut cursor: Option<(f64, f64)> = None;
        for (i, line) in lines.iter().enumerate() {
            let slack = (content_box.width - line.width).max(0.0);
            let x = match self.style.h_align {
                HAlign::Left | HAlign::Justified => content_box.x,
                HAlign::Center => content_box.x + slack / 2.0,
                HAlign::Right => content_box.x + slack,
            };
            let y = content_box.top() - ts.baseline_offset() - i as f64 * ts.leading();
            match cursor {
                None => ops.move_text(x, y),
                Some((px, py)) => ops.move_text(x - px, y - py),
            };
            cursor = Some((x, y));

            if line.text.is_empty() {
                continue;
            }
            let justify = self.style.h_align == HAlign::Justified
                && !line.ends_paragraph
                && line.spaces > 0
                && slack > EPSILON;
            if justify {
                ops.show_text_array(justified_items(line, slack, ts));
            } else {
                ops.show_text(ts.font.encode(&line.text));
            }
        }
        ops.end_text();
        ctx.append(&ops);

        let width = self.content_width(&lines, content_box.width);
        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            width,
            ts.block_height(lines.len()),
        ))
    }
}

/// A single unbroken run of text, laid out inline.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub style: StyleBox,
    text: String,
    text_style: TextStyle,
}

impl Chunk {
    pub fn new(text: impl Into<String>, text_style: TextStyle) -> Self {
        Self {
            style: StyleBox::default(),
            text: text.into(),
            text_style,
        }
    }

    pub fn with_style(mut self, style: StyleBox) -> Self {
        self.style = style;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }
}

impl LayoutElement for Chunk {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Chunk"
    }

    fn default_display(&self) -> Display {
        Display::Inline
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        let width = self.text_style.width(&self.text);
        Ok(Fit::check(available, width, self.text_style.size()))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let ts = &self.text_style;
        let font_name = ctx.use_font(&ts.font);
        ctx.page.resources.note_glyphs(&font_name, &self.text);

        let baseline = content_box.top() - ts.baseline_offset();
        let mut ops = Operators::new();
        ops.begin_text()
            .set_font(&font_name, ts.size())
            .fill_color(ts.color)
            .move_text(content_box.x, baseline)
            .show_text(ts.font.encode(&self.text))
            .end_text();
        ctx.append(&ops);

        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            ts.width(&self.text),
            ts.size(),
        ))
    }
}

/// Zero-size inline element that ends the current line.
#[derive(Debug, Clone, Default)]
pub struct LineBreakChunk {
    pub style: StyleBox,
}

impl LineBreakChunk {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutElement for LineBreakChunk {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "LineBreakChunk"
    }

    fn default_display(&self) -> Display {
        Display::Inline
    }

    fn forces_break(&self) -> bool {
        true
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        Ok(Fit::check(available, 0.0, 0.0))
    }

    fn paint_content(&self, _ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        Ok(content_box.with_size(0.0, 0.0))
    }
}
