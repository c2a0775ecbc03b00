//! # Content Streams
//!
//! [`Op`] models the subset of PDF graphics operators the engine emits,
//! [`Operators`] is a builder that collects them, and [`ContentStream`] is
//! the per-page byte buffer they are appended to.
//!
//! A content stream keeps its decoded operator text and the zlib-compressed
//! form side by side. Every append recompresses, so `/Length` always equals
//! the compressed byte count.

use std::io::Write;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::color::Color;
use crate::geometry::{Matrix, Point, Rect};
use crate::style::Corners;

/// Control-point factor for approximating a quarter circle with a cubic.
const KAPPA: f64 = 0.552_284_749_8;

/// Format a number operand: at most four decimals, no trailing zeros,
/// never `-0`.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let mut s = format!("{:.4}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Encode bytes as a PDF string operand. Printable ASCII is written as a
/// literal string; anything else forces a hex string.
pub fn string_operand(bytes: &[u8]) -> Vec<u8> {
    if bytes.iter().all(|b| (0x20..=0x7E).contains(b)) {
        let mut out = Vec::with_capacity(bytes.len() + 2);
        out.push(b'(');
        for &b in bytes {
            if matches!(b, b'(' | b')' | b'\\') {
                out.push(b'\\');
            }
            out.push(b);
        }
        out.push(b')');
        out
    } else {
        let mut out = Vec::with_capacity(bytes.len() * 2 + 2);
        out.push(b'<');
        for b in bytes {
            let _ = write!(out, "{:02X}", b);
        }
        out.push(b'>');
        out
    }
}

/// Encode a Unicode string for a PDF text string (Info entries, alt text):
/// printable ASCII stays literal, everything else becomes UTF-16BE with BOM.
pub fn text_string(s: &str) -> Vec<u8> {
    if s.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return string_operand(s.as_bytes());
    }
    let mut utf16 = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        utf16.extend_from_slice(&unit.to_be_bytes());
    }
    string_operand(&utf16)
}

/// An element of a `TJ` array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextItem {
    /// Encoded glyph bytes.
    Text(Vec<u8>),
    /// Horizontal adjustment in 1/1000 text space units (negative moves right).
    Adjust(f64),
}

/// One content-stream operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Rect(f64, f64, f64, f64),
    ClosePath,
    Stroke,
    Fill,
    FillStroke,
    SaveState,
    RestoreState,
    LineWidth(f64),
    StrokeRgb(f64, f64, f64),
    FillRgb(f64, f64, f64),
    Concat(Matrix),
    PaintXObject(String),
    BeginText,
    EndText,
    SetFont(String, f64),
    ShowText(Vec<u8>),
    ShowTextArray(Vec<TextItem>),
    MoveText(f64, f64),
    /// `/Tag << properties >> BDC`; `properties` is a raw dictionary body.
    BeginMarkedContent { tag: String, properties: Vec<u8> },
    EndMarkedContent,
}

impl Op {
    /// The operator keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Op::MoveTo(..) => "m",
            Op::LineTo(..) => "l",
            Op::CurveTo(..) => "c",
            Op::Rect(..) => "re",
            Op::ClosePath => "h",
            Op::Stroke => "S",
            Op::Fill => "f",
            Op::FillStroke => "B",
            Op::SaveState => "q",
            Op::RestoreState => "Q",
            Op::LineWidth(_) => "w",
            Op::StrokeRgb(..) => "RG",
            Op::FillRgb(..) => "rg",
            Op::Concat(_) => "cm",
            Op::PaintXObject(_) => "Do",
            Op::BeginText => "BT",
            Op::EndText => "ET",
            Op::SetFont(..) => "Tf",
            Op::ShowText(_) => "Tj",
            Op::ShowTextArray(_) => "TJ",
            Op::MoveText(..) => "Td",
            Op::BeginMarkedContent { .. } => "BDC",
            Op::EndMarkedContent => "EMC",
        }
    }

    /// Write the operator as one line of content-stream text.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let nums = |out: &mut Vec<u8>, values: &[f64]| {
            for v in values {
                out.extend_from_slice(fmt_num(*v).as_bytes());
                out.push(b' ');
            }
        };
        match self {
            Op::MoveTo(x, y) | Op::LineTo(x, y) | Op::MoveText(x, y) => nums(out, &[*x, *y]),
            Op::CurveTo(a, b, c, d, e, f) => nums(out, &[*a, *b, *c, *d, *e, *f]),
            Op::Rect(x, y, w, h) => nums(out, &[*x, *y, *w, *h]),
            Op::LineWidth(w) => nums(out, &[*w]),
            Op::StrokeRgb(r, g, b) | Op::FillRgb(r, g, b) => nums(out, &[*r, *g, *b]),
            Op::Concat(m) => nums(out, &[m.a, m.b, m.c, m.d, m.e, m.f]),
            Op::PaintXObject(name) => {
                let _ = write!(out, "/{} ", name);
            }
            Op::SetFont(name, size) => {
                let _ = write!(out, "/{} {} ", name, fmt_num(*size));
            }
            Op::ShowText(bytes) => {
                out.extend_from_slice(&string_operand(bytes));
                out.push(b' ');
            }
            Op::ShowTextArray(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    match item {
                        TextItem::Text(bytes) => out.extend_from_slice(&string_operand(bytes)),
                        TextItem::Adjust(v) => out.extend_from_slice(fmt_num(*v).as_bytes()),
                    }
                }
                out.extend_from_slice(b"] ");
            }
            Op::BeginMarkedContent { tag, properties } => {
                let _ = write!(out, "/{} ", tag);
                if properties.is_empty() {
                    out.extend_from_slice(b"<< >> ");
                } else {
                    out.extend_from_slice(b"<< ");
                    out.extend_from_slice(properties);
                    out.extend_from_slice(b" >> ");
                }
            }
            Op::ClosePath
            | Op::Stroke
            | Op::Fill
            | Op::FillStroke
            | Op::SaveState
            | Op::RestoreState
            | Op::BeginText
            | Op::EndText
            | Op::EndMarkedContent => {}
        }
        out.extend_from_slice(self.keyword().as_bytes());
        out.push(b'\n');
    }
}

/// Builder collecting operators before they are appended to a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operators {
    ops: Vec<Op>,
}

impl Operators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op(&mut self, op: Op) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn extend(&mut self, other: Operators) -> &mut Self {
        self.ops.extend(other.ops);
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for op in &self.ops {
            op.write_to(&mut out);
        }
        out
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.op(Op::SaveState)
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(Op::RestoreState)
    }

    pub fn line_width(&mut self, w: f64) -> &mut Self {
        self.op(Op::LineWidth(w))
    }

    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.to_rgb();
        self.op(Op::FillRgb(r, g, b))
    }

    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.to_rgb();
        self.op(Op::StrokeRgb(r, g, b))
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.op(Op::MoveTo(p.x, p.y))
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.op(Op::LineTo(p.x, p.y))
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.op(Op::CurveTo(c1.x, c1.y, c2.x, c2.y, end.x, end.y))
    }

    pub fn rect(&mut self, r: &Rect) -> &mut Self {
        self.op(Op::Rect(r.x, r.y, r.width, r.height))
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.op(Op::ClosePath)
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(Op::Stroke)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(Op::Fill)
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.op(Op::FillStroke)
    }

    pub fn concat(&mut self, m: Matrix) -> &mut Self {
        self.op(Op::Concat(m))
    }

    pub fn paint_xobject(&mut self, name: &str) -> &mut Self {
        self.op(Op::PaintXObject(name.to_string()))
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(Op::BeginText)
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(Op::EndText)
    }

    pub fn set_font(&mut self, name: &str, size: f64) -> &mut Self {
        self.op(Op::SetFont(name.to_string(), size))
    }

    pub fn move_text(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.op(Op::MoveText(dx, dy))
    }

    pub fn show_text(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.op(Op::ShowText(bytes))
    }

    pub fn show_text_array(&mut self, items: Vec<TextItem>) -> &mut Self {
        self.op(Op::ShowTextArray(items))
    }

    /// Open a marked-content sequence carrying an `/Alt` description.
    pub fn begin_tagged(&mut self, tag: &str, alt: Option<&str>) -> &mut Self {
        let mut properties = Vec::new();
        if let Some(alt) = alt {
            properties.extend_from_slice(b"/Alt ");
            properties.extend_from_slice(&text_string(alt));
        }
        self.op(Op::BeginMarkedContent {
            tag: tag.to_string(),
            properties,
        })
    }

    pub fn end_tagged(&mut self) -> &mut Self {
        self.op(Op::EndMarkedContent)
    }

    /// A polyline through `points`, closed with `h` when `closed`.
    pub fn polyline(&mut self, points: &[Point], closed: bool) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        if closed {
            self.close_path();
        }
        self
    }

    /// Closed path of a rectangle with rounded corners: one `l` per side
    /// and one `c` per rounded corner, starting at the bottom-left.
    pub fn rounded_rect(&mut self, r: &Rect, radii: &Corners) -> &mut Self {
        let c = radii.clamped(r);
        let (x, y, w, h) = (r.x, r.y, r.width, r.height);
        let (tl, tr, br, bl) = (c.top_left, c.top_right, c.bottom_right, c.bottom_left);

        self.move_to(Point::new(x + bl, y));

        self.line_to(Point::new(x + w - br, y));
        if br > 0.0 {
            self.curve_to(
                Point::new(x + w - br + br * KAPPA, y),
                Point::new(x + w, y + br - br * KAPPA),
                Point::new(x + w, y + br),
            );
        }

        self.line_to(Point::new(x + w, y + h - tr));
        if tr > 0.0 {
            self.curve_to(
                Point::new(x + w, y + h - tr + tr * KAPPA),
                Point::new(x + w - tr + tr * KAPPA, y + h),
                Point::new(x + w - tr, y + h),
            );
        }

        self.line_to(Point::new(x + tl, y + h));
        if tl > 0.0 {
            self.curve_to(
                Point::new(x + tl - tl * KAPPA, y + h),
                Point::new(x, y + h - tl + tl * KAPPA),
                Point::new(x, y + h - tl),
            );
        }

        self.line_to(Point::new(x, y + bl));
        if bl > 0.0 {
            self.curve_to(
                Point::new(x, y + bl - bl * KAPPA),
                Point::new(x + bl - bl * KAPPA, y),
                Point::new(x + bl, y),
            );
        }

        self.close_path()
    }
}

/// A page's content stream: decoded operator bytes and their
/// zlib-compressed form, updated together.
#[derive(Debug, Clone)]
pub struct ContentStream {
    decoded: Vec<u8>,
    compressed: Vec<u8>,
}

impl Default for ContentStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStream {
    pub fn new() -> Self {
        Self {
            decoded: Vec::new(),
            compressed: compress_to_vec_zlib(&[], 6),
        }
    }

    /// Append operators.
    pub fn append(&mut self, ops: &Operators) {
        if ops.is_empty() {
            return;
        }
        self.append_raw(&ops.encode());
    }

    /// Append raw operator text, inserting a newline when the previous and
    /// new bytes would otherwise run together.
    pub fn append_raw(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needs_separator = matches!(self.decoded.last(), Some(b) if !b.is_ascii_whitespace())
            && !bytes[0].is_ascii_whitespace();
        if needs_separator {
            self.decoded.push(b'\n');
        }
        self.decoded.extend_from_slice(bytes);
        self.recompress();
    }

    /// Decoded length, usable as a snapshot mark.
    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }

    /// Drop everything after `len` (restoring a snapshot).
    pub fn truncate(&mut self, len: usize) {
        if len < self.decoded.len() {
            self.decoded.truncate(len);
            self.recompress();
        }
    }

    pub fn decoded(&self) -> &[u8] {
        &self.decoded
    }

    pub fn compressed(&self) -> &[u8] {
        &self.compressed
    }

    /// Value of the stream's `/Length` entry.
    pub fn length(&self) -> usize {
        self.compressed.len()
    }

    /// The stream dictionary.
    pub fn dictionary(&self) -> String {
        format!("<< /Length {} /Filter /FlateDecode >>", self.length())
    }

    fn recompress(&mut self) {
        self.compressed = compress_to_vec_zlib(&self.decoded, 6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniz_oxide::inflate::decompress_to_vec_zlib;

    fn text(ops: &Operators) -> String {
        String::from_utf8(ops.encode()).unwrap()
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
        assert_eq!(fmt_num(-0.00001), "0");
        assert_eq!(fmt_num(-2.25), "-2.25");
        assert_eq!(fmt_num(f64::NAN), "0");
        assert_eq!(fmt_num(595.27559), "595.2756");
    }

    #[test]
    fn string_operands() {
        assert_eq!(string_operand(b"Hello"), b"(Hello)");
        assert_eq!(string_operand(b"a(b)\\"), b"(a\\(b\\)\\\\)");
        assert_eq!(string_operand(&[0x41, 0xE9]), b"<41E9>");
        assert_eq!(string_operand(&[0x00, 0x24]), b"<0024>");
    }

    #[test]
    fn text_strings_use_utf16_when_needed() {
        assert_eq!(text_string("Plain"), b"(Plain)");
        assert_eq!(text_string("é"), b"<FEFF00E9>");
    }

    #[test]
    fn operators_encode_one_per_line() {
        let mut ops = Operators::new();
        ops.save_state()
            .fill_color(Color::rgb8(255, 0, 0))
            .rect(&Rect::new(10.0, 20.0, 30.5, 40.0))
            .fill()
            .restore_state();
        assert_eq!(text(&ops), "q\n1 0 0 rg\n10 20 30.5 40 re\nf\nQ\n");
    }

    #[test]
    fn text_operators() {
        let mut ops = Operators::new();
        ops.begin_text()
            .set_font("F1", 12.0)
            .move_text(60.0, 772.5)
            .show_text(b"Hi".to_vec())
            .show_text_array(vec![TextItem::Text(b"a".to_vec()), TextItem::Adjust(-250.0)])
            .end_text();
        assert_eq!(
            text(&ops),
            "BT\n/F1 12 Tf\n60 772.5 Td\n(Hi) Tj\n[(a) -250] TJ\nET\n"
        );
    }

    #[test]
    fn marked_content_with_alt() {
        let mut ops = Operators::new();
        ops.begin_tagged("Figure", Some("A chart")).end_tagged();
        assert_eq!(text(&ops), "/Figure << /Alt (A chart) >> BDC\nEMC\n");
    }

    #[test]
    fn rounded_rect_has_four_lines_and_curves() {
        let mut ops = Operators::new();
        ops.rounded_rect(&Rect::new(0.0, 0.0, 100.0, 40.0), &Corners::uniform(10.0));
        let count = |k: &str| ops.ops().iter().filter(|o| o.keyword() == k).count();
        assert_eq!(count("m"), 1);
        assert_eq!(count("l"), 4);
        assert_eq!(count("c"), 4);
        assert_eq!(count("h"), 1);
    }

    #[test]
    fn stream_keeps_buffers_in_sync() {
        let mut cs = ContentStream::new();
        let mut ops = Operators::new();
        ops.save_state().restore_state();
        cs.append(&ops);
        cs.append_raw(b"BT");
        cs.append_raw(b"ET");
        assert_eq!(cs.decoded(), b"q\nQ\nBT\nET");
        assert_eq!(decompress_to_vec_zlib(cs.compressed()).unwrap(), cs.decoded());
        assert_eq!(cs.length(), cs.compressed().len());

        let mark = cs.len();
        cs.append_raw(b" 1 w");
        cs.truncate(mark);
        assert_eq!(cs.decoded(), b"q\nQ\nBT\nET");
        assert_eq!(decompress_to_vec_zlib(cs.compressed()).unwrap(), cs.decoded());
    }
}
