//! Integration tests for the Folio layout pipeline.
//!
//! These tests exercise the full path from layout elements to PDF bytes.
//! They verify:
//! - Elements land where the page layout puts them
//! - Tables size their columns and emit borders after content
//! - Overflowing content paginates without splitting elements
//! - Inline flows wrap and stack lines
//! - Images and fonts are registered once per page and document
//! - Rounded borders are drawn with curves

use std::io::Cursor;
use std::sync::Arc;

use folio::element::{border_ops, Fit, PaintContext};
use folio::font::{StandardFont, StandardFontKind};
use folio::image::DecodedImage;
use folio::pdf::Op;
use folio::*;

// ─── Helpers ────────────────────────────────────────────────────

fn helvetica(size: f64) -> TextStyle {
    TextStyle::new(Arc::new(StandardFont::new(StandardFontKind::Helvetica)), size).unwrap()
}

fn courier(size: f64) -> TextStyle {
    TextStyle::new(Arc::new(StandardFont::new(StandardFontKind::Courier)), size).unwrap()
}

fn content_text(doc: &Document, page: usize) -> String {
    String::from_utf8(doc.page(page).unwrap().content.decoded().to_vec()).unwrap()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

/// A fixed-size box that paints nothing of its own.
#[derive(Debug)]
struct Fixed {
    style: StyleBox,
    width: f64,
    height: f64,
}

impl LayoutElement for Fixed {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Fixed"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        Ok(Fit::check(available, self.width, self.height))
    }

    fn paint_content(&self, _ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            self.width,
            self.height,
        ))
    }
}

// ─── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_single_paragraph_on_one_page() {
    let mut doc = Document::default();
    let mut layout = ColumnLayout::single(&doc);
    layout
        .add(&mut doc, Box::new(Paragraph::new("Hello", helvetica(12.0))))
        .unwrap();

    assert_eq!(doc.page_count(), 1);
    let rect = layout.placements()[0].rect;
    assert_eq!(rect.x, 60.0);
    let expected_y = doc.page(0).unwrap().height - 60.0 - 12.0;
    assert!((rect.y - expected_y).abs() < 1e-6, "y = {}", rect.y);

    let text = content_text(&doc, 0);
    assert_eq!(count(&text, "BT\n"), 1);
    assert_eq!(count(&text, "ET\n"), 1);
    assert!(text.contains("/F1 12 Tf\n"));
    assert!(text.contains("(Hello) Tj\n"));

    let page = doc.page(0).unwrap();
    let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(page.content.compressed()).unwrap();
    assert_eq!(inflated, page.content.decoded());
    assert_eq!(page.content.length(), page.content.compressed().len());

    let bytes = doc.to_bytes();
    assert_valid_pdf(&bytes);
    let pdf = String::from_utf8_lossy(&bytes);
    assert!(pdf.contains("/BaseFont /Helvetica"));
    assert!(pdf.contains("/Filter /FlateDecode"));
}

#[test]
fn test_table_with_uniform_padding() {
    let mut doc = Document::default();
    let mut table = Table::new(2, 2).unwrap();
    for _ in 0..4 {
        table.add(Paragraph::new("x", helvetica(12.0))).unwrap();
    }
    table.set_uniform_padding(Edges::uniform(5.0)).unwrap();
    table.set_uniform_border(0.5, Color::BLACK).unwrap();

    let available = doc.config().usable_area().width;
    let sizes = table.layout(available).unwrap().unwrap();
    assert!((sizes.column_widths[0] - sizes.column_widths[1]).abs() < 1e-9);
    assert!((sizes.width() - available).abs() < 1e-6);

    let mut layout = ColumnLayout::single(&doc);
    layout.add(&mut doc, Box::new(table)).unwrap();

    // Font size plus padding; the border sits inside the cell box.
    let cells: Vec<Rect> = doc
        .paint_log()
        .iter()
        .filter(|r| r.kind == "TableCell")
        .map(|r| r.painted)
        .collect();
    assert_eq!(cells.len(), 4);
    for cell in &cells {
        assert!((cell.height - (12.0 + 10.0 + 1.0)).abs() < 1e-6, "{cell}");
    }

    // Each cell's border is stroked after its text.
    let text = content_text(&doc, 0);
    let mut awaiting_border = false;
    for line in text.lines() {
        if line.ends_with("Tj") {
            assert!(!awaiting_border, "text shown before the previous cell's border");
            awaiting_border = true;
        } else if line == "S" {
            assert!(awaiting_border, "border stroked before its cell's text");
            awaiting_border = false;
        }
    }
    assert!(!awaiting_border);
    assert_eq!(count(&text, " Tj\n"), 4);
    assert_eq!(count(&text, "\nS\n"), 4);
}

#[test]
fn test_overflow_triggers_new_pages() {
    let mut doc = Document::new(DocumentConfig {
        page_size: PageSize::Custom {
            width: 595.0,
            height: 800.0,
        },
        page_margin: Edges::uniform(50.0),
        ..DocumentConfig::default()
    });
    assert_eq!(doc.config().usable_area().height, 700.0);

    let mut layout = ColumnLayout::single(&doc);
    for i in 0..100 {
        let p = Paragraph::new(format!("Paragraph {i}"), helvetica(20.0));
        layout.add(&mut doc, Box::new(p)).unwrap();
    }

    assert_eq!(doc.page_count(), 3);
    let per_page: Vec<usize> = (0..3)
        .map(|p| layout.placements().iter().filter(|pl| pl.page_index == p).count())
        .collect();
    assert_eq!(per_page, [35, 35, 30]);
    let area = doc.config().usable_area();
    for placement in layout.placements() {
        assert_eq!(placement.rect.height, 20.0);
        assert!(area.contains(&placement.rect), "{}", placement.rect);
    }
    for page in 0..3 {
        let text = content_text(&doc, page);
        let expected = per_page[page];
        assert_eq!(count(&text, "BT\n"), expected);
    }
}

#[test]
fn test_inline_flow_line_break() {
    let mut doc = Document::default();
    doc.new_page();
    let mut flow = InlineFlow::new();
    for _ in 0..10 {
        flow.push(Chunk::new("ABCDEFGHIJ", courier(10.0)));
    }
    let lines = flow.lines(500.0).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 8);
    assert_eq!(lines[1].len(), 2);

    let mut ctx = PaintContext::new(&mut doc, 0).unwrap();
    flow.paint(&mut ctx, &Rect::new(0.0, 0.0, 500.0, 200.0)).unwrap();
    let chunks: Vec<Rect> = doc
        .paint_log()
        .iter()
        .filter(|r| r.kind == "Chunk")
        .map(|r| r.painted)
        .collect();
    assert_eq!(chunks.len(), 10);
    assert!(chunks[..8].iter().all(|r| r.top() == 200.0));
    assert!(chunks[8..].iter().all(|r| r.top() == 190.0));
    let line_width: f64 = chunks[..8].iter().map(|r| r.width).sum();
    assert!(line_width <= 500.0);
}

#[test]
fn test_image_dedup() {
    let pixels = ::image::RgbImage::from_fn(64, 64, |x, y| {
        ::image::Rgb([(x * 4) as u8, (y * 4) as u8, 128])
    });
    let mut png = Vec::new();
    ::image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut png), ::image::ImageOutputFormat::Png)
        .unwrap();

    let mut doc = Document::default();
    let mut layout = ColumnLayout::single(&doc);
    for _ in 0..2 {
        let source = DecodedImage::from_bytes(&png).unwrap();
        layout
            .add(&mut doc, Box::new(Image::new(Arc::new(source))))
            .unwrap();
    }

    let page = doc.page(0).unwrap();
    let names: Vec<&String> = page.resources.xobjects().keys().collect();
    assert_eq!(names, ["Im1"]);
    assert_eq!(count(&content_text(&doc, 0), "/Im1 Do\n"), 2);

    let bytes = doc.to_bytes();
    assert_valid_pdf(&bytes);
    assert_eq!(count(&String::from_utf8_lossy(&bytes), "/Subtype /Image"), 1);
}

#[test]
fn test_rounded_border_rectangle() {
    let mut style = StyleBox::default();
    style.set_border(1.0, Color::BLACK).unwrap();
    style.set_border_radius(Corners::uniform(10.0)).unwrap();
    let rect = Rect::new(20.0, 30.0, 100.0, 40.0);
    let ops = border_ops(&style, &rect);

    let keywords: Vec<&str> = ops.ops().iter().map(|o| o.keyword()).collect();
    assert_eq!(keywords.iter().filter(|k| **k == "l").count(), 4);
    assert_eq!(keywords.iter().filter(|k| **k == "c").count(), 4);
    assert_eq!(keywords.first(), Some(&"q"));
    assert_eq!(keywords.last(), Some(&"Q"));

    let mut points = Vec::new();
    for op in ops.ops() {
        match op {
            Op::MoveTo(x, y) | Op::LineTo(x, y) => points.push(Point::new(*x, *y)),
            Op::CurveTo(x1, y1, x2, y2, x3, y3) => {
                points.push(Point::new(*x1, *y1));
                points.push(Point::new(*x2, *y2));
                points.push(Point::new(*x3, *y3));
            }
            _ => {}
        }
    }
    let bbox = Rect::bounding(points).unwrap();
    assert!((bbox.x - rect.x).abs() < 1e-9);
    assert!((bbox.y - rect.y).abs() < 1e-9);
    assert!((bbox.width - 100.0).abs() < 1e-9);
    assert!((bbox.height - 40.0).abs() < 1e-9);
}

// ─── Pipeline ───────────────────────────────────────────────────

#[test]
fn test_rounded_border_painted_by_element() {
    let mut doc = Document::default();
    let mut element = Fixed {
        style: StyleBox::default(),
        width: 98.0,
        height: 38.0,
    };
    element.style.set_border(1.0, Color::BLACK).unwrap();
    element.style.set_border_radius(Corners::uniform(10.0)).unwrap();
    element.style.background = Some(Color::rgb8(240, 240, 240));

    let mut layout = ColumnLayout::single(&doc);
    layout.add(&mut doc, Box::new(element)).unwrap();
    let rect = layout.placements()[0].rect;
    assert_eq!((rect.width, rect.height), (100.0, 40.0));

    let text = content_text(&doc, 0);
    // Background fill and border stroke both follow the rounded outline.
    assert_eq!(count(&text, " c\n"), 8);
    assert!(text.find("\nf\n").unwrap() < text.find("\nS\n").unwrap());
}

#[test]
fn test_page_overflow_names_the_element() {
    let mut doc = Document::default();
    let mut layout = ColumnLayout::single(&doc);
    let tall = Fixed {
        style: StyleBox::default(),
        width: 10.0,
        height: 5000.0,
    };
    let err = layout.add(&mut doc, Box::new(tall)).unwrap_err();
    assert!(err.to_string().contains("10.00 x 5000.00"), "{err}");
    match err {
        Error::PageOverflow {
            kind,
            width,
            height,
        } => {
            assert_eq!(kind, "Fixed");
            assert_eq!((width, height), (10.0, 5000.0));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(doc.page_count(), 1);
    assert!(doc.page(0).unwrap().content.is_empty());
}

#[test]
fn test_fonts_shared_across_pages_written_once() {
    let mut doc = Document::new(DocumentConfig {
        page_size: PageSize::Custom {
            width: 300.0,
            height: 200.0,
        },
        page_margin: Edges::uniform(20.0),
        ..DocumentConfig::default()
    });
    let style = doc.text_style().unwrap();
    let mut layout = ColumnLayout::single(&doc);
    for i in 0..30 {
        layout
            .add(&mut doc, Box::new(Paragraph::new(format!("Line {i}"), style.clone())))
            .unwrap();
    }
    assert!(doc.page_count() > 1);
    for page in doc.pages() {
        let names: Vec<&String> = page.resources.fonts().keys().collect();
        assert_eq!(names, ["F1"]);
    }
    let pdf = String::from_utf8_lossy(&doc.to_bytes()).into_owned();
    assert_eq!(count(&pdf, "/BaseFont /Helvetica"), 1);
    assert_eq!(count(&pdf, "/Type /Page "), doc.page_count());
}

#[test]
fn test_browser_flow_end_to_end() {
    let mut doc = Document::default();
    let style = doc.text_style().unwrap();
    let mut layout = BrowserLayout::new(&doc);
    layout
        .add(&mut doc, Box::new(Paragraph::new("Heading", style.clone())))
        .unwrap();
    for word in ["one", "two", "three"] {
        layout
            .add(&mut doc, Box::new(Chunk::new(word, style.clone())))
            .unwrap();
    }
    layout.add(&mut doc, Box::new(LineBreakChunk::new())).unwrap();
    layout
        .add(&mut doc, Box::new(Chunk::new("four", style.clone())))
        .unwrap();
    layout.finish(&mut doc).unwrap();

    let kinds: Vec<&str> = layout.placements().iter().map(|p| p.kind).collect();
    assert_eq!(kinds, ["Paragraph", "InlineRow", "InlineRow"]);
    let layout_json = doc.layout_info().to_json();
    assert!(layout_json.contains("\"Chunk\""));
    assert_valid_pdf(&doc.to_bytes());
}

#[test]
fn test_render_and_save() {
    let style = Document::default().text_style().unwrap();
    let bytes = folio::render(
        DocumentConfig::default(),
        vec![Box::new(Paragraph::new("Saved", style)) as Box<dyn LayoutElement>],
    )
    .unwrap();
    assert_valid_pdf(&bytes);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    let mut doc = Document::default();
    doc.new_page();
    doc.save(&path).unwrap();
    assert_valid_pdf(&std::fs::read(&path).unwrap());
}

#[test]
fn test_config_from_json() {
    let config = DocumentConfig::from_json(
        r#"{ "pageSize": "Letter", "pageMargin": { "top": 36, "right": 36, "bottom": 36, "left": 36 } }"#,
    )
    .unwrap();
    let doc = Document::new(config);
    let area = doc.config().usable_area();
    assert_eq!(area, Rect::new(36.0, 36.0, 540.0, 720.0));

    let err = DocumentConfig::from_json("{ \"pageSize\": 12, }").unwrap_err();
    assert!(err.to_string().contains("Hint"));
}
