//! # Folio CLI
//!
//! Renders a demonstration document.
//!
//! Usage:
//!   folio [config.json] [-o output.pdf] [--qr TEXT]

use std::collections::HashMap;
use std::env;
use std::error::Error as StdError;
use std::fs;
use std::sync::Arc;

use folio::color::palette;
use folio::geometry::line_art;
use folio::image::qr::qr_code;
use folio::{
    Color, ColumnLayout, Document, DocumentConfig, Edges, Equation, HAlign, HorizontalRule, Image,
    LayoutElement, List, ListStyle, PageLayout, Paragraph, Rect, Shape, Table,
};

struct Args {
    config: Option<String>,
    output: String,
    qr: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().skip(1).collect();
    let output = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "folio-demo.pdf".to_string());
    let qr = args
        .windows(2)
        .find(|w| w[0] == "--qr")
        .map(|w| w[1].clone());
    let config = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned();
    Args { config, output, qr }
}

fn main() {
    let args = parse_args();
    match run(&args) {
        Ok(bytes) => eprintln!("✓ Written {} bytes to {}", bytes, args.output),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<usize, Box<dyn StdError>> {
    let config = match &args.config {
        Some(path) => DocumentConfig::from_json(&fs::read_to_string(path)?)?,
        None => DocumentConfig {
            title: Some("Folio demonstration".into()),
            author: Some("Folio".into()),
            ..DocumentConfig::default()
        },
    };

    let mut doc = Document::new(config);
    let elements = demo_elements(&doc, args.qr.as_deref())?;

    let mut layout = ColumnLayout::single(&doc);
    for element in elements {
        layout.add(&mut doc, element)?;
    }
    layout.finish(&mut doc)?;
    eprintln!(
        "  {} elements on {} page(s)",
        layout.placements().len(),
        doc.page_count()
    );

    let bytes = doc.to_bytes();
    fs::write(&args.output, &bytes)?;
    Ok(bytes.len())
}

fn demo_elements(
    doc: &Document,
    qr: Option<&str>,
) -> Result<Vec<Box<dyn LayoutElement>>, Box<dyn StdError>> {
    let body = doc.text_style()?;
    let bold = doc.styled_text(700, false, body.size())?;
    let accent = palette::lookup("steelblue").unwrap_or(Color::BLACK);
    let spaced = Some(Edges::new(0.0, 0.0, 10.0, 0.0));

    let mut out: Vec<Box<dyn LayoutElement>> = Vec::new();

    let title = doc.styled_text(700, false, 24.0)?.with_color(accent);
    let mut headline = Paragraph::new("Folio", title);
    headline.style.set_margin(spaced)?;
    out.push(Box::new(headline));

    let mut intro = Paragraph::new(
        "Every element measures itself against the space left on the page before it is \
         painted. Elements that do not fit move to the next page; nothing is ever split \
         across a page boundary. This paragraph is justified, so every line but the last \
         stretches its spaces to the full column width.",
        body.clone(),
    );
    intro.style.h_align = HAlign::Justified;
    intro.style.set_margin(spaced)?;
    out.push(Box::new(intro));

    let mut rule = HorizontalRule::new().with_thickness(0.5)?;
    rule.color = accent;
    rule.style.set_margin(spaced)?;
    out.push(Box::new(rule));

    let mut table = Table::new(4, 3)?;
    for header in ["Element", "Display", "Notes"] {
        table.add(Paragraph::new(header, bold.clone()))?;
    }
    let rows = [
        ("Paragraph", "block", "Greedy line breaking at UAX#14 opportunities."),
        ("Chunk", "inline", "A single run of text."),
        ("Table", "block", "Columns grow from their minimum toward their maximum width."),
    ];
    for (name, display, notes) in rows {
        table.add(Paragraph::new(name, body.clone()))?;
        table.add(Paragraph::new(display, body.clone()))?;
        table.add(Paragraph::new(notes, body.clone()))?;
    }
    table.set_uniform_padding(Edges::uniform(4.0))?;
    table.set_uniform_border(0.5, Color::rgb8(160, 160, 160))?;
    table.set_zebra(Color::rgb8(235, 240, 248), Color::WHITE);
    table.style.set_margin(spaced)?;
    out.push(Box::new(table));

    let mut list = List::new(ListStyle::Unordered, body.clone());
    list.push(Paragraph::new("Single and multi column layouts", body.clone()));
    list.push(Paragraph::new("Browser-like flow with collapsing margins", body.clone()));
    let mut nested = List::new(ListStyle::LowerAlpha, body.clone());
    nested.push(Paragraph::new("Blocks start a new row", body.clone()));
    nested.push(Paragraph::new("Inline elements share a row", body.clone()));
    list.push_list(nested);
    list.push(Paragraph::new("Deduplicated fonts and images", body.clone()));
    list.style.set_margin(spaced)?;
    out.push(Box::new(list));

    let sides = HashMap::from([("a".to_string(), 3.0), ("b".to_string(), 4.0)]);
    let mut hypotenuse = Equation::new("sqrt(a^2 + b^2)", body.clone())?.with_result(&sides)?;
    hypotenuse.style.h_align = HAlign::Center;
    hypotenuse.style.set_margin(spaced)?;
    out.push(Box::new(hypotenuse));

    let mut shapes = folio::InlineFlow::new();
    shapes.gap = 12.0;
    let square = Rect::new(0.0, 0.0, 40.0, 40.0);
    shapes.push(Shape::new(line_art::star(&square, 5)?, 40.0, 40.0)?.with_fill(accent));
    shapes.push(Shape::new(line_art::polygon(&square, 6)?, 40.0, 40.0)?);
    shapes.push(
        Shape::from_factory(40.0, 40.0, line_art::heart)?.with_fill(Color::rgb8(200, 40, 60)),
    );
    shapes.push(Shape::new(line_art::dragon_curve(&square, 8)?, 40.0, 40.0)?);
    shapes.push(Shape::from_factory(60.0, 40.0, line_art::flow_decision)?);
    shapes.style.set_margin(spaced)?;
    out.push(Box::new(shapes));

    if let Some(text) = qr {
        let code = qr_code(text, 4)?;
        let image = Image::new(Arc::new(code))
            .with_width(96.0)?
            .with_alt(format!("QR code: {text}"));
        out.push(Box::new(image));
    }

    Ok(out)
}
