//! # Folio
//!
//! A PDF layout and content-stream emission engine.
//!
//! Application code builds layout elements (paragraphs, tables, lists,
//! shapes, images, equations) and hands them to a page layout. The layout measures
//! each element against the space left on the page, places it honoring
//! its margin, padding, border and alignment, starts a new column or page
//! when it does not fit, and paints it as PDF operators into the page's
//! content stream. Fonts and images are registered in the page's resource
//! dictionary as they are used.
//!
//! ## Architecture
//!
//! ```text
//! Elements (element::*)       : StyleBox + measure / paint
//!       ↓
//!   [measure]  : intrinsic sizes, inline line partition, table sizing
//!       ↓
//!   [layout]   : single / multi column and browser-like flow, pagination
//!       ↓
//!   [pdf]      : content streams, resources, serialization to bytes
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use folio::{ColumnLayout, Document, PageLayout, Paragraph};
//!
//! let mut doc = Document::default();
//! let style = doc.text_style()?;
//! let mut layout = ColumnLayout::single(&doc);
//! layout.add(&mut doc, Box::new(Paragraph::new("Hello", style)))?;
//! doc.save("hello.pdf")?;
//! # Ok::<(), folio::Error>(())
//! ```

pub mod color;
pub mod config;
pub mod element;
pub mod error;
pub mod expr;
pub mod font;
pub mod geometry;
pub mod image;
pub mod layout;
pub mod measure;
pub mod pdf;
pub mod style;
pub mod text;

pub use color::Color;
pub use config::{DocumentConfig, PageSize};
pub use element::{
    Chunk, Equation, Fit, HorizontalRule, Image, InlineFlow, LayoutElement, LineBreakChunk, List,
    ListItem, ListStyle, PaintContext, Paragraph, Shape, Table, TableCell,
};
pub use error::{ConfigError, Error, InputError, ResourceError, Result};
pub use expr::Expr;
pub use geometry::{Edges, Point, Rect};
pub use layout::{BrowserLayout, ColumnLayout, PageLayout, Placement};
pub use pdf::{Document, LayoutInfo, Page, PaintRecord};
pub use style::{BorderSides, Corners, HAlign, StyleBox, VAlign};
pub use text::TextStyle;

/// Lay out `elements` in a single column on a fresh document built from
/// `config` and return the PDF bytes.
pub fn render(
    config: DocumentConfig,
    elements: impl IntoIterator<Item = Box<dyn LayoutElement>>,
) -> Result<Vec<u8>> {
    let mut doc = Document::new(config);
    let mut layout = ColumnLayout::single(&doc);
    for element in elements {
        layout.add(&mut doc, element)?;
    }
    layout.finish(&mut doc)?;
    Ok(doc.to_bytes())
}
