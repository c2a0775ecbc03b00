//! # Document Model
//!
//! A [`Document`] is an ordered list of [`Page`]s plus an info dictionary
//! and the paint log. Each page owns its [`ContentStream`] and its
//! [`Resources`]; elements paint into a page through
//! [`PaintContext`](crate::element::PaintContext).
//!
//! ```text
//! Document ── pages: Vec<Page> ── content: ContentStream (decoded + zlib)
//!          │                   └─ resources: Resources (F<n>, Im<n>)
//!          ├─ fonts: FontRegistry
//!          └─ paint_log: Vec<PaintRecord>
//! ```
//!
//! Serialization to bytes lives in [`writer`].

pub mod content;
pub mod resources;
pub mod writer;

use std::path::Path;

use serde::Serialize;

use crate::config::DocumentConfig;
use crate::error::{Error, ResourceError, Result};
use crate::font::FontRegistry;
use crate::geometry::Rect;
use crate::text::TextStyle;

pub use content::{ContentStream, Op, Operators, TextItem};
pub use resources::{ImageXObject, ResourceMark, Resources};

/// A single page: its size, content stream and resource dictionary.
#[derive(Debug, Clone)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub content: ContentStream,
    pub resources: Resources,
}

/// State of a page at a point in time, for rolling back a failed paint.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    content_len: usize,
    resources: ResourceMark,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: ContentStream::new(),
            resources: Resources::new(),
        }
    }

    /// The page box.
    pub fn media_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            content_len: self.content.len(),
            resources: self.resources.mark(),
        }
    }

    /// Undo every append and registration made since `snapshot`.
    pub fn restore(&mut self, snapshot: &PageSnapshot) {
        self.content.truncate(snapshot.content_len);
        self.resources.reset_to(&snapshot.resources);
    }
}

/// The document information dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub producer: String,
}

/// One successful paint call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintRecord {
    /// Position in paint order, starting at 0.
    pub seq: usize,
    pub kind: &'static str,
    pub page_index: usize,
    pub available: Rect,
    pub painted: Rect,
}

/// Serializable paint metadata for debug overlays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub pages: Vec<PageInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<PaintRecord>,
}

impl LayoutInfo {
    pub fn from_document(doc: &Document) -> Self {
        let pages = doc
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| PageInfo {
                width: page.width,
                height: page.height,
                elements: doc
                    .paint_log
                    .iter()
                    .filter(|r| r.page_index == i)
                    .cloned()
                    .collect(),
            })
            .collect();
        LayoutInfo { pages }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct Document {
    config: DocumentConfig,
    fonts: FontRegistry,
    pages: Vec<Page>,
    pub info: Info,
    paint_log: Vec<PaintRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

impl Document {
    pub fn new(config: DocumentConfig) -> Self {
        let info = Info {
            title: config.title.clone(),
            author: config.author.clone(),
            subject: config.subject.clone(),
            producer: format!("Folio {}", env!("CARGO_PKG_VERSION")),
        };
        Self {
            config,
            fonts: FontRegistry::new(),
            pages: Vec::new(),
            info,
            paint_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    /// The configured default text style.
    pub fn text_style(&self) -> Result<TextStyle> {
        let font = self.fonts.resolve(&self.config.font_family, 400, false);
        Ok(TextStyle::new(font, self.config.font_size)?
            .with_color(self.config.font_color)
            .with_line_height(self.config.line_height)?)
    }

    /// A text style in the configured family with another weight/style/size.
    pub fn styled_text(&self, weight: u32, italic: bool, size: f64) -> Result<TextStyle> {
        let font = self.fonts.resolve(&self.config.font_family, weight, italic);
        Ok(TextStyle::new(font, size)?
            .with_color(self.config.font_color)
            .with_line_height(self.config.line_height)?)
    }

    /// Append an empty page of the configured size; returns its index.
    pub fn new_page(&mut self) -> usize {
        let (width, height) = self.config.page_size.dimensions();
        self.pages.push(Page::new(width, height));
        let index = self.pages.len() - 1;
        log::debug!("created page {} ({:.2} x {:.2})", index + 1, width, height);
        index
    }

    /// Remove page `index` if it is the last page and nothing was painted
    /// on it. Returns whether the page was removed.
    pub(crate) fn discard_empty_page(&mut self, index: usize) -> bool {
        let removable = index + 1 == self.pages.len()
            && self.pages[index].content.is_empty()
            && !self.paint_log.iter().any(|r| r.page_index == index);
        if removable {
            self.pages.pop();
            log::debug!("discarded empty page {}", index + 1);
        }
        removable
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn paint_log(&self) -> &[PaintRecord] {
        &self.paint_log
    }

    /// Split borrow of one page and the paint log, for painting.
    pub(crate) fn page_and_log(
        &mut self,
        index: usize,
    ) -> Result<(&mut Page, &mut Vec<PaintRecord>)> {
        let page = self
            .pages
            .get_mut(index)
            .ok_or_else(|| Error::Internal(format!("page {} does not exist", index)))?;
        Ok((page, &mut self.paint_log))
    }

    pub(crate) fn truncate_log(&mut self, len: usize) {
        self.paint_log.truncate(len);
    }

    pub fn layout_info(&self) -> LayoutInfo {
        LayoutInfo::from_document(self)
    }

    /// Serialize the document to PDF bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        writer::serialize(self)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes())
            .map_err(|e| Error::resource("Document", ResourceError::Io(e)))
    }
}
