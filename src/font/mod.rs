//! # Font Management
//!
//! The engine talks to fonts only through the [`Font`] trait: a glyph lookup,
//! per-glyph advance widths in 1/1000 em, vertical metrics and the bytes to
//! embed. Two implementations ship with the crate: the 14 standard PDF fonts
//! ([`StandardFont`], never embedded) and TrueType fonts parsed with
//! `ttf-parser` ([`TrueTypeFont`], embedded as Type0/CIDFontType2).
//!
//! Fonts are immutable once constructed and shared through `Arc`, so a host
//! may cache them across documents.

pub mod encoding;
pub mod standard;
pub mod truetype;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use standard::{StandardFont, StandardFontKind};
pub use truetype::TrueTypeFont;

use crate::error::ResourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontType {
    Type1,
    TrueType,
}

/// Values for the `/FontDescriptor` of an embedded font, in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontDescriptor {
    pub bbox: [i32; 4],
    pub cap_height: f64,
    pub italic_angle: f64,
    pub stem_v: u32,
    pub flags: u32,
}

/// The font collaborator interface.
pub trait Font: fmt::Debug + Send + Sync {
    /// PostScript name, used as `/BaseFont`.
    fn name(&self) -> &str;

    fn font_type(&self) -> FontType;

    fn glyph_for_char(&self, c: char) -> Option<u16>;

    /// Advance width of `glyph` in 1/1000 em.
    fn advance_width(&self, glyph: u16) -> u16;

    /// Glyph shown for characters the font cannot map.
    fn missing_glyph(&self) -> u16;

    /// Ascender in 1/1000 em (positive).
    fn ascent(&self) -> f64;

    /// Descender in 1/1000 em (negative).
    fn descent(&self) -> f64;

    /// Font program to embed; `None` for fonts the viewer supplies.
    fn embedding_stream(&self) -> Option<&[u8]>;

    /// Value of the font dictionary's `/Encoding` entry, if any.
    fn encoding_entry(&self) -> Option<&str>;

    /// Composite fonts show 2-byte glyph ids; simple fonts 1-byte codes.
    fn is_composite(&self) -> bool {
        false
    }

    fn descriptor(&self) -> FontDescriptor {
        FontDescriptor {
            bbox: [0, self.descent() as i32, 1000, self.ascent() as i32],
            cap_height: self.ascent(),
            italic_angle: 0.0,
            stem_v: 80,
            flags: 32,
        }
    }

    fn glyph_or_missing(&self, c: char) -> u16 {
        self.glyph_for_char(c).unwrap_or_else(|| self.missing_glyph())
    }

    /// Width of `c` in points at `size`.
    fn char_width(&self, c: char, size: f64) -> f64 {
        self.advance_width(self.glyph_or_missing(c)) as f64 * size / 1000.0
    }

    fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().map(|c| self.char_width(c, size)).sum()
    }

    /// Bytes that show `text` with this font in a content stream.
    fn encode(&self, text: &str) -> Vec<u8> {
        let composite = self.is_composite();
        let mut out = Vec::with_capacity(text.len() * if composite { 2 } else { 1 });
        for c in text.chars() {
            let gid = self.glyph_or_missing(c);
            if composite {
                out.extend_from_slice(&gid.to_be_bytes());
            } else {
                out.push(gid as u8);
            }
        }
        out
    }
}

/// Two font handles denote the same PDF font resource.
pub fn same_font(a: &Arc<dyn Font>, b: &Arc<dyn Font>) -> bool {
    Arc::ptr_eq(a, b)
        || (a.name() == b.name()
            && a.font_type() == b.font_type()
            && a.embedding_stream().map(<[u8]>::len) == b.embedding_stream().map(<[u8]>::len))
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
        }
    }
}

/// Maps `(family, weight, italic)` to fonts.
#[derive(Debug)]
pub struct FontRegistry {
    fonts: HashMap<FontKey, Arc<dyn Font>>,
    fallback: Arc<dyn Font>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    /// A registry holding the standard 14 fonts.
    pub fn new() -> Self {
        use StandardFontKind as K;
        let standard_mappings = [
            (("Helvetica", 400, false), K::Helvetica),
            (("Helvetica", 700, false), K::HelveticaBold),
            (("Helvetica", 400, true), K::HelveticaOblique),
            (("Helvetica", 700, true), K::HelveticaBoldOblique),
            (("Times", 400, false), K::TimesRoman),
            (("Times", 700, false), K::TimesBold),
            (("Times", 400, true), K::TimesItalic),
            (("Times", 700, true), K::TimesBoldItalic),
            (("Courier", 400, false), K::Courier),
            (("Courier", 700, false), K::CourierBold),
            (("Courier", 400, true), K::CourierOblique),
            (("Courier", 700, true), K::CourierBoldOblique),
            (("Symbol", 400, false), K::Symbol),
            (("ZapfDingbats", 400, false), K::ZapfDingbats),
        ];

        let mut fonts: HashMap<FontKey, Arc<dyn Font>> = HashMap::new();
        for ((family, weight, italic), kind) in standard_mappings {
            fonts.insert(
                FontKey::new(family, weight, italic),
                Arc::new(StandardFont::new(kind)),
            );
        }

        Self {
            fonts,
            fallback: Arc::new(StandardFont::new(K::Helvetica)),
        }
    }

    /// Look up a font, snapping the weight to 400/700 and falling back to
    /// Helvetica when the family is unknown.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> Arc<dyn Font> {
        if let Some(font) = self.fonts.get(&FontKey::new(family, weight, italic)) {
            return Arc::clone(font);
        }

        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        if let Some(font) = self.fonts.get(&FontKey::new(family, snapped_weight, italic)) {
            return Arc::clone(font);
        }

        // Families registered under a single style (Symbol, ZapfDingbats).
        if let Some(font) = self.fonts.get(&FontKey::new(family, 400, false)) {
            return Arc::clone(font);
        }

        log::debug!("font family '{}' not registered, using Helvetica", family);
        self.fonts
            .get(&FontKey::new("Helvetica", snapped_weight, italic))
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// The standard font of the given kind.
    pub fn standard(&self, kind: StandardFontKind) -> Arc<dyn Font> {
        Arc::new(StandardFont::new(kind))
    }

    /// Register any font under a family/weight/style key.
    pub fn register(&mut self, family: &str, weight: u32, italic: bool, font: Arc<dyn Font>) {
        log::debug!("registered font {} as {}/{}/{}", font.name(), family, weight, italic);
        self.fonts.insert(FontKey::new(family, weight, italic), font);
    }

    /// Parse and register a TrueType font.
    pub fn register_truetype(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        data: Vec<u8>,
    ) -> Result<Arc<dyn Font>, ResourceError> {
        let font: Arc<dyn Font> = Arc::new(TrueTypeFont::from_bytes(data, family)?);
        self.register(family, weight, italic, Arc::clone(&font));
        Ok(font)
    }

    /// Read a TrueType file from disk and register it.
    pub fn load_truetype(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Arc<dyn Font>, ResourceError> {
        let data = std::fs::read(path)?;
        self.register_truetype(family, weight, italic, data)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FontKey, &Arc<dyn Font>)> {
        self.fonts.iter()
    }
}
