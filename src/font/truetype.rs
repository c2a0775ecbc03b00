//! TrueType/OpenType fonts parsed with `ttf-parser` and embedded whole.
//!
//! In the content stream the font is addressed through Identity-H: every
//! glyph is shown as its 2-byte glyph id.

use std::collections::HashMap;

use crate::error::ResourceError;

use super::{Font, FontDescriptor, FontType};

/// A parsed TrueType font. Immutable after construction.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    name: String,
    data: Vec<u8>,
    units_per_em: u16,
    glyph_ids: HashMap<char, u16>,
    advances: Vec<u16>,
    ascent: f64,
    descent: f64,
    descriptor: FontDescriptor,
}

impl TrueTypeFont {
    /// Parse `data`. `fallback_name` is used when the font carries no
    /// PostScript name.
    pub fn from_bytes(data: Vec<u8>, fallback_name: &str) -> Result<Self, ResourceError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| {
            ResourceError::Font(format!("failed to parse font '{}': {}", fallback_name, e))
        })?;

        let units_per_em = face.units_per_em().max(1);
        let scale = 1000.0 / units_per_em as f64;

        let mut glyph_ids = HashMap::new();
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(gid) = face.glyph_index(ch) {
                    glyph_ids.insert(ch, gid.0);
                }
            }
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| {
                let adv = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0);
                (adv as f64 * scale).round() as u16
            })
            .collect();

        let ps_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string());
        let name = sanitize_font_name(ps_name.as_deref().unwrap_or(fallback_name));

        let ascent = face.ascender() as f64 * scale;
        let descent = face.descender() as f64 * scale;
        let bbox = face.global_bounding_box();
        let descriptor = FontDescriptor {
            bbox: [
                (bbox.x_min as f64 * scale) as i32,
                (bbox.y_min as f64 * scale) as i32,
                (bbox.x_max as f64 * scale) as i32,
                (bbox.y_max as f64 * scale) as i32,
            ],
            cap_height: face.capital_height().map(|h| h as f64 * scale).unwrap_or(ascent),
            italic_angle: if face.is_italic() { -12.0 } else { 0.0 },
            stem_v: if face.is_bold() { 120 } else { 80 },
            flags: 4,
        };

        log::debug!(
            "parsed font {} ({} glyphs, {} mapped chars)",
            name,
            face.number_of_glyphs(),
            glyph_ids.len()
        );

        Ok(Self {
            name,
            data,
            units_per_em,
            glyph_ids,
            advances,
            ascent,
            descent,
            descriptor,
        })
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }
}

impl Font for TrueTypeFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn font_type(&self) -> FontType {
        FontType::TrueType
    }

    fn glyph_for_char(&self, c: char) -> Option<u16> {
        self.glyph_ids.get(&c).copied()
    }

    fn advance_width(&self, glyph: u16) -> u16 {
        self.advances.get(glyph as usize).copied().unwrap_or(0)
    }

    fn missing_glyph(&self) -> u16 {
        0
    }

    fn ascent(&self) -> f64 {
        self.ascent
    }

    fn descent(&self) -> f64 {
        self.descent
    }

    fn embedding_stream(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn encoding_entry(&self) -> Option<&str> {
        Some("Identity-H")
    }

    fn is_composite(&self) -> bool {
        true
    }

    fn descriptor(&self) -> FontDescriptor {
        self.descriptor
    }
}

/// Strip characters that are not allowed in a PDF name.
pub fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "CustomFont".to_string()
    } else {
        cleaned
    }
}
