//! # Page Resources
//!
//! Every page owns a font sub-dictionary and an XObject sub-dictionary.
//! Registration deduplicates by structural equality and hands out the
//! smallest unused name of the form `F<n>` / `Im<n>`, so the `n`th unique
//! image on a page is always `Im<n>`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::ResourceError;
use crate::font::{same_font, Font};
use crate::image::{jpeg_header, ImageSource, JpegHeader};

/// Color space of an image XObject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRgb,
    DeviceGray,
    /// `inverted` samples are stored as `1 - value`.
    DeviceCmyk { inverted: bool },
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceCmyk { .. } => "DeviceCMYK",
        }
    }

    /// `/Decode` array mapping stored samples back to color values.
    pub fn decode_array(&self) -> Option<&'static str> {
        match self {
            ColorSpace::DeviceCmyk { inverted: true } => Some("[1 0 1 0 1 0 1 0]"),
            _ => None,
        }
    }

    /// Color space of a JPEG embedded as-is.
    fn of_jpeg(data: &[u8]) -> Self {
        match jpeg_header(data) {
            Some(JpegHeader { components: 1, .. }) => ColorSpace::DeviceGray,
            Some(JpegHeader {
                components: 4,
                adobe,
            }) => ColorSpace::DeviceCmyk { inverted: adobe },
            _ => ColorSpace::DeviceRgb,
        }
    }
}

/// Stream filter of an image XObject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// JPEG bytes embedded unchanged.
    Dct,
    /// zlib-compressed raw samples.
    Flate,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        }
    }
}

/// An image ready to be written as an `/XObject /Image`, 8 bits per
/// component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub filter: ImageFilter,
    /// Encoded stream bytes.
    pub data: Vec<u8>,
    /// zlib-compressed `DeviceGray` soft mask.
    pub smask: Option<Vec<u8>>,
}

impl ImageXObject {
    /// Encode an image: JPEG pass-through when the source is an opaque
    /// JPEG, compressed RGB plus an optional soft mask otherwise.
    pub fn from_source(source: &dyn ImageSource) -> Result<Self, ResourceError> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(ResourceError::Image(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        if !source.has_alpha() {
            if let Some(jpeg) = source.jpeg_bytes() {
                return Ok(Self {
                    width,
                    height,
                    color_space: ColorSpace::of_jpeg(jpeg),
                    filter: ImageFilter::Dct,
                    data: jpeg.to_vec(),
                    smask: None,
                });
            }
        }

        let rgb = source.rgb_bytes()?;
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(ResourceError::Image(format!(
                "expected {} RGB bytes, got {}",
                expected,
                rgb.len()
            )));
        }
        let smask = match source.alpha_bytes() {
            Some(alpha) if source.has_alpha() => Some(compress_to_vec_zlib(&alpha, 6)),
            _ => None,
        };
        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceRgb,
            filter: ImageFilter::Flate,
            data: compress_to_vec_zlib(&rgb, 6),
            smask,
        })
    }
}

/// A font registered on a page, with the glyphs shown through it.
#[derive(Debug, Clone)]
pub struct FontResource {
    pub font: Arc<dyn Font>,
    /// Glyph id to the character it was shown for, for `/ToUnicode`.
    pub used: BTreeMap<u16, char>,
}

/// Names present at a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMark {
    fonts: BTreeSet<String>,
    xobjects: BTreeSet<String>,
}

/// The `/Resources` subtree of one page.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    fonts: BTreeMap<String, FontResource>,
    xobjects: BTreeMap<String, Arc<ImageXObject>>,
}

/// Smallest `prefix<n>` (n ≥ 1) not yet taken.
fn next_free_name<V>(prefix: &str, taken: &BTreeMap<String, V>) -> String {
    (1..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|name| !taken.contains_key(name))
        .unwrap_or_else(|| format!("{}0", prefix))
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of `font` on this page, registering it if needed.
    pub fn register_font(&mut self, font: &Arc<dyn Font>) -> String {
        if let Some((name, _)) = self.fonts.iter().find(|(_, r)| same_font(&r.font, font)) {
            return name.clone();
        }
        let name = next_free_name("F", &self.fonts);
        log::trace!("registered font {} as /{}", font.name(), name);
        self.fonts.insert(
            name.clone(),
            FontResource {
                font: Arc::clone(font),
                used: BTreeMap::new(),
            },
        );
        name
    }

    /// Remember which glyphs of font `name` showed which characters.
    pub fn note_glyphs(&mut self, name: &str, text: &str) {
        if let Some(res) = self.fonts.get_mut(name) {
            for c in text.chars() {
                let gid = res.font.glyph_or_missing(c);
                res.used.entry(gid).or_insert(c);
            }
        }
    }

    /// Name of `image` on this page, registering it if needed.
    pub fn register_image(&mut self, image: ImageXObject) -> String {
        if let Some((name, _)) = self.xobjects.iter().find(|(_, x)| ***x == image) {
            return name.clone();
        }
        let name = next_free_name("Im", &self.xobjects);
        log::trace!(
            "registered {}x{} image as /{}",
            image.width,
            image.height,
            name
        );
        self.xobjects.insert(name.clone(), Arc::new(image));
        name
    }

    pub fn fonts(&self) -> &BTreeMap<String, FontResource> {
        &self.fonts
    }

    pub fn xobjects(&self) -> &BTreeMap<String, Arc<ImageXObject>> {
        &self.xobjects
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty() && self.xobjects.is_empty()
    }

    pub fn mark(&self) -> ResourceMark {
        ResourceMark {
            fonts: self.fonts.keys().cloned().collect(),
            xobjects: self.xobjects.keys().cloned().collect(),
        }
    }

    /// Drop every name registered after `mark`.
    pub fn reset_to(&mut self, mark: &ResourceMark) {
        self.fonts.retain(|name, _| mark.fonts.contains(name));
        self.xobjects.retain(|name, _| mark.xobjects.contains(name));
    }
}
