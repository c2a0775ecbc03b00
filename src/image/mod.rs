//! # Images
//!
//! The engine consumes images through [`ImageSource`]: pixel dimensions,
//! RGB bytes, an optional alpha channel and an optional JPEG fast path.
//! [`DecodedImage`] is the bundled implementation. It loads images from file
//! paths, data URIs, or raw base64 strings. JPEG images pass through without
//! re-encoding (DCTDecode); PNG images are decoded to RGB pixels with a
//! separate alpha channel that becomes the soft mask.

pub mod qr;

use std::fmt;
use std::io::Cursor;

use crate::error::ResourceError;

/// The image collaborator interface.
pub trait ImageSource: fmt::Debug + Send + Sync {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    fn has_alpha(&self) -> bool;

    /// `width * height * 3` bytes.
    fn rgb_bytes(&self) -> Result<Vec<u8>, ResourceError>;

    /// `width * height` bytes of opacity, when [`has_alpha`](Self::has_alpha).
    fn alpha_bytes(&self) -> Option<Vec<u8>>;

    /// Original JPEG bytes, embeddable as-is.
    fn jpeg_bytes(&self) -> Option<&[u8]> {
        None
    }
}

#[derive(Clone, PartialEq, Eq)]
enum Pixels {
    /// Raw JPEG bytes, embedded directly.
    Jpeg { data: Vec<u8> },
    /// Decoded RGB pixels plus an alpha channel (`None` when fully opaque).
    Raw { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A loaded image ready for embedding.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Pixels,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.pixels {
            Pixels::Jpeg { .. } => "jpeg",
            Pixels::Raw { alpha: Some(_), .. } => "rgba",
            Pixels::Raw { alpha: None, .. } => "rgb",
        };
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("kind", &kind)
            .finish()
    }
}

impl DecodedImage {
    /// Load an image from a source string.
    ///
    /// Supported `src` formats:
    /// - `data:image/...;base64,...`
    /// - a file path starting with `/`, `./` or `../`
    /// - raw base64-encoded image data
    pub fn load(src: &str) -> Result<Self, ResourceError> {
        let raw = read_source_bytes(src)?;
        Self::from_bytes(&raw)
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, ResourceError> {
        let raw = std::fs::read(path)?;
        Self::from_bytes(&raw)
    }

    /// Detect the format from magic bytes and decode accordingly.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ResourceError> {
        if data.len() < 4 {
            return Err(ResourceError::Image("image data too short".to_string()));
        }
        if is_jpeg(data) {
            decode_jpeg(data)
        } else if is_png(data) {
            decode_png(data)
        } else {
            Err(ResourceError::Image(
                "unsupported image format (expected JPEG or PNG)".to_string(),
            ))
        }
    }

    /// Build an image from raw RGB pixels and an optional alpha channel.
    pub fn from_rgb(
        width: u32,
        height: u32,
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
    ) -> Result<Self, ResourceError> {
        let pixels = width as usize * height as usize;
        if rgb.len() != pixels * 3 {
            return Err(ResourceError::Image(format!(
                "expected {} RGB bytes for {}x{}, got {}",
                pixels * 3,
                width,
                height,
                rgb.len()
            )));
        }
        if let Some(a) = &alpha {
            if a.len() != pixels {
                return Err(ResourceError::Image(format!(
                    "expected {} alpha bytes for {}x{}, got {}",
                    pixels,
                    width,
                    height,
                    a.len()
                )));
            }
        }
        let alpha = alpha.filter(|a| a.iter().any(|&v| v != 255));
        Ok(Self {
            width,
            height,
            pixels: Pixels::Raw { rgb, alpha },
        })
    }

    pub fn is_jpeg(&self) -> bool {
        matches!(self.pixels, Pixels::Jpeg { .. })
    }
}

impl ImageSource for DecodedImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn has_alpha(&self) -> bool {
        matches!(self.pixels, Pixels::Raw { alpha: Some(_), .. })
    }

    fn rgb_bytes(&self) -> Result<Vec<u8>, ResourceError> {
        match &self.pixels {
            Pixels::Raw { rgb, .. } => Ok(rgb.clone()),
            Pixels::Jpeg { data, .. } => {
                let img = ::image::load_from_memory(data)
                    .map_err(|e| ResourceError::Image(format!("failed to decode JPEG: {}", e)))?;
                Ok(img.to_rgb8().into_raw())
            }
        }
    }

    fn alpha_bytes(&self) -> Option<Vec<u8>> {
        match &self.pixels {
            Pixels::Raw { alpha, .. } => alpha.clone(),
            Pixels::Jpeg { .. } => None,
        }
    }

    fn jpeg_bytes(&self) -> Option<&[u8]> {
        match &self.pixels {
            Pixels::Jpeg { data, .. } => Some(data),
            Pixels::Raw { .. } => None,
        }
    }

}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, ResourceError> {
    if src.starts_with("data:image/") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| ResourceError::Image("invalid data URI: missing comma".to_string()))?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    // Only explicit path prefixes, so base64 text (which may contain '/')
    // is not mistaken for a path.
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        return std::fs::read(src).map_err(ResourceError::from);
    }

    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>, ResourceError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| ResourceError::Image(format!("base64 decode error: {}", e)))
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

/// JPEG: read dimensions without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<DecodedImage, ResourceError> {
    let reader = ::image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ResourceError::Image(format!("JPEG format detection error: {}", e)))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ResourceError::Image(format!("failed to read JPEG dimensions: {}", e)))?;

    Ok(DecodedImage {
        width,
        height,
        pixels: Pixels::Jpeg {
            data: data.to_vec(),
        },
    })
}

/// What the frame header of a JPEG says about its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegHeader {
    /// Components per pixel: 1 gray, 3 YCbCr/RGB, 4 CMYK/YCCK.
    pub components: u8,
    /// An Adobe APP14 segment precedes the frame. Adobe writers store
    /// four-component samples inverted.
    pub adobe: bool,
}

/// Scan JPEG markers up to the SOF segment.
pub fn jpeg_header(data: &[u8]) -> Option<JpegHeader> {
    if !is_jpeg(data) {
        return None;
    }
    let mut adobe = false;
    let mut i = 2; // skip SOI
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        // SOF: length(2) precision(1) height(2) width(2) components(1)
        if is_sof {
            return data.get(i + 9).map(|&components| JpegHeader { components, adobe });
        }
        if i + 3 >= data.len() {
            return None;
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if marker == 0xEE && data[i + 4..].starts_with(b"Adobe") {
            adobe = true;
        }
        i += 2 + seg_len;
    }
    None
}

/// PNG: decode to RGBA, split into RGB + alpha.
fn decode_png(data: &[u8]) -> Result<DecodedImage, ResourceError> {
    let img = ::image::load_from_memory_with_format(data, ::image::ImageFormat::Png)
        .map_err(|e| ResourceError::Image(format!("failed to decode PNG: {}", e)))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixel_count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    DecodedImage::from_rgb(width, height, rgb, Some(alpha))
}
