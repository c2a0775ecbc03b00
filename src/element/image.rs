//! Raster images placed as XObjects.

use std::sync::Arc;

use crate::error::{InputError, Result};
use crate::geometry::{Matrix, Rect, EPSILON};
use crate::image::ImageSource;
use crate::pdf::Operators;
use crate::style::StyleBox;

use super::{Fit, LayoutElement, PaintContext};

/// An image drawn at a declared or natural size.
///
/// Without declared dimensions the image is drawn at one point per pixel.
/// With only one dimension declared the other follows the aspect ratio.
/// `scale_to_fit` shrinks the image uniformly when it is larger than the
/// available box instead of overflowing.
#[derive(Debug, Clone)]
pub struct Image {
    pub style: StyleBox,
    source: Arc<dyn ImageSource>,
    width: Option<f64>,
    height: Option<f64>,
    pub scale_to_fit: bool,
    /// Alternate description, tagged as `/Figure` marked content.
    pub alt: Option<String>,
}

fn dimension(what: &'static str, v: f64) -> std::result::Result<f64, InputError> {
    if !v.is_finite() {
        return Err(InputError::NonFinite { what });
    }
    if v < 0.0 {
        return Err(InputError::NegativeDimension { what, value: v });
    }
    Ok(v)
}

impl Image {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            style: StyleBox::default(),
            source,
            width: None,
            height: None,
            scale_to_fit: false,
            alt: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> std::result::Result<Self, InputError> {
        self.width = Some(dimension("image width", width)?);
        Ok(self)
    }

    pub fn with_height(mut self, height: f64) -> std::result::Result<Self, InputError> {
        self.height = Some(dimension("image height", height)?);
        Ok(self)
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn source(&self) -> &Arc<dyn ImageSource> {
        &self.source
    }

    /// Size before any fitting.
    pub fn natural_size(&self) -> (f64, f64) {
        let px_w = self.source.width() as f64;
        let px_h = self.source.height() as f64;
        let aspect = if px_w > 0.0 { px_h / px_w } else { 1.0 };
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * aspect),
            (None, Some(h)) => (if aspect > 0.0 { h / aspect } else { h }, h),
            (None, None) => (px_w, px_h),
        }
    }

    fn fitted_size(&self, available: &Rect) -> (f64, f64) {
        let (w, h) = self.natural_size();
        if !self.scale_to_fit || (w <= available.width + EPSILON && h <= available.height + EPSILON) {
            return (w, h);
        }
        let sx = if w > 0.0 { available.width / w } else { 1.0 };
        let sy = if h > 0.0 { available.height / h } else { 1.0 };
        let s = sx.min(sy).clamp(0.0, 1.0);
        (w * s, h * s)
    }
}

impl LayoutElement for Image {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Image"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        let (w, h) = self.fitted_size(available);
        Ok(Fit::check(available, w, h))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let (w, h) = self.fitted_size(content_box);
        let target = Rect::from_top(content_box.x, content_box.top(), w, h);
        let name = ctx.use_image(self.kind(), self.source.as_ref())?;

        let mut ops = Operators::new();
        if let Some(alt) = &self.alt {
            ops.begin_tagged("Figure", Some(alt));
        }
        ops.save_state()
            .concat(Matrix::unit_to(&target))
            .paint_xobject(&name)
            .restore_state();
        if self.alt.is_some() {
            ops.end_tagged();
        }
        ctx.append(&ops);
        Ok(target)
    }
}
