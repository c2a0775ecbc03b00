//! # Box Styling
//!
//! [`StyleBox`] holds every styling attribute shared by layout elements:
//! background, borders, corner radii, margin, padding, alignment and the
//! display class. Elements embed one and expose it through
//! [`LayoutElement::style`](crate::element::LayoutElement::style).
//!
//! The box model: an element's measured box is its content plus padding
//! plus the widths of its enabled border sides. Margins sit outside the box
//! and are applied by the placement engine.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::InputError;
use crate::geometry::{Edges, Rect, EPSILON};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Like `Left` for boxes; paragraphs stretch their inner lines.
    Justified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// How the browser-like placement policy treats an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Block,
    Inline,
}

/// Which border sides are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderSides {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl BorderSides {
    pub const NONE: BorderSides = BorderSides {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };
    pub const ALL: BorderSides = BorderSides {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }

    pub fn all(&self) -> bool {
        self.top && self.right && self.bottom && self.left
    }
}

/// Corner radii.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Corners {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl Corners {
    pub fn uniform(r: f64) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top_left <= 0.0
            && self.top_right <= 0.0
            && self.bottom_right <= 0.0
            && self.bottom_left <= 0.0
    }

    /// Radii clamped so no corner exceeds half the box's shorter side.
    pub fn clamped(&self, rect: &Rect) -> Corners {
        let limit = (rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        Corners {
            top_left: self.top_left.clamp(0.0, limit),
            top_right: self.top_right.clamp(0.0, limit),
            bottom_right: self.bottom_right.clamp(0.0, limit),
            bottom_left: self.bottom_left.clamp(0.0, limit),
        }
    }
}

/// Common styling record embedded in every element.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBox {
    pub background: Option<Color>,
    pub border: BorderSides,
    border_width: f64,
    pub border_color: Color,
    border_radius: Corners,
    margin: Option<Edges>,
    padding: Edges,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Overrides the element's default display class.
    pub display: Option<Display>,
}

impl Default for StyleBox {
    fn default() -> Self {
        Self {
            background: None,
            border: BorderSides::NONE,
            border_width: 1.0,
            border_color: Color::BLACK,
            border_radius: Corners::default(),
            margin: None,
            padding: Edges::ZERO,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            display: None,
        }
    }
}

impl StyleBox {
    pub fn border_width(&self) -> f64 {
        self.border_width
    }

    pub fn border_radius(&self) -> Corners {
        self.border_radius
    }

    /// `None` means the engine-default margin applies.
    pub fn margin(&self) -> Option<Edges> {
        self.margin
    }

    pub fn padding(&self) -> Edges {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Edges) -> Result<&mut Self, InputError> {
        padding.validate("padding")?;
        self.padding = padding;
        Ok(self)
    }

    pub fn set_margin(&mut self, margin: Option<Edges>) -> Result<&mut Self, InputError> {
        if let Some(m) = &margin {
            m.validate("margin")?;
        }
        self.margin = margin;
        Ok(self)
    }

    pub fn set_border_width(&mut self, width: f64) -> Result<&mut Self, InputError> {
        if !width.is_finite() {
            return Err(InputError::NonFinite {
                what: "border width",
            });
        }
        if width < 0.0 {
            return Err(InputError::NegativeDimension {
                what: "border width",
                value: width,
            });
        }
        self.border_width = width;
        Ok(self)
    }

    pub fn set_border_radius(&mut self, radius: Corners) -> Result<&mut Self, InputError> {
        for v in [
            radius.top_left,
            radius.top_right,
            radius.bottom_right,
            radius.bottom_left,
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(InputError::NegativeDimension {
                    what: "border radius",
                    value: v,
                });
            }
        }
        self.border_radius = radius;
        Ok(self)
    }

    /// Enable all four border sides with the given width and color.
    pub fn set_border(&mut self, width: f64, color: Color) -> Result<&mut Self, InputError> {
        self.set_border_width(width)?;
        self.border = BorderSides::ALL;
        self.border_color = color;
        Ok(self)
    }

    /// Border widths of the enabled sides.
    pub fn border_edges(&self) -> Edges {
        let w = |on: bool| if on { self.border_width } else { 0.0 };
        Edges::new(
            w(self.border.top),
            w(self.border.right),
            w(self.border.bottom),
            w(self.border.left),
        )
    }

    /// Padding plus border: what separates the box edge from its content.
    pub fn insets(&self) -> Edges {
        self.padding.add(&self.border_edges())
    }

    pub fn has_border(&self) -> bool {
        self.border.any() && self.border_width > 0.0
    }

    /// Position content of `width` x `height` inside `padded`, or `None`
    /// when it does not fit.
    pub fn align(&self, width: f64, height: f64, padded: &Rect) -> Option<Rect> {
        if width > padded.width + EPSILON || height > padded.height + EPSILON {
            return None;
        }
        let x = match self.h_align {
            HAlign::Left | HAlign::Justified => padded.x,
            HAlign::Center => padded.x + (padded.width - width) / 2.0,
            HAlign::Right => padded.x + padded.width - width,
        };
        let y = match self.v_align {
            VAlign::Top => padded.y + padded.height - height,
            VAlign::Middle => padded.y + (padded.height - height) / 2.0,
            VAlign::Bottom => padded.y,
        };
        Some(Rect::new(x, y, width, height))
    }
}
