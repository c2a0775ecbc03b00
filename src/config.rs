//! # Document Configuration
//!
//! Every default the engine relies on (page geometry, default font, the
//! margin used when an element declares none) lives in [`DocumentConfig`]
//! and is handed to [`Document::new`](crate::pdf::Document::new). The engine
//! keeps no process-wide state.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::geometry::{Edges, Rect};

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentConfig {
    pub page_size: PageSize,

    /// Page margins in points.
    pub page_margin: Edges,

    pub font_family: String,
    pub font_size: f64,
    pub font_color: Color,

    /// Baseline distance as a multiple of the font size.
    pub line_height: f64,

    /// Margin applied to elements that declare none.
    pub element_margin: Edges,

    /// Gap between columns of multi-column layouts.
    pub column_gap: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            page_margin: Edges::uniform(60.0),
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            font_color: Color::BLACK,
            line_height: 1.2,
            element_margin: Edges::ZERO,
            column_gap: 12.0,
            title: None,
            author: None,
            subject: None,
        }
    }
}

impl DocumentConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The page box minus the page margins.
    pub fn usable_area(&self) -> Rect {
        let (width, height) = self.page_size.dimensions();
        Rect::new(0.0, 0.0, width, height).shrink_edges(&self.page_margin)
    }
}
