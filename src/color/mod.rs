//! # Colors
//!
//! Device colors in the three PDF families. Every color converts to RGB,
//! which is what the content-stream emitter writes (`rg` / `RG`).

pub mod palette;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A device color with components in `[0, 1]`.
///
/// Serializes as a `#rrggbb` string; deserializes from a hex string or a
/// palette name (see [`palette::lookup`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Rgb { r: f64, g: f64, b: f64 },
    Gray(f64),
    Cmyk { c: f64, m: f64, y: f64, k: f64 },
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

fn component(name: &'static str, v: f64) -> Result<f64, InputError> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(InputError::ColorComponent {
            component: name,
            value: v,
        });
    }
    Ok(v)
}

impl Color {
    pub const BLACK: Color = Color::Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Result<Self, InputError> {
        Ok(Color::Rgb {
            r: component("r", r)?,
            g: component("g", g)?,
            b: component("b", b)?,
        })
    }

    pub fn gray(k: f64) -> Result<Self, InputError> {
        Ok(Color::Gray(component("gray", k)?))
    }

    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Result<Self, InputError> {
        Ok(Color::Cmyk {
            c: component("c", c)?,
            m: component("m", m)?,
            y: component("y", y)?,
            k: component("k", k)?,
        })
    }

    /// Build from 8-bit channels. Always valid.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, InputError> {
        let digits = hex.trim().trim_start_matches('#');
        let malformed = || InputError::MalformedHex(hex.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| malformed());
        match digits.len() {
            3 => Ok(Color::rgb8(
                channel(&digits[0..1].repeat(2))?,
                channel(&digits[1..2].repeat(2))?,
                channel(&digits[2..3].repeat(2))?,
            )),
            6 => Ok(Color::rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(malformed()),
        }
    }

    /// Total conversion to RGB components.
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        match *self {
            Color::Rgb { r, g, b } => (r, g, b),
            Color::Gray(k) => (k, k, k),
            Color::Cmyk { c, m, y, k } => (
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
        }
    }

    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
    }
}

impl TryFrom<String> for Color {
    type Error = InputError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if let Some(c) = palette::lookup(&s) {
            return Ok(c);
        }
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}
