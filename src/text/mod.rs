//! # Text Layout
//!
//! Text styles and greedy line breaking. Break opportunities come from
//! UAX#14 (`unicode-linebreak`); widths come from the style's font.

use std::sync::Arc;

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::color::Color;
use crate::error::InputError;
use crate::font::Font;
use crate::geometry::EPSILON;

/// Font, size, color and line spacing for a run of text.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: Arc<dyn Font>,
    size: f64,
    pub color: Color,
    line_height: f64,
}

impl TextStyle {
    pub fn new(font: Arc<dyn Font>, size: f64) -> Result<Self, InputError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(InputError::Invalid(format!(
                "font size must be positive (got {size})"
            )));
        }
        Ok(Self {
            font,
            size,
            color: Color::BLACK,
            line_height: 1.2,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the line-height multiplier (distance between baselines divided
    /// by the font size).
    pub fn with_line_height(mut self, line_height: f64) -> Result<Self, InputError> {
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(InputError::Invalid(format!(
                "line height must be positive (got {line_height})"
            )));
        }
        self.line_height = line_height;
        Ok(self)
    }

    /// Same font and color at another size.
    pub fn resized(&self, size: f64) -> Result<Self, InputError> {
        let mut style = TextStyle::new(Arc::clone(&self.font), size)?;
        style.color = self.color;
        style.line_height = self.line_height;
        Ok(style)
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn char_width(&self, c: char) -> f64 {
        self.font.char_width(c, self.size)
    }

    pub fn width(&self, text: &str) -> f64 {
        self.font.text_width(text, self.size)
    }

    /// Distance from the top of a `size`-high line box to the baseline. The
    /// box is split between ascender and descender in proportion.
    pub fn baseline_offset(&self) -> f64 {
        let ascent = self.font.ascent();
        let descent = self.font.descent();
        let total = ascent - descent;
        if total <= 0.0 {
            return self.size;
        }
        self.size * ascent / total
    }

    /// Distance between consecutive baselines.
    pub fn leading(&self) -> f64 {
        self.size * self.line_height
    }

    /// Height of a block of `lines` lines: the first line is exactly one
    /// font size tall, each further line adds the leading.
    pub fn block_height(&self, lines: usize) -> f64 {
        if lines == 0 {
            return 0.0;
        }
        self.size + (lines - 1) as f64 * self.leading()
    }

    /// Width of the widest unbreakable unit: the text between two UAX#14
    /// break opportunities, without its trailing spaces.
    pub fn widest_word(&self, text: &str) -> f64 {
        let mut start = 0;
        let mut widest = 0.0f64;
        for (end, _) in linebreaks(text) {
            let unit = text[start..end].trim_end_matches(|c| c == ' ' || is_newline(c));
            widest = widest.max(self.width(unit));
            start = end;
        }
        widest
    }

    pub fn break_into_lines(&self, text: &str, max_width: f64) -> Vec<BrokenLine> {
        break_into_lines(text, max_width, |c| self.char_width(c))
    }
}

/// A line of text after line-breaking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrokenLine {
    /// Line text without trailing spaces.
    pub text: String,
    /// Width of `text`.
    pub width: f64,
    /// Number of spaces inside `text`.
    pub spaces: usize,
    /// The line ends a paragraph (end of text or a hard break).
    pub ends_paragraph: bool,
}

fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// UAX#14 break opportunities indexed by char position: entry `i` is the
/// opportunity *before* char `i`. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        // A break at the very end of the text needs no line.
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }
    result
}

fn make_line(chars: &[char], widths: &[f64], ends_paragraph: bool) -> BrokenLine {
    let mut end = chars.len();
    while end > 0 && (chars[end - 1] == ' ' || is_newline(chars[end - 1])) {
        end -= 1;
    }
    let kept = &chars[..end];
    BrokenLine {
        text: kept.iter().filter(|c| !is_newline(**c)).collect(),
        width: widths[..end].iter().sum(),
        spaces: kept.iter().filter(|c| **c == ' ').count(),
        ends_paragraph,
    }
}

/// Break `text` into lines no wider than `max_width` using greedy filling.
///
/// Spaces at the end of a line hang past the limit and are trimmed. A word
/// wider than the limit is broken between characters; callers that must
/// not split words check [`TextStyle::widest_word`] first.
pub fn break_into_lines(
    text: &str,
    max_width: f64,
    width_of: impl Fn(char) -> f64,
) -> Vec<BrokenLine> {
    if text.is_empty() {
        return vec![BrokenLine {
            ends_paragraph: true,
            ..BrokenLine::default()
        }];
    }

    let chars: Vec<char> = text.chars().collect();
    let widths: Vec<f64> = chars
        .iter()
        .map(|&c| if is_newline(c) { 0.0 } else { width_of(c) })
        .collect();
    let break_opps = compute_break_opportunities(text);

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;
    let mut last_break_point: Option<usize> = None;

    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 {
            match break_opps[i] {
                Some(BreakOpportunity::Mandatory) => {
                    let end = if is_newline(chars[i - 1]) { i - 1 } else { i };
                    lines.push(make_line(&chars[line_start..end], &widths[line_start..end], true));
                    line_start = i;
                    line_width = 0.0;
                    last_break_point = None;
                }
                // The break falls after char i-1.
                Some(BreakOpportunity::Allowed) => last_break_point = Some(i - 1),
                None => {}
            }
        }

        if is_newline(ch) {
            continue;
        }
        let char_width = widths[i];

        if line_width + char_width > max_width + EPSILON && line_start < i && ch != ' ' {
            if let Some(bp) = last_break_point.filter(|&bp| bp >= line_start) {
                lines.push(make_line(&chars[line_start..=bp], &widths[line_start..=bp], false));
                line_start = bp + 1;
                line_width = widths[line_start..=i].iter().sum();
                last_break_point = None;
                continue;
            }

            // No break opportunity on this line: split the word here.
            lines.push(make_line(&chars[line_start..i], &widths[line_start..i], false));
            line_start = i;
            line_width = char_width;
            last_break_point = None;
            continue;
        }

        line_width += char_width;
    }

    if line_start < chars.len() {
        lines.push(make_line(&chars[line_start..], &widths[line_start..], true));
    } else if let Some(last) = lines.last_mut() {
        last.ends_paragraph = true;
    }

    lines
}
