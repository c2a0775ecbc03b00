//! The 14 standard PDF fonts.
//!
//! These are never embedded; viewers supply them. Advance widths come from
//! the Adobe Core 14 AFM files for the printable ASCII range. Accented
//! Latin-1 letters borrow the width of their base letter.

use super::encoding::{latin1_base, to_winansi};
use super::{Font, FontType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFontKind {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl StandardFontKind {
    pub const ALL: [StandardFontKind; 14] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
        Self::Symbol,
        Self::ZapfDingbats,
    ];

    /// The PDF `/BaseFont` name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    pub fn from_pdf_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.pdf_name() == name)
    }

    /// Symbol and ZapfDingbats use their own builtin encoding.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbol | Self::ZapfDingbats)
    }

    fn family(&self) -> Family {
        match self {
            Self::Helvetica | Self::HelveticaOblique => Family::Helvetica,
            Self::HelveticaBold | Self::HelveticaBoldOblique => Family::HelveticaBold,
            Self::TimesRoman => Family::Times,
            Self::TimesBold => Family::TimesBold,
            Self::TimesItalic => Family::TimesItalic,
            Self::TimesBoldItalic => Family::TimesBoldItalic,
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                Family::Courier
            }
            Self::Symbol => Family::Symbol,
            Self::ZapfDingbats => Family::ZapfDingbats,
        }
    }
}

#[derive(Clone, Copy)]
enum Family {
    Helvetica,
    HelveticaBold,
    Times,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    Symbol,
    ZapfDingbats,
}

// Widths for codes 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

// ZapfDingbats widths for the codes used as list bullets.
const DINGBAT_WIDTHS: [(u8, u16); 7] = [
    (b' ', 278),
    (b'l', 791),
    (b'm', 873),
    (b'n', 761),
    (b'u', 759),
    (b'o', 761),
    (b'4', 760),
];

/// Vertical metrics in 1/1000 em: (ascender, descender).
fn vertical_metrics(family: Family) -> (f64, f64) {
    match family {
        Family::Helvetica | Family::HelveticaBold => (718.0, -207.0),
        Family::Times | Family::TimesBold | Family::TimesItalic | Family::TimesBoldItalic => {
            (683.0, -217.0)
        }
        Family::Courier => (629.0, -157.0),
        Family::Symbol => (1010.0, -293.0),
        Family::ZapfDingbats => (820.0, -143.0),
    }
}

fn ascii_table(family: Family) -> Option<&'static [u16; 95]> {
    match family {
        Family::Helvetica => Some(&HELVETICA),
        Family::HelveticaBold => Some(&HELVETICA_BOLD),
        Family::Times => Some(&TIMES_ROMAN),
        Family::TimesBold => Some(&TIMES_BOLD),
        Family::TimesItalic => Some(&TIMES_ITALIC),
        Family::TimesBoldItalic => Some(&TIMES_BOLD_ITALIC),
        Family::Courier | Family::Symbol | Family::ZapfDingbats => None,
    }
}

fn code_width(family: Family, code: u8) -> u16 {
    match family {
        Family::Courier => return 600,
        Family::Symbol => return 500,
        Family::ZapfDingbats => {
            return DINGBAT_WIDTHS
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, w)| *w)
                .unwrap_or(788);
        }
        _ => {}
    }
    let Some(table) = ascii_table(family) else {
        return 500;
    };
    if (0x20..=0x7E).contains(&code) {
        return table[(code - 0x20) as usize];
    }
    if let Some(base) = latin1_base(code) {
        return table[(base - 0x20) as usize];
    }
    let helvetica = matches!(family, Family::Helvetica | Family::HelveticaBold);
    match code {
        0xA0 => table[0],
        0x95 => 350,
        0x85 | 0x89 | 0x97 | 0x99 => 1000,
        0x91 | 0x92 | 0x82 => {
            if helvetica {
                222
            } else {
                333
            }
        }
        0x93 | 0x94 | 0x84 => {
            if helvetica {
                333
            } else {
                444
            }
        }
        // En dash and everything else without an AFM entry here.
        _ => {
            if helvetica {
                556
            } else {
                500
            }
        }
    }
}

/// One of the standard 14 fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFont {
    kind: StandardFontKind,
}

impl StandardFont {
    pub fn new(kind: StandardFontKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> StandardFontKind {
        self.kind
    }
}

impl Font for StandardFont {
    fn name(&self) -> &str {
        self.kind.pdf_name()
    }

    fn font_type(&self) -> FontType {
        FontType::Type1
    }

    /// Glyph ids of simple fonts are their single-byte character codes.
    fn glyph_for_char(&self, c: char) -> Option<u16> {
        if self.kind.is_symbolic() {
            let cp = c as u32;
            return (0x20..=0x7E).contains(&cp).then_some(cp as u16);
        }
        to_winansi(c).map(u16::from)
    }

    fn advance_width(&self, glyph: u16) -> u16 {
        match u8::try_from(glyph) {
            Ok(code) => code_width(self.kind.family(), code),
            Err(_) => 0,
        }
    }

    fn missing_glyph(&self) -> u16 {
        if self.kind.is_symbolic() {
            u16::from(b' ')
        } else {
            u16::from(b'?')
        }
    }

    fn ascent(&self) -> f64 {
        vertical_metrics(self.kind.family()).0
    }

    fn descent(&self) -> f64 {
        vertical_metrics(self.kind.family()).1
    }

    fn embedding_stream(&self) -> Option<&[u8]> {
        None
    }

    fn encoding_entry(&self) -> Option<&str> {
        if self.kind.is_symbolic() {
            None
        } else {
            Some("WinAnsiEncoding")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(kind: StandardFontKind) -> StandardFont {
        StandardFont::new(kind)
    }

    #[test]
    fn helvetica_space_width() {
        let f = font(StandardFontKind::Helvetica);
        assert!((f.char_width(' ', 12.0) - 3.336).abs() < 0.001);
    }

    #[test]
    fn bold_is_wider() {
        let regular = font(StandardFontKind::Helvetica).char_width('a', 12.0);
        let bold = font(StandardFontKind::HelveticaBold).char_width('a', 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn oblique_shares_upright_widths() {
        let a = font(StandardFontKind::Helvetica).text_width("Hello", 10.0);
        let b = font(StandardFontKind::HelveticaOblique).text_width("Hello", 10.0);
        assert_eq!(a, b);
    }

    #[test]
    fn courier_is_monospace() {
        let f = font(StandardFontKind::Courier);
        assert_eq!(f.text_width("ABCDEFGHIJ", 10.0), 60.0);
        assert_eq!(f.text_width("iiiii", 10.0), f.text_width("WWWWW", 10.0));
    }

    #[test]
    fn accented_letters_use_base_width() {
        let f = font(StandardFontKind::TimesRoman);
        assert_eq!(f.char_width('é', 10.0), f.char_width('e', 10.0));
    }

    #[test]
    fn unmapped_chars_fall_back() {
        let f = font(StandardFontKind::Helvetica);
        assert_eq!(f.glyph_for_char('漢'), None);
        assert_eq!(f.encode("a漢"), vec![b'a', b'?']);
    }

    #[test]
    fn names_round_trip() {
        for kind in StandardFontKind::ALL {
            assert_eq!(StandardFontKind::from_pdf_name(kind.pdf_name()), Some(kind));
        }
        assert_eq!(font(StandardFontKind::ZapfDingbats).encoding_entry(), None);
        assert_eq!(
            font(StandardFontKind::TimesBold).encoding_entry(),
            Some("WinAnsiEncoding")
        );
    }
}
