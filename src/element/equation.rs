//! A typeset arithmetic expression on one line.

use std::collections::HashMap;

use crate::error::{InputError, Result};
use crate::expr::Expr;
use crate::geometry::Rect;
use crate::pdf::content::fmt_num;
use crate::style::StyleBox;
use crate::text::TextStyle;

use super::{Chunk, Fit, LayoutElement, PaintContext};

/// An expression parsed once at construction and painted as a single run
/// of text, optionally followed by its value.
#[derive(Debug, Clone)]
pub struct Equation {
    pub style: StyleBox,
    expr: Expr,
    line: Chunk,
}

impl Equation {
    pub fn new(source: &str, text_style: TextStyle) -> std::result::Result<Self, InputError> {
        let expr = Expr::parse(source)?;
        let line = Chunk::new(expr.typeset(), text_style);
        Ok(Self {
            style: StyleBox::default(),
            expr,
            line,
        })
    }

    /// Append ` = value`, evaluated with `vars`.
    pub fn with_result(
        mut self,
        vars: &HashMap<String, f64>,
    ) -> std::result::Result<Self, InputError> {
        let value = self.expr.evaluate(vars)?;
        let text = format!("{} = {}", self.expr.typeset(), fmt_num(value));
        self.line = Chunk::new(text, self.line.text_style().clone());
        Ok(self)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn text(&self) -> &str {
        self.line.text()
    }
}

impl LayoutElement for Equation {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Equation"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        self.line.measure_content(available)
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        self.line.paint_content(ctx, content_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tests::doc_with_page;
    use crate::font::{StandardFont, StandardFontKind};
    use std::sync::Arc;

    fn courier(size: f64) -> TextStyle {
        TextStyle::new(Arc::new(StandardFont::new(StandardFontKind::Courier)), size).unwrap()
    }

    #[test]
    fn typesets_and_measures_as_one_line() {
        let eq = Equation::new("(a+b)*c", courier(10.0)).unwrap();
        assert_eq!(eq.text(), "(a + b) \u{d7} c");
        let fit = eq.measure(&Rect::new(0.0, 0.0, 200.0, 50.0)).unwrap();
        // Eleven characters of Courier at 6pt each.
        assert_eq!(fit.size(), (66.0, 10.0));
        assert_eq!(eq.display(), crate::style::Display::Block);
    }

    #[test]
    fn appends_value() {
        let vars = HashMap::from([("r".to_string(), 2.0)]);
        let eq = Equation::new("3 * r ^ 2", courier(10.0))
            .unwrap()
            .with_result(&vars)
            .unwrap();
        assert_eq!(eq.text(), "3 \u{d7} r ^ 2 = 12");
    }

    #[test]
    fn paints_winansi_symbols_as_hex() {
        let mut doc = doc_with_page();
        let eq = Equation::new("6 / 3", courier(10.0)).unwrap();
        let mut ctx = PaintContext::new(&mut doc, 0).unwrap();
        eq.paint(&mut ctx, &Rect::new(0.0, 0.0, 100.0, 20.0)).unwrap();
        let text = String::from_utf8(doc.page(0).unwrap().content.decoded().to_vec()).unwrap();
        // 0xF7 is outside printable ASCII.
        assert!(text.contains("<3620F72033> Tj\n"), "{text}");
        assert_eq!(doc.paint_log()[0].kind, "Equation");
    }

    #[test]
    fn invalid_source_is_rejected() {
        assert!(matches!(
            Equation::new("1 +", courier(10.0)),
            Err(InputError::Expression(_))
        ));
    }
}
