//! Vector shapes built from [`LineArt`].

use crate::color::Color;
use crate::error::{InputError, Result};
use crate::geometry::line_art::LineArt;
use crate::geometry::{Point, Rect};
use crate::pdf::Operators;
use crate::style::StyleBox;

use super::{Fit, LayoutElement, PaintContext};

fn positive(what: &'static str, v: f64) -> std::result::Result<f64, InputError> {
    if !v.is_finite() {
        return Err(InputError::NonFinite { what });
    }
    if v < 0.0 {
        return Err(InputError::NegativeDimension { what, value: v });
    }
    Ok(v)
}

/// Emit `art` as path construction operators.
fn path_ops(ops: &mut Operators, art: &LineArt) {
    match art {
        LineArt::Closed(points) => {
            ops.polyline(points, true);
        }
        LineArt::Open(points) => {
            ops.polyline(points, false);
        }
        LineArt::Segments(segments) => {
            for (a, b) in segments {
                ops.move_to(*a).line_to(*b);
            }
        }
        LineArt::Group(parts) => parts.iter().for_each(|p| path_ops(ops, p)),
    }
}

/// A line-art shape stretched to a fixed size.
#[derive(Debug, Clone)]
pub struct Shape {
    pub style: StyleBox,
    art: LineArt,
    width: f64,
    height: f64,
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    line_width: f64,
}

impl Shape {
    /// A shape drawn at `width x height`, stroked in black.
    pub fn new(art: LineArt, width: f64, height: f64) -> std::result::Result<Self, InputError> {
        Ok(Self {
            style: StyleBox::default(),
            art,
            width: positive("shape width", width)?,
            height: positive("shape height", height)?,
            stroke: Some(Color::BLACK),
            fill: None,
            line_width: 1.0,
        })
    }

    /// Build the shape with one of the [`line_art`](crate::geometry::line_art)
    /// factories applied to a `width x height` box.
    pub fn from_factory(
        width: f64,
        height: f64,
        factory: impl FnOnce(&Rect) -> LineArt,
    ) -> std::result::Result<Self, InputError> {
        let art = factory(&Rect::new(0.0, 0.0, width, height));
        Self::new(art, width, height)
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Option<Color>) -> Self {
        self.stroke = color;
        self
    }

    pub fn set_line_width(&mut self, width: f64) -> std::result::Result<&mut Self, InputError> {
        self.line_width = positive("line width", width)?;
        Ok(self)
    }

    pub fn art(&self) -> &LineArt {
        &self.art
    }
}

impl LayoutElement for Shape {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Shape"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        Ok(Fit::check(available, self.width, self.height))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let target = Rect::from_top(content_box.x, content_box.top(), self.width, self.height);
        let art = self.art.fit_to(&target);
        let fill = self.fill.filter(|_| art.is_fillable());
        if fill.is_none() && self.stroke.is_none() {
            return Ok(target);
        }

        let mut ops = Operators::new();
        ops.save_state();
        if let Some(color) = fill {
            ops.fill_color(color);
        }
        if let Some(color) = self.stroke {
            ops.stroke_color(color).line_width(self.line_width);
        }
        path_ops(&mut ops, &art);
        match (fill.is_some(), self.stroke.is_some()) {
            (true, true) => ops.fill_stroke(),
            (true, false) => ops.fill(),
            _ => ops.stroke(),
        };
        ops.restore_state();
        ctx.append(&ops);
        Ok(target)
    }
}

/// A full-width horizontal line.
#[derive(Debug, Clone)]
pub struct HorizontalRule {
    pub style: StyleBox,
    pub color: Color,
    thickness: f64,
}

impl Default for HorizontalRule {
    fn default() -> Self {
        Self {
            style: StyleBox::default(),
            color: Color::BLACK,
            thickness: 1.0,
        }
    }
}

impl HorizontalRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thickness(mut self, thickness: f64) -> std::result::Result<Self, InputError> {
        self.thickness = positive("rule thickness", thickness)?;
        Ok(self)
    }
}

impl LayoutElement for HorizontalRule {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "HorizontalRule"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        Ok(Fit::check(available, available.width, self.thickness))
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let target = Rect::from_top(
            content_box.x,
            content_box.top(),
            content_box.width,
            self.thickness,
        );
        let y = target.center().y;
        let mut ops = Operators::new();
        ops.save_state()
            .stroke_color(self.color)
            .line_width(self.thickness)
            .move_to(Point::new(target.left(), y))
            .line_to(Point::new(target.right(), y))
            .stroke()
            .restore_state();
        ctx.append(&ops);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tests::doc_with_page;
    use crate::geometry::line_art;

    fn painted_ops(element: &dyn LayoutElement, avail: Rect) -> String {
        let mut doc = doc_with_page();
        let mut ctx = super::super::PaintContext::new(&mut doc, 0).unwrap();
        element.paint(&mut ctx, &avail).unwrap();
        String::from_utf8(doc.page(0).unwrap().content.decoded().to_vec()).unwrap()
    }

    #[test]
    fn filled_polygon_uses_fill_stroke() {
        let shape = Shape::from_factory(40.0, 40.0, |r| line_art::polygon(r, 6).unwrap())
            .unwrap()
            .with_fill(Color::rgb8(255, 0, 0));
        let text = painted_ops(&shape, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(text.starts_with("q\n1 0 0 rg\n0 0 0 RG\n1 w\n"));
        assert_eq!(text.matches(" l\n").count(), 5);
        assert!(text.ends_with("h\nB\nQ\n"));
    }

    #[test]
    fn open_art_is_only_stroked() {
        let art = LineArt::Open(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        let shape = Shape::new(art, 10.0, 10.0)
            .unwrap()
            .with_fill(Color::WHITE);
        let text = painted_ops(&shape, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!text.contains(" rg\n"));
        assert!(text.ends_with("S\nQ\n"));
    }

    #[test]
    fn shape_lands_in_its_box() {
        let shape = Shape::from_factory(20.0, 10.0, line_art::diamond).unwrap();
        let text = painted_ops(&shape, Rect::new(5.0, 5.0, 100.0, 100.0));
        // Diamond tips at the box's top center: (15, 105).
        assert!(text.contains("15 105 m\n") || text.contains("15 105 l\n"));
    }

    #[test]
    fn rule_spans_the_width() {
        let rule = HorizontalRule::new().with_thickness(2.0).unwrap();
        let text = painted_ops(&rule, Rect::new(10.0, 0.0, 200.0, 50.0));
        assert!(text.contains("10 49 m\n210 49 l\nS\n"));
        assert!(Shape::new(LineArt::Open(vec![]), -1.0, 1.0).is_err());
    }
}
