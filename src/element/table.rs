//! # Tables
//!
//! A [`Table`] is a `rows x cols` grid of [`TableCell`]s. Cells are placed
//! in insertion order at the first free slot (row-major) that fits their
//! span; coordinates no cell claims are painted as implicit empty cells, so
//! the grid is always fully covered.
//!
//! Column widths are either declared ([`ColumnWidth`]) or computed from
//! the cells' intrinsic widths (see [`crate::measure::table`]).

use crate::color::Color;
use crate::error::{InputError, Result};
use crate::geometry::{Edges, Rect, EPSILON};
use crate::measure::table::{
    self as grid, CellBounds, CellHeight, ColumnWidth, Grid, GridArea,
};
use crate::measure;
use crate::style::StyleBox;

use super::{Fit, LayoutElement, PaintContext};

/// One cell: exactly one inner element plus spans and preferred sizes.
#[derive(Debug)]
pub struct TableCell {
    pub style: StyleBox,
    content: Option<Box<dyn LayoutElement>>,
    row_span: usize,
    col_span: usize,
    preferred_width: Option<f64>,
    preferred_height: Option<f64>,
}

fn reject_nesting(element: &dyn LayoutElement) -> std::result::Result<(), InputError> {
    match element.kind() {
        kind @ ("Table" | "TableCell") => Err(InputError::NestedTable(kind)),
        _ => Ok(()),
    }
}

impl TableCell {
    pub fn new(content: impl LayoutElement + 'static) -> std::result::Result<Self, InputError> {
        Self::boxed(Box::new(content))
    }

    pub fn boxed(content: Box<dyn LayoutElement>) -> std::result::Result<Self, InputError> {
        reject_nesting(content.as_ref())?;
        Ok(Self {
            content: Some(content),
            ..Self::empty()
        })
    }

    /// A cell with no content.
    pub fn empty() -> Self {
        Self {
            style: StyleBox::default(),
            content: None,
            row_span: 1,
            col_span: 1,
            preferred_width: None,
            preferred_height: None,
        }
    }

    pub fn with_span(
        mut self,
        row_span: usize,
        col_span: usize,
    ) -> std::result::Result<Self, InputError> {
        if row_span == 0 {
            return Err(InputError::InvalidSpan { what: "row" });
        }
        if col_span == 0 {
            return Err(InputError::InvalidSpan { what: "column" });
        }
        self.row_span = row_span;
        self.col_span = col_span;
        Ok(self)
    }

    pub fn with_preferred_size(
        mut self,
        width: Option<f64>,
        height: Option<f64>,
    ) -> std::result::Result<Self, InputError> {
        for v in [width, height].into_iter().flatten() {
            if !v.is_finite() {
                return Err(InputError::NonFinite { what: "preferred cell size" });
            }
            if v < 0.0 {
                return Err(InputError::NegativeDimension {
                    what: "preferred cell size",
                    value: v,
                });
            }
        }
        self.preferred_width = width;
        self.preferred_height = height;
        Ok(self)
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn col_span(&self) -> usize {
        self.col_span
    }

    pub fn content(&self) -> Option<&dyn LayoutElement> {
        self.content.as_deref()
    }
}

impl LayoutElement for TableCell {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "TableCell"
    }

    fn stretches(&self) -> bool {
        true
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        let fit = match &self.content {
            Some(content) => content.measure(available)?,
            None => Fit::check(available, 0.0, 0.0),
        };
        Ok(match (fit, self.preferred_height) {
            (Fit::Fits(r), Some(h)) if h > r.height => Fit::check(available, r.width, h),
            (fit, _) => fit,
        })
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let Some(content) = &self.content else {
            return Ok(*content_box);
        };
        let measured = content
            .measure(content_box)?
            .into_rect(content.kind(), content_box)?;
        let slot = self
            .style
            .align(measured.width, measured.height, content_box)
            .unwrap_or(measured);
        content.paint(ctx, &slot)
    }
}

/// Resolved column widths and row heights.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
}

impl TableLayout {
    pub fn width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    pub fn height(&self) -> f64 {
        self.row_heights.iter().sum()
    }

    /// The rectangle of `area` when the table's top-left corner is at
    /// (`x`, `top`).
    pub fn area_rect(&self, area: &GridArea, x: f64, top: f64) -> Rect {
        let xs = grid::offsets(&self.column_widths);
        let ys = grid::offsets(&self.row_heights);
        let left = x + xs[area.col];
        let width = xs[area.col + area.col_span] - xs[area.col];
        let height = ys[area.row + area.row_span] - ys[area.row];
        Rect::from_top(left, top - ys[area.row], width, height)
    }
}

#[derive(Debug)]
pub struct Table {
    pub style: StyleBox,
    grid: Grid,
    cells: Vec<(TableCell, GridArea)>,
    columns: Option<Vec<ColumnWidth>>,
    /// Spread space left once every column reached its maximum width.
    pub fill_width: bool,
    /// Styling for the implicit cells of unclaimed coordinates.
    implicit_style: StyleBox,
    zebra: Option<(Color, Color)>,
}

impl Table {
    pub fn new(rows: usize, cols: usize) -> std::result::Result<Self, InputError> {
        Ok(Self {
            style: StyleBox::default(),
            grid: Grid::new(rows, cols)?,
            cells: Vec::new(),
            columns: None,
            fill_width: true,
            implicit_style: StyleBox::default(),
            zebra: None,
        })
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Insert a cell at the next free slot that fits its span.
    pub fn add_cell(&mut self, mut cell: TableCell) -> std::result::Result<GridArea, InputError> {
        let area = self.grid.place(self.cells.len(), cell.row_span, cell.col_span)?;
        if let Some(zebra) = self.zebra {
            if cell.style.background.is_none() {
                cell.style.background = Some(zebra_color(zebra, area.row));
            }
        }
        self.cells.push((cell, area));
        Ok(area)
    }

    /// Wrap `element` in a 1x1 cell and insert it.
    pub fn add(
        &mut self,
        element: impl LayoutElement + 'static,
    ) -> std::result::Result<GridArea, InputError> {
        self.add_cell(TableCell::new(element)?)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&TableCell, &GridArea)> {
        self.cells.iter().map(|(c, a)| (c, a))
    }

    /// Every coordinate covered by an explicit or implicit cell.
    pub fn coverage(&self) -> Vec<(usize, usize)> {
        let mut all: Vec<(usize, usize)> = self
            .cells
            .iter()
            .flat_map(|(_, a)| a.coordinates().collect::<Vec<_>>())
            .chain(self.grid.unclaimed())
            .collect();
        all.sort_unstable();
        all
    }

    pub fn set_column_widths(
        &mut self,
        columns: Vec<ColumnWidth>,
    ) -> std::result::Result<&mut Self, InputError> {
        if columns.len() != self.cols() {
            return Err(InputError::OutOfRange {
                what: "declared column count",
                value: columns.len(),
                min: self.cols(),
                max: self.cols(),
            });
        }
        self.columns = Some(columns);
        Ok(self)
    }

    pub fn set_uniform_padding(&mut self, padding: Edges) -> std::result::Result<&mut Self, InputError> {
        self.implicit_style.set_padding(padding)?;
        for (cell, _) in &mut self.cells {
            cell.style.set_padding(padding)?;
        }
        Ok(self)
    }

    pub fn set_uniform_border(
        &mut self,
        width: f64,
        color: Color,
    ) -> std::result::Result<&mut Self, InputError> {
        self.implicit_style.set_border(width, color)?;
        for (cell, _) in &mut self.cells {
            cell.style.set_border(width, color)?;
        }
        Ok(self)
    }

    /// Alternate cell backgrounds by row, starting with `even` on row 0.
    pub fn set_zebra(&mut self, even: Color, odd: Color) -> &mut Self {
        self.zebra = Some((even, odd));
        for (cell, area) in &mut self.cells {
            cell.style.background = Some(zebra_color((even, odd), area.row));
        }
        self
    }

    fn implicit_cells(&self) -> Vec<(TableCell, GridArea)> {
        self.grid
            .unclaimed()
            .into_iter()
            .map(|(row, col)| {
                let mut cell = TableCell::empty();
                cell.style = self.implicit_style.clone();
                if let Some(zebra) = self.zebra {
                    cell.style.background = Some(zebra_color(zebra, row));
                }
                let area = GridArea {
                    row,
                    col,
                    row_span: 1,
                    col_span: 1,
                };
                (cell, area)
            })
            .collect()
    }

    /// Column widths and row heights at `width`, or `None` when the
    /// columns cannot be made narrow enough.
    pub fn layout(&self, width: f64) -> Result<Option<TableLayout>> {
        let implicit = self.implicit_cells();
        let all: Vec<(&TableCell, &GridArea)> = self
            .cells
            .iter()
            .chain(implicit.iter())
            .map(|(c, a)| (c, a))
            .collect();

        let column_widths = match &self.columns {
            Some(declared) => grid::resolve_declared(declared, width),
            None => {
                let mut bounds = Vec::with_capacity(all.len());
                for (cell, area) in &all {
                    let mut b = measure::size_bounds(*cell)?;
                    if let Some(pref) = cell.preferred_width {
                        if pref >= b.min_width - EPSILON && pref <= b.max_width + EPSILON {
                            b.max_width = pref;
                        }
                    }
                    bounds.push(CellBounds {
                        col: area.col,
                        col_span: area.col_span,
                        min_width: b.min_width,
                        max_width: b.max_width,
                    });
                }
                let columns = grid::column_bounds(self.cols(), &bounds);
                match grid::distribute_widths(&columns, width, self.fill_width) {
                    Some(widths) => widths,
                    None => return Ok(None),
                }
            }
        };

        let offsets = grid::offsets(&column_widths);
        let mut heights = Vec::with_capacity(all.len());
        for (cell, area) in &all {
            let cell_width = offsets[area.col + area.col_span] - offsets[area.col];
            match measure::size_at(*cell, cell_width + EPSILON)? {
                Some((_, h)) => heights.push(CellHeight {
                    row: area.row,
                    row_span: area.row_span,
                    height: h,
                }),
                None => return Ok(None),
            }
        }
        Ok(Some(TableLayout {
            row_heights: grid::row_heights(self.rows(), &heights),
            column_widths,
        }))
    }

    fn min_width(&self) -> Result<f64> {
        let implicit = self.implicit_cells();
        let mut bounds = Vec::new();
        for (cell, area) in self.cells.iter().chain(implicit.iter()) {
            let b = measure::size_bounds(cell)?;
            bounds.push(CellBounds {
                col: area.col,
                col_span: area.col_span,
                min_width: b.min_width,
                max_width: b.max_width,
            });
        }
        Ok(grid::column_bounds(self.cols(), &bounds).total_min())
    }
}

fn zebra_color((even, odd): (Color, Color), row: usize) -> Color {
    if row % 2 == 0 {
        even
    } else {
        odd
    }
}

impl LayoutElement for Table {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Table"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        match self.layout(available.width)? {
            Some(layout) => Ok(Fit::check(available, layout.width(), layout.height())),
            None => Ok(Fit::Overflow {
                width: self.min_width()?,
                height: 0.0,
            }),
        }
    }

    fn paint_content(&self, ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        let Some(layout) = self.layout(content_box.width)? else {
            return Fit::Overflow {
                width: self.min_width()?,
                height: 0.0,
            }
            .into_rect(self.kind(), content_box);
        };

        let implicit = self.implicit_cells();
        for (cell, area) in self.cells.iter().chain(implicit.iter()) {
            let rect = layout.area_rect(area, content_box.x, content_box.top());
            cell.paint(ctx, &rect)?;
        }

        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            layout.width(),
            layout.height(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tests::{doc_with_page, Block};
    use crate::element::Paragraph;
    use crate::font::{StandardFont, StandardFontKind};
    use crate::text::TextStyle;
    use std::sync::Arc;

    fn helvetica() -> TextStyle {
        TextStyle::new(Arc::new(StandardFont::new(StandardFontKind::Helvetica)), 12.0).unwrap()
    }

    #[test]
    fn cells_reject_nested_tables() {
        let inner = Table::new(1, 1).unwrap();
        assert_eq!(
            TableCell::new(inner).unwrap_err(),
            InputError::NestedTable("Table")
        );
        assert_eq!(
            TableCell::new(TableCell::empty()).unwrap_err(),
            InputError::NestedTable("TableCell")
        );
        assert!(TableCell::empty().with_span(0, 1).is_err());
    }

    #[test]
    fn grid_is_fully_covered() {
        let mut t = Table::new(2, 3).unwrap();
        t.add_cell(TableCell::new(Block::new(5.0, 5.0)).unwrap().with_span(1, 2).unwrap())
            .unwrap();
        t.add(Block::new(5.0, 5.0)).unwrap();
        let coverage = t.coverage();
        assert_eq!(coverage.len(), 6);
        let mut dedup = coverage.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), 6);
    }

    #[test]
    fn overfull_table_is_an_input_error() {
        let mut t = Table::new(1, 1).unwrap();
        t.add(Block::new(1.0, 1.0)).unwrap();
        assert!(matches!(
            t.add(Block::new(1.0, 1.0)),
            Err(InputError::TableFull { .. })
        ));
    }

    #[test]
    fn two_by_two_fills_width_evenly() {
        let mut t = Table::new(2, 2).unwrap();
        for _ in 0..4 {
            t.add(Paragraph::new("x", helvetica())).unwrap();
        }
        t.set_uniform_padding(Edges::uniform(5.0)).unwrap();
        let layout = t.layout(400.0).unwrap().unwrap();
        assert_eq!(layout.column_widths, vec![200.0, 200.0]);
        assert_eq!(layout.row_heights, vec![22.0, 22.0]);
    }

    #[test]
    fn wide_content_gets_more_room() {
        let mut t = Table::new(1, 2).unwrap();
        t.add(Block::new(10.0, 5.0)).unwrap();
        t.add(Block::new(50.0, 5.0)).unwrap();
        t.fill_width = false;
        let layout = t.layout(100.0).unwrap().unwrap();
        assert_eq!(layout.column_widths, vec![10.0, 50.0]);
    }

    #[test]
    fn too_narrow_is_overflow() {
        let mut t = Table::new(1, 2).unwrap();
        t.add(Block::new(60.0, 5.0)).unwrap();
        t.add(Block::new(60.0, 5.0)).unwrap();
        let fit = t.measure(&Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(fit, Fit::Overflow { width: 120.0, height: 0.0 });
    }

    #[test]
    fn declared_columns() {
        let mut t = Table::new(1, 2).unwrap();
        t.add(Block::new(10.0, 5.0)).unwrap();
        t.set_column_widths(vec![ColumnWidth::Fixed(30.0), ColumnWidth::Auto])
            .unwrap();
        let layout = t.layout(100.0).unwrap().unwrap();
        assert_eq!(layout.column_widths, vec![30.0, 70.0]);
        assert!(t.set_column_widths(vec![ColumnWidth::Auto]).is_err());
    }

    #[test]
    fn cells_paint_in_their_slots() {
        let mut doc = doc_with_page();
        let mut t = Table::new(1, 2).unwrap();
        t.add(Block::new(10.0, 5.0)).unwrap();
        t.add(Block::new(10.0, 8.0)).unwrap();
        t.set_zebra(Color::WHITE, Color::BLACK);
        let mut ctx = PaintContext::new(&mut doc, 0).unwrap();
        let painted = t.paint(&mut ctx, &Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(painted, Rect::new(0.0, 92.0, 100.0, 8.0));

        let cells: Vec<Rect> = doc
            .paint_log()
            .iter()
            .filter(|r| r.kind == "TableCell")
            .map(|r| r.painted)
            .collect();
        assert_eq!(cells, vec![Rect::new(0.0, 92.0, 50.0, 8.0), Rect::new(50.0, 92.0, 50.0, 8.0)]);
    }

    #[test]
    fn preferred_width_caps_growth() {
        let mut t = Table::new(1, 2).unwrap();
        t.add_cell(
            TableCell::new(Paragraph::new("a b c d e f", helvetica()))
                .unwrap()
                .with_preferred_size(Some(20.0), None)
                .unwrap(),
        )
        .unwrap();
        t.add(Block::new(10.0, 5.0)).unwrap();
        t.fill_width = false;
        let layout = t.layout(300.0).unwrap().unwrap();
        assert_eq!(layout.column_widths[0], 20.0);
    }
}
