//! # Table Measurement
//!
//! Grid placement, column widths and row heights for tables.
//!
//! Column widths come from a three-phase algorithm:
//! 1. every cell reports `min_w` / `max_w` (see [`size_bounds`](super::size_bounds)),
//! 2. columns take the largest bounds of their single-column cells, and
//!    spanning cells spread any deficit evenly over the columns they span,
//! 3. starting from the minimums, all columns with headroom grow together
//!    one unit at a time until the table fills the available width.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geometry::EPSILON;

/// Width added to every growable column per growth step.
const GROWTH_UNIT: f64 = 1.0;

/// Occupancy of a `rows x cols` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    owner: Vec<Option<usize>>,
}

/// Where a cell sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArea {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl GridArea {
    /// Every `(row, col)` the area covers.
    pub fn coordinates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.row + self.row_span)
            .flat_map(move |r| (self.col..self.col + self.col_span).map(move |c| (r, c)))
    }

    pub fn last_row(&self) -> usize {
        self.row + self.row_span - 1
    }
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self, InputError> {
        if rows == 0 || cols == 0 {
            return Err(InputError::EmptyTable);
        }
        Ok(Self {
            rows,
            cols,
            owner: vec![None; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn owner(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.owner[row * self.cols + col]
    }

    fn block_is_free(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
        row + row_span <= self.rows
            && col + col_span <= self.cols
            && (row..row + row_span)
                .all(|r| (col..col + col_span).all(|c| self.owner[r * self.cols + c].is_none()))
    }

    /// Claim the first free slot in row-major order that fits a
    /// `row_span x col_span` block for cell `id`.
    pub fn place(
        &mut self,
        id: usize,
        row_span: usize,
        col_span: usize,
    ) -> Result<GridArea, InputError> {
        if row_span == 0 {
            return Err(InputError::InvalidSpan { what: "row" });
        }
        if col_span == 0 {
            return Err(InputError::InvalidSpan { what: "column" });
        }
        let full = || InputError::TableFull {
            rows: self.rows,
            cols: self.cols,
            row_span,
            col_span,
        };
        let (row, col) = (0..self.rows * self.cols)
            .map(|i| (i / self.cols, i % self.cols))
            .find(|&(r, c)| self.block_is_free(r, c, row_span, col_span))
            .ok_or_else(full)?;

        let area = GridArea {
            row,
            col,
            row_span,
            col_span,
        };
        for (r, c) in area.coordinates() {
            self.owner[r * self.cols + c] = Some(id);
        }
        Ok(area)
    }

    /// Coordinates no cell has claimed, row-major.
    pub fn unclaimed(&self) -> Vec<(usize, usize)> {
        (0..self.rows * self.cols)
            .filter(|i| self.owner[*i].is_none())
            .map(|i| (i / self.cols, i % self.cols))
            .collect()
    }
}

/// Width bounds of one cell, with its column range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub col: usize,
    pub col_span: usize,
    pub min_width: f64,
    pub max_width: f64,
}

/// Per-column width bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBounds {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl ColumnBounds {
    pub fn total_min(&self) -> f64 {
        self.min.iter().sum()
    }

    pub fn total_max(&self) -> f64 {
        self.max.iter().sum()
    }
}

/// Phases 1 and 2: collapse cell bounds into column bounds.
pub fn column_bounds(cols: usize, cells: &[CellBounds]) -> ColumnBounds {
    let mut min = vec![0.0f64; cols];
    let mut max = vec![0.0f64; cols];

    for cell in cells.iter().filter(|c| c.col_span == 1 && c.col < cols) {
        min[cell.col] = min[cell.col].max(cell.min_width);
        max[cell.col] = max[cell.col].max(cell.max_width);
    }

    let mut spanning: Vec<&CellBounds> = cells
        .iter()
        .filter(|c| c.col_span > 1 && c.col < cols)
        .collect();
    spanning.sort_by_key(|c| c.col_span);

    for cell in spanning {
        let range = cell.col..(cell.col + cell.col_span).min(cols);
        let k = range.len() as f64;
        let min_sum: f64 = min[range.clone()].iter().sum();
        if min_sum < cell.min_width {
            let share = (cell.min_width - min_sum) / k;
            min[range.clone()].iter_mut().for_each(|w| *w += share);
        }
        let max_sum: f64 = max[range.clone()].iter().sum();
        if max_sum < cell.max_width {
            let share = (cell.max_width - max_sum) / k;
            max[range].iter_mut().for_each(|w| *w += share);
        }
    }

    for (lo, hi) in min.iter().zip(max.iter_mut()) {
        *hi = hi.max(*lo);
    }
    ColumnBounds { min, max }
}

/// Phase 3: grow columns from their minimums toward `available`.
///
/// All columns below their maximum grow together by one unit per step;
/// the final partial step is shared evenly and any rounding remainder goes
/// to the leftmost column that can take it. With `fill` set, space left
/// once every column has reached its maximum is spread evenly over all
/// columns. Returns `None` when the minimums alone exceed `available`.
pub fn distribute_widths(bounds: &ColumnBounds, available: f64, fill: bool) -> Option<Vec<f64>> {
    if bounds.total_min() > available + EPSILON {
        return None;
    }
    let mut widths = bounds.min.clone();
    let mut remaining = available - widths.iter().sum::<f64>();

    loop {
        let growable: Vec<usize> = (0..widths.len())
            .filter(|&i| widths[i] < bounds.max[i] - EPSILON)
            .collect();
        if growable.is_empty() || remaining <= EPSILON {
            break;
        }
        let n = growable.len() as f64;
        let step = GROWTH_UNIT.min(remaining / n);
        for &i in &growable {
            let add = step.min(bounds.max[i] - widths[i]);
            widths[i] += add;
            remaining -= add;
        }
    }

    if remaining > EPSILON {
        if let Some(i) = (0..widths.len()).find(|&i| widths[i] < bounds.max[i] - EPSILON) {
            let add = remaining.min(bounds.max[i] - widths[i]);
            widths[i] += add;
            remaining -= add;
        }
    }

    if fill && remaining > EPSILON && !widths.is_empty() {
        let share = remaining / widths.len() as f64;
        widths.iter_mut().for_each(|w| *w += share);
    }
    Some(widths)
}

/// Declared width of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColumnWidth {
    /// Fixed width in points.
    Fixed(f64),
    /// Fraction (0.0-1.0) of the table's available width.
    Fraction(f64),
    /// Shares what the other columns leave, evenly.
    Auto,
}

/// Resolve declared column widths against `available`.
pub fn resolve_declared(columns: &[ColumnWidth], available: f64) -> Vec<f64> {
    let mut widths = vec![0.0; columns.len()];
    let mut remaining = available;
    let mut autos = 0usize;
    for (i, c) in columns.iter().enumerate() {
        match c {
            ColumnWidth::Fixed(pt) => {
                widths[i] = pt.max(0.0);
                remaining -= widths[i];
            }
            ColumnWidth::Fraction(f) => {
                widths[i] = available * f.clamp(0.0, 1.0);
                remaining -= widths[i];
            }
            ColumnWidth::Auto => autos += 1,
        }
    }
    if autos > 0 {
        let share = remaining.max(0.0) / autos as f64;
        for (i, c) in columns.iter().enumerate() {
            if matches!(c, ColumnWidth::Auto) {
                widths[i] = share;
            }
        }
    }
    widths
}

/// Height a cell needs over its rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellHeight {
    pub row: usize,
    pub row_span: usize,
    pub height: f64,
}

/// Row heights: the tallest single-row cell of each row, then spanning
/// cells push their last row down when the rows they span are too short.
pub fn row_heights(rows: usize, cells: &[CellHeight]) -> Vec<f64> {
    let mut heights = vec![0.0f64; rows];
    for cell in cells.iter().filter(|c| c.row_span == 1 && c.row < rows) {
        heights[cell.row] = heights[cell.row].max(cell.height);
    }

    let mut spanning: Vec<&CellHeight> = cells
        .iter()
        .filter(|c| c.row_span > 1 && c.row < rows)
        .collect();
    spanning.sort_by_key(|c| c.row_span);

    for cell in spanning {
        let end = (cell.row + cell.row_span).min(rows);
        let spanned: f64 = heights[cell.row..end].iter().sum();
        if spanned < cell.height {
            heights[end - 1] += cell.height - spanned;
        }
    }
    heights
}

/// Offsets of each track from the first, plus the total as last entry.
pub fn offsets(sizes: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(sizes.len() + 1);
    let mut acc = 0.0;
    out.push(0.0);
    for s in sizes {
        acc += s;
        out.push(acc);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(col: usize, col_span: usize, min: f64, max: f64) -> CellBounds {
        CellBounds {
            col,
            col_span,
            min_width: min,
            max_width: max,
        }
    }

    #[test]
    fn row_major_placement() {
        let mut g = Grid::new(2, 2).unwrap();
        assert_eq!(g.place(0, 1, 2).unwrap(), GridArea { row: 0, col: 0, row_span: 1, col_span: 2 });
        assert_eq!(g.place(1, 1, 1).unwrap().row, 1);
        assert_eq!(g.unclaimed(), vec![(1, 1)]);
        g.place(2, 1, 1).unwrap();
        assert!(matches!(g.place(3, 1, 1), Err(InputError::TableFull { .. })));
    }

    #[test]
    fn spans_skip_blocked_slots() {
        let mut g = Grid::new(2, 3).unwrap();
        g.place(0, 1, 1).unwrap();
        g.place(1, 1, 1).unwrap();
        // A 1x2 block no longer fits on row 0.
        let area = g.place(2, 1, 2).unwrap();
        assert_eq!((area.row, area.col), (1, 0));
        assert_eq!(g.owner(0, 2), None);
        assert_eq!(g.owner(1, 1), Some(2));
    }

    #[test]
    fn invalid_spans() {
        let mut g = Grid::new(1, 1).unwrap();
        assert_eq!(g.place(0, 0, 1), Err(InputError::InvalidSpan { what: "row" }));
        assert_eq!(g.place(0, 1, 0), Err(InputError::InvalidSpan { what: "column" }));
        assert!(matches!(g.place(0, 1, 2), Err(InputError::TableFull { .. })));
        assert_eq!(Grid::new(0, 3), Err(InputError::EmptyTable));
    }

    #[test]
    fn spanning_cells_spread_deficit() {
        let b = column_bounds(2, &[cell(0, 1, 10.0, 20.0), cell(1, 1, 10.0, 20.0), cell(0, 2, 40.0, 60.0)]);
        assert_eq!(b.min, vec![20.0, 20.0]);
        assert_eq!(b.max, vec![30.0, 30.0]);
    }

    #[test]
    fn columns_grow_together() {
        let b = ColumnBounds {
            min: vec![10.0, 10.0, 10.0],
            max: vec![15.0, 100.0, 100.0],
        };
        let w = distribute_widths(&b, 100.0, false).unwrap();
        assert_eq!(w[0], 15.0);
        assert!((w[1] - 42.5).abs() < 1e-9);
        assert!((w[2] - 42.5).abs() < 1e-9);
        assert!((w.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn no_headroom_without_fill_stops_at_max() {
        let b = ColumnBounds {
            min: vec![10.0, 10.0],
            max: vec![20.0, 20.0],
        };
        assert_eq!(distribute_widths(&b, 100.0, false).unwrap(), vec![20.0, 20.0]);
        assert_eq!(distribute_widths(&b, 100.0, true).unwrap(), vec![50.0, 50.0]);
    }

    #[test]
    fn minimums_too_wide() {
        let b = ColumnBounds {
            min: vec![60.0, 60.0],
            max: vec![60.0, 60.0],
        };
        assert_eq!(distribute_widths(&b, 100.0, true), None);
    }

    #[test]
    fn declared_widths() {
        let w = resolve_declared(
            &[ColumnWidth::Fixed(100.0), ColumnWidth::Fraction(0.25), ColumnWidth::Auto, ColumnWidth::Auto],
            400.0,
        );
        assert_eq!(w, vec![100.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn spanning_rows_push_last_row() {
        let h = row_heights(
            3,
            &[
                CellHeight { row: 0, row_span: 1, height: 10.0 },
                CellHeight { row: 1, row_span: 1, height: 12.0 },
                CellHeight { row: 0, row_span: 2, height: 30.0 },
            ],
        );
        assert_eq!(h, vec![10.0, 20.0, 0.0]);
    }

    #[test]
    fn track_offsets() {
        assert_eq!(offsets(&[10.0, 20.0]), vec![0.0, 10.0, 30.0]);
    }
}
