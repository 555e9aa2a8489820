//! Table and cell types.

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

/// A reconstructed table: an ordered 2-D grid of cells.
///
/// Invariant: every cell occupies exactly one (row, column) origin
/// coordinate, spans never make two cells overlap in area, and
/// `rows`/`cols` count the underlying grid bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Number of grid rows
    pub rows: usize,

    /// Number of grid columns
    pub cols: usize,

    /// Cells in row-major order of their origin coordinate
    pub cells: Vec<Cell>,

    /// Bounding box of the whole grid
    pub bbox: BBox,
}

impl Table {
    /// Create a table from its grid dimensions and cells.
    pub fn new(rows: usize, cols: usize, cells: Vec<Cell>, bbox: BBox) -> Self {
        Self {
            rows,
            cols,
            cells,
            bbox,
        }
    }

    /// Number of cells (merged cells count once).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells carrying text.
    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_populated()).count()
    }

    /// The cell whose origin is (row, col), if any.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Whether no cell carries text.
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    /// Whether any cell spans multiple rows or columns.
    pub fn has_merged_cells(&self) -> bool {
        self.cells.iter().any(|c| c.row_span > 1 || c.col_span > 1)
    }

    /// Plain text: rows joined by newlines, cells by tabs.
    pub fn plain_text(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let mut row_cells: Vec<&Cell> =
                self.cells.iter().filter(|c| c.row == row).collect();
            row_cells.sort_by_key(|c| c.col);
            if row_cells.is_empty() {
                continue;
            }
            rows.push(
                row_cells
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\t"),
            );
        }
        rows.join("\n")
    }
}

/// A rectangular table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Grid row of the cell origin
    pub row: usize,

    /// Grid column of the cell origin
    pub col: usize,

    /// Number of grid rows the cell spans
    pub row_span: usize,

    /// Number of grid columns the cell spans
    pub col_span: usize,

    /// Cell region on the page
    pub bbox: BBox,

    /// Text assembled from the characters assigned to the cell
    pub text: String,

    /// Whether any boundary of the cell was inferred by snapping rather
    /// than backed by a detected ruling
    pub snapped: bool,
}

impl Cell {
    /// Create a 1x1 cell.
    pub fn new(row: usize, col: usize, bbox: BBox) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            bbox,
            text: String::new(),
            snapped: false,
        }
    }

    /// Whether the cell carries visible text.
    pub fn is_populated(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
