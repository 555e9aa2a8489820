//! Table reconstruction from normalized edges.
//!
//! Edges are partitioned into connected regions, each region's positions
//! become a grid of boundary coordinates, sliver bands narrower than the
//! merge tolerance collapse, and every glyph inside the region is assigned
//! to exactly one cell.

use crate::config::Config;
use crate::geometry::{cmp_f32, BBox, Orientation};
use crate::input::CharPrimitive;
use crate::model::{Cell, Table};

use super::cluster::cluster_lines;
use super::rulings::Edge;
use super::tolerance::Tolerances;

/// Build all tables on a page. Glyphs consumed by a table are reported back
/// through `consumed` so the paragraph pass can skip them.
pub fn build_tables(
    edges: &[Edge],
    chars: &[CharPrimitive],
    tol: &Tolerances,
    config: &Config,
    consumed: &mut Vec<bool>,
) -> Vec<Table> {
    debug_assert_eq!(consumed.len(), chars.len());

    let regions = partition_regions(edges, tol.main_frame);
    let mut tables = Vec::new();

    for region in regions {
        match build_region(&region, chars, tol, config, consumed) {
            Some(table) => tables.push(table),
            None => log::debug!(
                "ruling region with {} edges formed no table grid",
                region.len()
            ),
        }
    }

    tables.sort_by(|a, b| cmp_f32(a.bbox.y0, b.bbox.y0).then_with(|| cmp_f32(a.bbox.x0, b.bbox.x0)));
    tables
}

/// Partition edges into connected components. Two edges connect when their
/// slack-expanded bounding boxes intersect.
fn partition_regions(edges: &[Edge], slack: f32) -> Vec<Vec<Edge>> {
    let n = edges.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut Vec<usize>, mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let boxes: Vec<BBox> = edges.iter().map(|e| e.bbox().expanded(slack)).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if boxes[i].intersects(&boxes[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: Vec<Vec<Edge>> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    for i in 0..n {
        let r = find(&mut parent, i);
        match roots.iter().position(|&x| x == r) {
            Some(g) => groups[g].push(edges[i].clone()),
            None => {
                roots.push(r);
                groups.push(vec![edges[i].clone()]);
            }
        }
    }
    groups
}

/// Build one table from a connected edge region, or `None` when the region
/// cannot form a grid (fewer than two boundaries on either axis, or empty
/// grid with `skip_empty_table`).
fn build_region(
    region: &[Edge],
    chars: &[CharPrimitive],
    tol: &Tolerances,
    config: &Config,
    consumed: &mut Vec<bool>,
) -> Option<Table> {
    let (row_bounds, row_synth) = boundary_positions(region, Orientation::Horizontal, tol.main_frame);
    let (col_bounds, col_synth) = boundary_positions(region, Orientation::Vertical, tol.main_frame);

    if row_bounds.len() < 2 || col_bounds.len() < 2 {
        return None;
    }

    let rows = row_bounds.len() - 1;
    let cols = col_bounds.len() - 1;
    let bbox = BBox::new(
        col_bounds[0],
        row_bounds[0],
        col_bounds[cols],
        row_bounds[rows],
    );

    let mut cells: Vec<Cell> = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let mut cell = Cell::new(
                r,
                c,
                BBox::new(
                    col_bounds[c],
                    row_bounds[r],
                    col_bounds[c + 1],
                    row_bounds[r + 1],
                ),
            );
            // A cell is snapped when any of its four boundaries is not
            // backed by a detected ruling.
            cell.snapped = row_synth[r]
                || row_synth[r + 1]
                || col_synth[c]
                || col_synth[c + 1];
            cells.push(cell);
        }
    }

    let mut cells = merge_adjacent_cells(
        cells,
        &row_bounds,
        &col_bounds,
        config.table_cell_merge_tolerance,
    );

    assign_chars(&mut cells, &bbox, chars, tol, config, consumed);

    if config.skip_empty_table && cells.iter().all(|cell| !cell.is_populated()) {
        log::debug!("skipping empty {}x{} table at {:?}", rows, cols, bbox);
        return None;
    }

    Some(Table::new(rows, cols, cells, bbox))
}

/// Sorted unique boundary positions for one axis, with a synthetic marker
/// per boundary. Positions within the tolerance coincide; a coinciding pair
/// is synthetic only when every contributing edge was synthesized.
fn boundary_positions(region: &[Edge], orientation: Orientation, tol: f32) -> (Vec<f32>, Vec<bool>) {
    let mut marked: Vec<(f32, bool)> = region
        .iter()
        .filter(|e| e.orientation == orientation)
        .map(|e| (e.pos, e.synthetic))
        .collect();
    marked.sort_by(|a, b| cmp_f32(a.0, b.0));

    let mut positions = Vec::new();
    let mut synthetic = Vec::new();
    for (pos, synth) in marked {
        match positions.last() {
            Some(&last) if pos - last <= tol => {
                let i = synthetic.len() - 1;
                synthetic[i] = synthetic[i] && synth;
            }
            _ => {
                positions.push(pos);
                synthetic.push(synth);
            }
        }
    }
    (positions, synthetic)
}

/// Merge cells across grid bands narrower than the tolerance. Produces a
/// new cell collection: one cell per (row group, column group), its spans
/// summing the spans of the cells it absorbed, so every merge strictly
/// decreases the cell count.
pub fn merge_adjacent_cells(
    cells: Vec<Cell>,
    row_bounds: &[f32],
    col_bounds: &[f32],
    tolerance: f32,
) -> Vec<Cell> {
    let row_groups = band_groups(row_bounds, tolerance);
    let col_groups = band_groups(col_bounds, tolerance);
    if row_groups.len() == row_bounds.len() - 1 && col_groups.len() == col_bounds.len() - 1 {
        return cells;
    }

    let mut merged: Vec<Cell> = Vec::with_capacity(row_groups.len() * col_groups.len());
    for &(r0, r1) in &row_groups {
        for &(c0, c1) in &col_groups {
            let members: Vec<&Cell> = cells
                .iter()
                .filter(|cell| cell.row >= r0 && cell.row <= r1 && cell.col >= c0 && cell.col <= c1)
                .collect();
            let Some(first) = members.first() else {
                continue;
            };
            let mut cell = (*first).clone();
            cell.row = r0;
            cell.col = c0;
            cell.row_span = r1 - r0 + 1;
            cell.col_span = c1 - c0 + 1;
            cell.bbox = BBox::new(
                col_bounds[c0],
                row_bounds[r0],
                col_bounds[c1 + 1],
                row_bounds[r1 + 1],
            );
            cell.snapped = members.iter().any(|m| m.snapped);
            merged.push(cell);
        }
    }
    log::debug!(
        "cell merge collapsed {} cells into {}",
        cells.len(),
        merged.len()
    );
    merged
}

/// Group consecutive grid bands so that a band narrower than the tolerance
/// never stands alone: it joins the previous group, or the next one when it
/// leads the grid. Returns inclusive (start, end) band index ranges.
fn band_groups(bounds: &[f32], tolerance: f32) -> Vec<(usize, usize)> {
    let n = bounds.len() - 1;
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut open_sliver = false;
    for i in 0..n {
        let sliver = bounds[i + 1] - bounds[i] < tolerance;
        match groups.last_mut() {
            Some(last) if sliver || open_sliver => {
                last.1 = i;
                if !sliver {
                    open_sliver = false;
                }
            }
            _ => {
                groups.push((i, i));
                open_sliver = sliver;
            }
        }
    }
    groups
}

/// Assign each glyph inside the table region to exactly one cell, reusing
/// the line clusterer to order the cell text.
fn assign_chars(
    cells: &mut [Cell],
    table_bbox: &BBox,
    chars: &[CharPrimitive],
    tol: &Tolerances,
    config: &Config,
    consumed: &mut Vec<bool>,
) {
    let mut per_cell: Vec<Vec<CharPrimitive>> = vec![Vec::new(); cells.len()];

    for (i, c) in chars.iter().enumerate() {
        if consumed[i] || c.bbox.intersection_area(table_bbox) <= 0.0 {
            continue;
        }
        if let Some(idx) = cell_for_char(cells, c) {
            per_cell[idx].push(c.clone());
            consumed[i] = true;
        }
    }

    for (cell, glyphs) in cells.iter_mut().zip(per_cell) {
        if glyphs.is_empty() {
            continue;
        }
        let lines = cluster_lines(&glyphs, tol, config.char_overlap_size);
        cell.text = lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n");
    }
}

/// Pick the target cell for one glyph: the cell containing its centroid, or
/// failing that the cell with maximal overlap area, topmost-leftmost on ties.
fn cell_for_char(cells: &[Cell], c: &CharPrimitive) -> Option<usize> {
    let center = c.bbox.center();
    for (i, cell) in cells.iter().enumerate() {
        if cell.bbox.contains_point(&center) {
            return Some(i);
        }
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, cell) in cells.iter().enumerate() {
        let overlap = cell.bbox.intersection_area(&c.bbox);
        if overlap <= 0.0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((bi, barea)) => {
                overlap > barea
                    || (overlap == barea
                        && (cells[i].row, cells[i].col) < (cells[bi].row, cells[bi].col))
            }
        };
        if better {
            best = Some((i, overlap));
        }
    }
    best.map(|(i, _)| i)
}
