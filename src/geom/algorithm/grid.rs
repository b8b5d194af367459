use geo::{Coord, Polygon, Rect};
use log::{debug, info};
use rstar::{RTree, AABB};
use thiserror::Error;

use crate::geom::BoundingBox;

/// Upper bound on lattice size, guards against very tall, thin extents.
pub const MAX_CELLS: usize = 10_000_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("no observations to aggregate")]
    NoObservations,

    #[error("cell count must be at least 1")]
    InvalidCellCount,

    #[error("observation {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("bounds are not finite")]
    NonFiniteBounds,

    #[error("bounding box has zero width ({width}), cannot derive a cell size")]
    DegenerateExtent { width: f64 },

    #[error("lattice of {columns}x{rows} cells exceeds the limit of {limit}", limit = MAX_CELLS)]
    TooManyCells { columns: usize, rows: usize },
}

/// A square grid cell with its observation count.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    rect: Rect<f64>,
    column: usize,
    row: usize,
    count: u32,
}

impl GridCell {
    #[inline] pub fn rect(&self) -> Rect<f64> { self.rect }

    #[inline] pub fn polygon(&self) -> Polygon<f64> { self.rect.to_polygon() }

    #[inline] pub fn column(&self) -> usize { self.column }

    #[inline] pub fn row(&self) -> usize { self.row }

    #[inline] pub fn count(&self) -> u32 { self.count }
}

/// A regular lattice of counted cells. Read-only once built.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<GridCell>,
    columns: usize,
    rows: usize,
    cell_size: f64,
    outside: usize,
}

impl Grid {
    /// Cells ordered column-major: index = column * rows + row.
    #[inline] pub fn cells(&self) -> &[GridCell] { &self.cells }

    #[inline] pub fn columns(&self) -> usize { self.columns }

    #[inline] pub fn rows(&self) -> usize { self.rows }

    #[inline] pub fn cell_size(&self) -> f64 { self.cell_size }

    /// Number of observations that fell outside every cell.
    #[inline] pub fn outside(&self) -> usize { self.outside }

    pub fn cell(&self, column: usize, row: usize) -> Option<&GridCell> {
        if column >= self.columns || row >= self.rows { return None }
        self.cells.get(column * self.rows + row)
    }

    /// Sum of all cell counts.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|cell| cell.count as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.cells.iter().map(|cell| cell.count).max().unwrap_or(0)
    }

    /// Extent of the whole lattice (covers and overhangs the input bounds).
    pub fn extent(&self) -> Rect<f64> {
        let first = self.cells[0].rect;
        let last = self.cells[self.cells.len() - 1].rect;
        Rect::new(first.min(), last.max())
    }
}

/// Compute the bounding rectangle of the observations.
pub fn bounds_of(points: &[Coord<f64>]) -> Result<Rect<f64>, GridError> {
    let first = *points.first().ok_or(GridError::NoObservations)?;

    let (mut min, mut max) = (first, first);
    for (index, point) in points.iter().enumerate() {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(GridError::NonFiniteCoordinate { index })
        }
        min = Coord { x: min.x.min(point.x), y: min.y.min(point.y) };
        max = Coord { x: max.x.max(point.x), y: max.y.max(point.y) };
    }
    Ok(Rect::new(min, max))
}

/// Grid the observations over their own bounding box, with `n_cells` cells across.
pub fn aggregate(points: &[Coord<f64>], n_cells: usize) -> Result<Grid, GridError> {
    let bounds = bounds_of(points)?;
    aggregate_within(points, bounds, n_cells)
}

/// Grid the observations over `bounds`, with `n_cells` cells across.
/// Observations outside the lattice are excluded and reported by `Grid::outside`.
pub fn aggregate_within(points: &[Coord<f64>], bounds: Rect<f64>, n_cells: usize) -> Result<Grid, GridError> {
    if points.is_empty() { return Err(GridError::NoObservations) }
    if let Some(index) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GridError::NonFiniteCoordinate { index })
    }

    let mut grid = lattice(bounds, n_cells)?;

    // Second pass: join observations to cells.
    let rtree = RTree::bulk_load(
        grid.cells.iter().enumerate()
            .map(|(i, cell)| BoundingBox::new(i, cell.rect))
            .collect()
    );

    for point in points {
        let envelope = AABB::from_point([point.x, point.y]);
        let hit = rtree.locate_in_envelope_intersecting(&envelope)
            .find(|entry| entry.contains_half_open(point.x, point.y))
            .map(|entry| entry.idx());

        match hit {
            Some(idx) => grid.cells[idx].count += 1,
            None => grid.outside += 1,
        }
    }

    info!("[geom::grid] {} observations into {}x{} cells (size {:.6}), {} outside",
        points.len(), grid.columns, grid.rows, grid.cell_size, grid.outside);

    Ok(grid)
}

/// Build the empty lattice: cells step from the minimum to max + cell_size on both axes.
fn lattice(bounds: Rect<f64>, n_cells: usize) -> Result<Grid, GridError> {
    if n_cells == 0 { return Err(GridError::InvalidCellCount) }

    let (min, max) = (bounds.min(), bounds.max());
    if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
        return Err(GridError::NonFiniteBounds)
    }

    let width = bounds.width();
    if width <= 0.0 { return Err(GridError::DegenerateExtent { width }) }

    let cell_size = width / n_cells as f64;
    // Size checks run in f64 so huge counts and tall extents cannot overflow usize.
    let row_steps = (bounds.height() / cell_size).ceil();
    let total = (n_cells as f64 + 1.0) * (row_steps + 1.0);
    if total.is_nan() || total > MAX_CELLS as f64 {
        return Err(GridError::TooManyCells {
            columns: n_cells.saturating_add(1),
            rows: (row_steps as usize).saturating_add(1),
        })
    }
    let columns = n_cells + 1;
    let rows = row_steps as usize + 1;

    // Edges come from one expression so neighbours share bit-identical values.
    let edge_x = |i: usize| min.x + i as f64 * cell_size;
    let edge_y = |j: usize| min.y + j as f64 * cell_size;

    let mut cells = Vec::with_capacity(columns * rows);
    for column in 0..columns {
        for row in 0..rows {
            cells.push(GridCell {
                rect: Rect::new(
                    Coord { x: edge_x(column), y: edge_y(row) },
                    Coord { x: edge_x(column + 1), y: edge_y(row + 1) },
                ),
                column,
                row,
                count: 0,
            });
        }
    }
    debug!("[geom::grid] built lattice {columns}x{rows}, cell size {cell_size}");

    Ok(Grid { cells, columns, rows, cell_size, outside: 0 })
}
