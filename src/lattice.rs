//! Lattice lines and the mapping between grid space and real (pixel) space.
//!
//! The vision pipeline reports straight wall segments as lattice lines: each
//! line has a fixed position on one axis and a solidity mask along its length.
//! Even grid indices map onto line positions, odd grid indices onto the
//! midpoints between consecutive lines.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MazeError, Result};
use crate::grid::{Cell, CellIndex, GridIndex, GridPos, ItemKind, OccupancyGrid};

/// A detected lattice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeLine {
    /// Pixel position of the line on its axis (x for vertical, y for horizontal)
    pub position: i32,
    /// Solidity along the line, indexed by pixel on the other axis
    pub solid: Vec<bool>,
}

impl LatticeLine {
    pub fn new(position: i32, solid: Vec<bool>) -> Self {
        LatticeLine { position, solid }
    }

    /// A fully solid line of `length` pixels
    pub fn solid(position: i32, length: usize) -> Self {
        LatticeLine {
            position,
            solid: vec![true; length],
        }
    }

    /// Mark `[from, to)` as a gap in the wall
    pub fn with_gap(mut self, from: i32, to: i32) -> Self {
        for p in from.max(0)..to {
            if let Some(s) = self.solid.get_mut(p as usize) {
                *s = false;
            }
        }
        self
    }

    /// Pixels outside the detected segment count as wall
    pub fn is_solid_at(&self, p: i32) -> bool {
        if p < 0 {
            return true;
        }
        self.solid.get(p as usize).copied().unwrap_or(true)
    }
}

/// A point in real (pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealPos {
    pub x: i32,
    pub y: i32,
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// An item as reported by the vision pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedItem {
    pub x: i32,
    pub y: i32,
    pub kind: ItemKind,
}

/// An item snapped onto a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedItem {
    pub pos: GridPos,
    pub kind: ItemKind,
}

/// Vertical and horizontal lattice lines plus the cell midpoints between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeMap {
    vlines: Vec<LatticeLine>,
    hlines: Vec<LatticeLine>,
    xgrid: Vec<i32>,
    ygrid: Vec<i32>,
}

impl LatticeMap {
    /// Requires at least two lines per axis, otherwise no cell can be formed
    pub fn new(mut vlines: Vec<LatticeLine>, mut hlines: Vec<LatticeLine>) -> Result<Self> {
        if vlines.len() < 2 || hlines.len() < 2 {
            return Err(MazeError::MalformedGrid(format!(
                "Need at least 2 lines per axis, got {} vertical and {} horizontal",
                vlines.len(),
                hlines.len()
            )));
        }
        vlines.sort_by_key(|l| l.position);
        hlines.sort_by_key(|l| l.position);

        let xgrid = midpoints(&vlines);
        let ygrid = midpoints(&hlines);

        Ok(LatticeMap {
            vlines,
            hlines,
            xgrid,
            ygrid,
        })
    }

    pub fn vlines(&self) -> &[LatticeLine] {
        &self.vlines
    }

    pub fn hlines(&self) -> &[LatticeLine] {
        &self.hlines
    }

    /// Number of grid rows this lattice produces
    pub fn grid_rows(&self) -> usize {
        self.ygrid.len() + self.hlines.len()
    }

    /// Number of grid columns this lattice produces
    pub fn grid_cols(&self) -> usize {
        self.xgrid.len() + self.vlines.len()
    }

    /// Real coordinates of a grid position.
    /// Returns None when the position lies beyond the detected lattice.
    pub fn cell_to_real(&self, pos: GridPos) -> Option<RealPos> {
        let y = match pos.row_index() {
            GridIndex::Line(line) => self.hlines.get(line.0)?.position,
            GridIndex::Cell(cell) => *self.ygrid.get(cell.0)?,
        };
        let x = match pos.col_index() {
            GridIndex::Line(line) => self.vlines.get(line.0)?.position,
            GridIndex::Cell(cell) => *self.xgrid.get(cell.0)?,
        };
        Some(RealPos { x, y })
    }

    /// Snap a detected item to the nearest cell interior.
    /// Items on or outside the outer lattice lines are rejected.
    pub fn snap_item(&self, x: i32, y: i32) -> Option<GridPos> {
        let (left, right) = outer_bounds(&self.vlines)?;
        let (top, bottom) = outer_bounds(&self.hlines)?;
        if x <= left || x >= right || y <= top || y >= bottom {
            return None;
        }

        let row = CellIndex(nearest(&self.ygrid, y)?).to_grid();
        let col = CellIndex(nearest(&self.xgrid, x)?).to_grid();

        if row < self.grid_rows() && col < self.grid_cols() {
            Some(GridPos::new(row, col))
        } else {
            None
        }
    }

    /// Build the occupancy grid: lattice lines are walls except where the
    /// line mask shows a gap at a cell midpoint
    pub fn build_grid(&self) -> OccupancyGrid {
        let mut grid = OccupancyGrid::walled(self.ygrid.len(), self.xgrid.len());

        for (i, &x) in self.xgrid.iter().enumerate() {
            for (j, hline) in self.hlines.iter().enumerate() {
                if !hline.is_solid_at(x) {
                    grid.set(GridPos::new(j * 2, i * 2 + 1), Cell::Open);
                }
            }
        }
        for (i, &y) in self.ygrid.iter().enumerate() {
            for (j, vline) in self.vlines.iter().enumerate() {
                if !vline.is_solid_at(y) {
                    grid.set(GridPos::new(i * 2 + 1, j * 2), Cell::Open);
                }
            }
        }

        grid
    }

    /// Write detected items into the grid, returning the ones that landed.
    /// Detections snapping to the same cell collapse into one item; the last
    /// one wins, as it does in the grid.
    pub fn place_items(&self, grid: &mut OccupancyGrid, items: &[DetectedItem]) -> Vec<PlacedItem> {
        let mut placed: Vec<PlacedItem> = Vec::with_capacity(items.len());
        for item in items {
            match self.snap_item(item.x, item.y) {
                Some(pos) if grid.contains(pos) => {
                    grid.set(pos, Cell::Item(item.kind));
                    match placed.iter_mut().find(|p| p.pos == pos) {
                        Some(existing) => existing.kind = item.kind,
                        None => placed.push(PlacedItem { pos, kind: item.kind }),
                    }
                }
                _ => debug!(x = item.x, y = item.y, kind = ?item.kind, "item outside lattice, dropped"),
            }
        }
        placed
    }

    /// Lattice positions after the maze moved from a frame of size `from` to
    /// one of size `to`. Midpoints are scaled, not recomputed.
    pub fn rescaled(&self, from: FrameSize, to: FrameSize) -> LatticeMap {
        let sx = to.width as f64 / from.width.max(1) as f64;
        let sy = to.height as f64 / from.height.max(1) as f64;
        let scale = |p: i32, s: f64| (p as f64 * s).round_ties_even() as i32;

        LatticeMap {
            vlines: self
                .vlines
                .iter()
                .map(|l| LatticeLine::new(scale(l.position, sx), l.solid.clone()))
                .collect(),
            hlines: self
                .hlines
                .iter()
                .map(|l| LatticeLine::new(scale(l.position, sy), l.solid.clone()))
                .collect(),
            xgrid: self.xgrid.iter().map(|&x| scale(x, sx)).collect(),
            ygrid: self.ygrid.iter().map(|&y| scale(y, sy)).collect(),
        }
    }

    /// Smallest spacing between two consecutive lines on either axis
    pub fn min_cell_dimension(&self) -> Option<i32> {
        self.vlines
            .windows(2)
            .chain(self.hlines.windows(2))
            .map(|pair| pair[1].position - pair[0].position)
            .min()
    }
}

fn midpoints(lines: &[LatticeLine]) -> Vec<i32> {
    lines
        .windows(2)
        .map(|pair| ((pair[0].position + pair[1].position) as f64 / 2.0).round_ties_even() as i32)
        .collect()
}

fn outer_bounds(lines: &[LatticeLine]) -> Option<(i32, i32)> {
    Some((lines.first()?.position, lines.last()?.position))
}

/// Index of the closest value, first one wins on ties
fn nearest(values: &[i32], target: i32) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| (v - target).abs())
        .map(|(i, _)| i)
}
