//! Uniform bucket grid for neighbour candidate queries.
//!
//! Buckets have the edge length of the neighbour radius, so every agent
//! within the radius of a point lies in the 3×3 block of buckets around
//! it. Neighbourhoods use plain Euclidean distance (no wrap-around), and
//! the query does not wrap either.

use swarmfield_core::error::Result;
use swarmfield_core::types::*;

/// Buckets of agent indices over the world rectangle.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// `cell_size` must be positive; callers validate it up front.
    pub fn new(bounds: Bounds, cell_size: f64) -> Result<Self> {
        let (cols, rows) = bounds.grid_shape(cell_size)?;
        Ok(Self {
            cell_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn axis_cell(&self, value: f64, len: usize) -> usize {
        let cell = (value / self.cell_size).floor();
        if cell <= 0.0 {
            0
        } else {
            (cell as usize).min(len - 1)
        }
    }

    fn bucket_of(&self, position: Position) -> usize {
        let col = self.axis_cell(position.x, self.cols);
        let row = self.axis_cell(position.y, self.rows);
        row * self.cols + col
    }

    /// Re-bucket every position.
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Position>,
    {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for (idx, position) in positions.into_iter().enumerate() {
            let bucket = self.bucket_of(position);
            self.buckets[bucket].push(idx);
        }
    }

    /// Move one agent from the bucket of `from` to the bucket of `to`.
    pub fn relocate(&mut self, idx: usize, from: Position, to: Position) {
        let old = self.bucket_of(from);
        let new = self.bucket_of(to);
        if old == new {
            return;
        }
        if let Some(slot) = self.buckets[old].iter().position(|&i| i == idx) {
            self.buckets[old].swap_remove(slot);
        }
        self.buckets[new].push(idx);
    }

    /// Indices of every agent that may lie within `radius` of `center`,
    /// sorted ascending. The caller applies the exact distance test.
    pub fn candidates(&self, center: Position, radius: f64) -> Vec<usize> {
        let col_lo = self.axis_cell(center.x - radius, self.cols);
        let col_hi = self.axis_cell(center.x + radius, self.cols);
        let row_lo = self.axis_cell(center.y - radius, self.rows);
        let row_hi = self.axis_cell(center.y + radius, self.rows);

        let mut out = Vec::new();
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                out.extend_from_slice(&self.buckets[row * self.cols + col]);
            }
        }
        out.sort_unstable();
        out
    }
}
