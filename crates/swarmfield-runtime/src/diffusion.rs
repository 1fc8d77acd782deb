//! Diffusion field: the concrete chemical grid.
//!
//! A toroidal grid of chemical concentrations plus a derived gradient force
//! per cell. Each [`DiffusionField::step`]:
//!
//! 1. replaces every cell by the mean of its 3×3 Moore neighbourhood
//!    (wrapping on both axes, self included) times the decay factor;
//! 2. derives the force from central differences of the *pre-step* grid.
//!
//! All reads come from the current buffer and all writes go to a second
//! buffer that is swapped in once every cell is done, so no cell ever sees
//! a partially-updated neighbour.
//!
//! Deposits land in the current buffer right away but are only averaged and
//! turned into force by the next step. That one-tick latency is what couples
//! agents to each other through the field.

use serde::{Deserialize, Serialize};
use swarmfield_core::error::{ensure_positive, Result, SwarmError};
use swarmfield_core::field::ChemicalField;
use swarmfield_core::types::*;

/// Tuning of the diffusion grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// World units per cell edge (default: 20.0).
    pub resolution: f64,
    /// Factor applied to the neighbourhood mean each step (default: 0.99).
    pub decay: f64,
    /// Scale of the central-difference force (default: 0.1).
    pub gradient_scale: f64,
    /// Cells at or below this concentration are left out of snapshots (default: 0.01).
    pub visibility_threshold: f64,
    /// Optional saturation limit for deposits (default: none).
    pub chemical_ceiling: Option<f64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            resolution: 20.0,
            decay: 0.99,
            gradient_scale: 0.1,
            visibility_threshold: 0.01,
            chemical_ceiling: None,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(SwarmError::invalid_resolution(self.resolution));
        }
        if !(self.decay.is_finite() && (0.0..=1.0).contains(&self.decay)) {
            return Err(SwarmError::invalid_config("field.decay", self.decay, "must be within 0.0-1.0"));
        }
        if !self.gradient_scale.is_finite() {
            return Err(SwarmError::invalid_config(
                "field.gradient_scale",
                self.gradient_scale,
                "must be finite",
            ));
        }
        if !(self.visibility_threshold.is_finite() && self.visibility_threshold >= 0.0) {
            return Err(SwarmError::invalid_config(
                "field.visibility_threshold",
                self.visibility_threshold,
                "must be non-negative and finite",
            ));
        }
        if let Some(ceiling) = self.chemical_ceiling {
            ensure_positive("field.chemical_ceiling", ceiling)?;
        }
        Ok(())
    }
}

/// One grid cell as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub col: usize,
    pub row: usize,
    /// World coordinates of the cell's top-left corner.
    pub origin: Position,
    /// Edge length in world units.
    pub size: f64,
    pub chemical: f64,
    /// Suggested fill opacity, `min(chemical × 0.1, 1)`.
    pub opacity: f64,
}

/// Toroidal double-buffered chemical grid.
#[derive(Debug, Clone)]
pub struct DiffusionField {
    cols: usize,
    rows: usize,
    config: FieldConfig,

    /// Current concentrations, row-major.
    chemical: Vec<f64>,
    /// Force derived at the last step, row-major.
    force: Vec<Vec2>,

    // Write buffers for the next step.
    next_chemical: Vec<f64>,
    next_force: Vec<Vec2>,

    steps: u64,
}

impl DiffusionField {
    /// Build a zeroed field covering a `width × height` world.
    ///
    /// `cols = ceil(width / resolution)` and `rows = ceil(height / resolution)`.
    pub fn new(width: f64, height: f64, config: FieldConfig) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SwarmError::invalid_dimensions(width, height));
        }
        config.validate()?;

        let (cols, rows) = Bounds::new(width, height).grid_shape(config.resolution)?;
        Self::with_grid(cols, rows, config)
    }

    /// Build a zeroed field with an explicit grid shape.
    pub fn with_grid(cols: usize, rows: usize, config: FieldConfig) -> Result<Self> {
        let cells = check_grid_cells(cols, rows)?;
        Ok(Self {
            cols,
            rows,
            config,
            chemical: vec![0.0; cells],
            force: vec![Vec2::ZERO; cells],
            next_chemical: vec![0.0; cells],
            next_force: vec![Vec2::ZERO; cells],
            steps: 0,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn resolution(&self) -> f64 {
        self.config.resolution
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Map world coordinates to `(col, row)`, or `None` outside the grid.
    pub fn cell_of(&self, position: Position) -> Option<(usize, usize)> {
        let col = (position.x / self.config.resolution).floor();
        let row = (position.y / self.config.resolution).floor();
        // NaN fails both comparisons
        if col >= 0.0 && row >= 0.0 && col < self.cols as f64 && row < self.rows as f64 {
            Some((col as usize, row as usize))
        } else {
            None
        }
    }

    pub fn chemical_at(&self, col: usize, row: usize) -> Option<f64> {
        (col < self.cols && row < self.rows).then(|| self.chemical[self.index(col, row)])
    }

    pub fn force_at(&self, col: usize, row: usize) -> Option<Vec2> {
        (col < self.cols && row < self.rows).then(|| self.force[self.index(col, row)])
    }

    /// Overwrite one cell's concentration. Out-of-range cells are ignored.
    pub fn set_chemical(&mut self, col: usize, row: usize, value: f64) {
        if col < self.cols && row < self.rows {
            let idx = self.index(col, row);
            self.chemical[idx] = value;
        }
    }

    /// Sum of all concentrations.
    pub fn total_chemical(&self) -> f64 {
        self.chemical.iter().sum()
    }

    /// Highest concentration in the grid.
    pub fn peak_chemical(&self) -> f64 {
        self.chemical.iter().cloned().fold(0.0f64, f64::max)
    }

    /// Row-major view of the concentrations.
    pub fn chemical(&self) -> &[f64] {
        &self.chemical
    }

    /// Compute what `step()` would write for one cell, reading only the
    /// current grid.
    pub fn evaluate_cell(&self, col: usize, row: usize) -> (f64, Vec2) {
        let cols = self.cols;
        let rows = self.rows;
        let at = |c: usize, r: usize| self.chemical[r * cols + c];

        let west = (col + cols - 1) % cols;
        let east = (col + 1) % cols;
        let north = (row + rows - 1) % rows;
        let south = (row + 1) % rows;

        let mut sum = 0.0;
        for r in [north, row, south] {
            for c in [west, col, east] {
                sum += at(c, r);
            }
        }
        let chemical = (sum / 9.0) * self.config.decay;

        let force = Vec2::new(
            (at(east, row) - at(west, row)) * self.config.gradient_scale,
            (at(col, south) - at(col, north)) * self.config.gradient_scale,
        );

        (chemical, force)
    }

    /// Advance the field by one step.
    pub fn step(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (chemical, force) = self.evaluate_cell(col, row);
                let idx = self.index(col, row);
                self.next_chemical[idx] = chemical;
                self.next_force[idx] = force;
            }
        }
        std::mem::swap(&mut self.chemical, &mut self.next_chemical);
        std::mem::swap(&mut self.force, &mut self.next_force);
        self.steps += 1;
    }

    /// Cells whose concentration exceeds the configured visibility threshold.
    pub fn visible_cells(&self) -> Vec<CellSnapshot> {
        self.cells_above(self.config.visibility_threshold)
    }

    /// Cells whose concentration exceeds `threshold`, row-major.
    pub fn cells_above(&self, threshold: f64) -> Vec<CellSnapshot> {
        let size = self.config.resolution;
        let mut cells = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let chemical = self.chemical[self.index(col, row)];
                if chemical > threshold {
                    cells.push(CellSnapshot {
                        col,
                        row,
                        origin: Position::new(col as f64 * size, row as f64 * size),
                        size,
                        chemical,
                        opacity: (chemical * 0.1).min(1.0),
                    });
                }
            }
        }
        cells
    }

    /// Zero every cell and forget the step count.
    pub fn clear(&mut self) {
        self.chemical.iter_mut().for_each(|c| *c = 0.0);
        self.force.iter_mut().for_each(|f| *f = Vec2::ZERO);
        self.steps = 0;
    }
}

impl ChemicalField for DiffusionField {
    fn deposit(&mut self, position: Position, amount: f64) {
        if let Some((col, row)) = self.cell_of(position) {
            let idx = self.index(col, row);
            let value = self.chemical[idx] + amount;
            self.chemical[idx] = match self.config.chemical_ceiling {
                Some(ceiling) => value.min(ceiling),
                None => value,
            };
        }
    }

    fn sample_force(&self, position: Position) -> Vec2 {
        match self.cell_of(position) {
            Some((col, row)) => self.force[self.index(col, row)],
            None => Vec2::ZERO,
        }
    }
}
