//! Shared types used across all swarmfield crates.

use crate::error::{Result, SwarmError};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use uuid::Uuid;

/// Unique identifier for an agent in the swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic ID (for testing).
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u64_pair(0, seed))
    }

    /// Draw an ID from an injected random source, so seeded runs
    /// reproduce the same identities.
    pub fn from_rng(rng: &mut dyn RngCore) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 2D vector in world units. Used for positions, velocities and forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// A point in world coordinates.
pub type Position = Vec2;

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn distance_to(&self, other: &Vec2) -> f64 {
        (*self - *other).length()
    }

    /// Scale the vector down so its length does not exceed `max`.
    ///
    /// Both axes are scaled by the same factor, so the direction is kept.
    pub fn clamp_length(self, max: f64) -> Self {
        let len = self.length();
        if len > max {
            self * (max / len)
        } else {
            self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// Extent of the toroidal world. Positions live in `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Wrap a position onto the torus.
    pub fn wrap(&self, position: Position) -> Position {
        Vec2::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
        )
    }

    pub fn contains(&self, position: &Position) -> bool {
        (0.0..self.width).contains(&position.x) && (0.0..self.height).contains(&position.y)
    }

    /// Columns and rows of a grid of `cell_size` squares covering the world,
    /// `ceil(extent / cell_size)` per axis and at least one.
    pub fn grid_shape(&self, cell_size: f64) -> Result<(usize, usize)> {
        let cols = (self.width / cell_size).ceil().max(1.0);
        let rows = (self.height / cell_size).ceil().max(1.0);
        // Reject in floating point first; `as usize` saturates.
        if !(cols * rows <= MAX_GRID_CELLS as f64) {
            return Err(too_many_cells(format!("{}x{}", cols, rows)));
        }
        let (cols, rows) = (cols as usize, rows as usize);
        check_grid_cells(cols, rows)?;
        Ok((cols, rows))
    }
}

/// Upper bound on the cell count of any grid built over the world.
pub const MAX_GRID_CELLS: usize = 1 << 22;

/// Cell count of a `cols × rows` grid, rejecting empty or oversized shapes.
pub fn check_grid_cells(cols: usize, rows: usize) -> Result<usize> {
    match cols.checked_mul(rows) {
        Some(cells) if cells > 0 && cells <= MAX_GRID_CELLS => Ok(cells),
        _ => Err(too_many_cells(format!("{}x{}", cols, rows))),
    }
}

fn too_many_cells(shape: String) -> SwarmError {
    SwarmError::invalid_config(
        "grid",
        shape,
        format!("cell count must be between 1 and {}", MAX_GRID_CELLS),
    )
}

fn wrap_axis(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid of a tiny negative value rounds up to `extent`
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Position and velocity of an agent, as seen by its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Position,
    pub velocity: Vec2,
}

/// The current tick of the simulation.
pub type Tick = u64;
