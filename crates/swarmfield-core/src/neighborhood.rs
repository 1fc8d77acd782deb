//! Neighbourhood statistics: what an agent perceives of the agents near it.
//!
//! A neighbourhood is transient. It is gathered from the population at the
//! moment the agent updates, used once, and dropped. Agents keep no
//! references to each other.

use crate::types::*;
use serde::Serialize;

/// Anything that exposes a position and velocity to a neighbour query.
pub trait Kinematic {
    fn position(&self) -> Position;
    fn velocity(&self) -> Vec2;

    fn kinematics(&self) -> Kinematics {
        Kinematics {
            position: self.position(),
            velocity: self.velocity(),
        }
    }
}

impl Kinematic for Kinematics {
    fn position(&self) -> Position {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Smallest squared distance used in the inverse-square separation term.
const MIN_DISTANCE_SQUARED: f64 = 1e-12;

/// Flocking statistics of one agent's neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighborhood {
    /// Population indices of the neighbours, ascending.
    pub neighbors: Vec<usize>,
    /// Magnitude of the mean neighbour velocity. A scalar, not a direction.
    pub alignment: f64,
    /// Mean neighbour position.
    pub cohesion: Position,
    /// Sum of `(self - neighbour) / distance²` over all neighbours.
    pub separation: Vec2,
}

impl Neighborhood {
    /// A neighbourhood with nobody in it. The cohesion target is the agent's
    /// own position so that steering toward it is a no-op.
    pub fn empty(position: Position) -> Self {
        Self {
            neighbors: Vec::new(),
            alignment: 0.0,
            cohesion: position,
            separation: Vec2::ZERO,
        }
    }

    pub fn count(&self) -> usize {
        self.neighbors.len()
    }

    /// Scan the whole population for neighbours of `population[index]`.
    pub fn gather<K: Kinematic>(index: usize, population: &[K], radius: f64) -> Self {
        Self::from_candidates(index, population, 0..population.len(), radius)
    }

    /// Build the neighbourhood from a candidate list, e.g. from a spatial index.
    ///
    /// Candidates must be ascending. Summation then happens in population
    /// order, so the result matches [`Neighborhood::gather`] bit for bit.
    /// The agent itself is skipped by index, and only candidates strictly
    /// closer than `radius` count.
    pub fn from_candidates<K, I>(index: usize, population: &[K], candidates: I, radius: f64) -> Self
    where
        K: Kinematic,
        I: IntoIterator<Item = usize>,
    {
        let origin = population[index].position();
        let mut hood = Self::empty(origin);

        let mut velocity_sum = Vec2::ZERO;
        let mut position_sum = Vec2::ZERO;

        for other in candidates {
            if other == index {
                continue;
            }
            let neighbor = &population[other];
            let offset = origin - neighbor.position();
            let dist_sq = offset.length_squared();
            if dist_sq.sqrt() >= radius {
                continue;
            }
            hood.neighbors.push(other);
            velocity_sum += neighbor.velocity();
            position_sum += neighbor.position();
            hood.separation += offset / dist_sq.max(MIN_DISTANCE_SQUARED);
        }

        if !hood.neighbors.is_empty() {
            let n = hood.neighbors.len() as f64;
            hood.alignment = (velocity_sum / n).length();
            hood.cohesion = position_sum / n;
        }

        hood
    }
}
