//! Phase: the behavioural mode of an agent.
//!
//! An agent with too few neighbours wanders on its own. Once enough
//! neighbours are around, local velocity agreement (alignment) acts as an
//! order parameter: low agreement pulls the group together (Clustering),
//! high agreement switches to a spacing-preserving mode (Collective) so the
//! flock does not collapse into a point.
//!
//! Classification is memoryless. The phase is recomputed every step from
//! the current neighbour statistics and nothing about previous phases is
//! kept.

use crate::neighborhood::Neighborhood;
use crate::types::*;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Behavioural mode of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Fewer than the quorum of neighbours; moves with random jitter.
    Individual,
    /// Quorum reached but velocities disagree; steers toward the local centre.
    Clustering,
    /// Quorum reached and velocities agree; steers along the separation vector.
    Collective,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Individual, Phase::Clustering, Phase::Collective];

    /// How strongly this phase feeds the shared field.
    pub fn emergence_level(self) -> f64 {
        match self {
            Phase::Individual => 0.0,
            Phase::Clustering => 0.5,
            Phase::Collective => 1.0,
        }
    }

    /// Pick the phase for a neighbour count and alignment magnitude.
    ///
    /// Checks run in a fixed order: the quorum test first, then the
    /// alignment test. An agent below quorum is Individual whatever its
    /// alignment.
    pub fn classify(neighbor_count: usize, alignment: f64, thresholds: &PhaseThresholds) -> Phase {
        if neighbor_count < thresholds.min_neighbors {
            Phase::Individual
        } else if alignment > thresholds.alignment {
            Phase::Collective
        } else {
            Phase::Clustering
        }
    }

    /// Velocity change this phase applies before the field force.
    pub fn steer(
        self,
        position: Position,
        neighborhood: &Neighborhood,
        params: &SteeringParams,
        rng: &mut dyn RngCore,
    ) -> Vec2 {
        match self {
            Phase::Individual => Vec2::new(
                (rng.gen::<f64>() - 0.5) * params.jitter,
                (rng.gen::<f64>() - 0.5) * params.jitter,
            ),
            Phase::Clustering => (neighborhood.cohesion - position) * params.strength,
            Phase::Collective => neighborhood.separation * params.strength,
        }
    }

    /// Trail colour the original sketch used for this phase.
    pub fn style(self) -> PhaseStyle {
        match self {
            Phase::Individual => PhaseStyle::new(220.0, 70.0, 60.0, 0.2),
            Phase::Clustering => PhaseStyle::new(280.0, 80.0, 65.0, 0.3),
            Phase::Collective => PhaseStyle::new(340.0, 90.0, 70.0, 0.4),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Individual => "individual",
            Phase::Clustering => "clustering",
            Phase::Collective => "collective",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Quorum and order-parameter thresholds for phase classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Minimum neighbour count to leave the Individual phase (default: 3).
    pub min_neighbors: usize,
    /// Alignment strictly above this is Collective (default: 0.8).
    pub alignment: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            min_neighbors: 3,
            alignment: 0.8,
        }
    }
}

/// Gains used by [`Phase::steer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    /// Gain on the cohesion and separation terms.
    pub strength: f64,
    /// Full width of the per-axis uniform jitter.
    pub jitter: f64,
}

/// HSLA colour hint for drawing an agent's trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseStyle {
    /// Hue in degrees.
    pub hue: f64,
    /// Saturation in percent.
    pub saturation: f64,
    /// Lightness in percent.
    pub lightness: f64,
    pub alpha: f64,
}

impl PhaseStyle {
    pub fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }
}

/// Tally of agents per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub individual: usize,
    pub clustering: usize,
    pub collective: usize,
}

impl PhaseCounts {
    pub fn record(&mut self, phase: Phase) {
        match phase {
            Phase::Individual => self.individual += 1,
            Phase::Clustering => self.clustering += 1,
            Phase::Collective => self.collective += 1,
        }
    }

    pub fn get(&self, phase: Phase) -> usize {
        match phase {
            Phase::Individual => self.individual,
            Phase::Clustering => self.clustering,
            Phase::Collective => self.collective,
        }
    }

    pub fn total(&self) -> usize {
        self.individual + self.clustering + self.collective
    }
}

impl FromIterator<Phase> for PhaseCounts {
    fn from_iter<I: IntoIterator<Item = Phase>>(iter: I) -> Self {
        let mut counts = PhaseCounts::default();
        for phase in iter {
            counts.record(phase);
        }
        counts
    }
}
