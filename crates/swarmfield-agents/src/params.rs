//! Flocking parameters: the behavioural constants of a swarm agent.
//!
//! Defaults are the values of the reference model. Every agent in a swarm
//! shares one parameter set.

use serde::{Deserialize, Serialize};
use swarmfield_core::error::{ensure_positive, Result, SwarmError};
use swarmfield_core::phase::{PhaseThresholds, SteeringParams};

/// Tunable constants for [`Flocker`](crate::flocker::Flocker) agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingParams {
    /// Neighbours strictly closer than this count (default: 50.0).
    pub neighbor_radius: f64,
    /// Speed cap applied after all forces (default: 2.0).
    pub max_speed: f64,
    /// Gain on cohesion / separation steering (default: 0.1).
    pub steer_strength: f64,
    /// Full width of the Individual-phase velocity jitter (default: 0.2).
    pub jitter: f64,
    /// Gain on the sampled field force (default: 0.1).
    pub field_coupling: f64,
    /// Chemical deposited per step per unit of emergence (default: 0.1).
    pub deposit_rate: f64,
    /// Positions kept in the trail (default: 20).
    pub history_length: usize,
    /// Phase classification thresholds.
    pub thresholds: PhaseThresholds,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            neighbor_radius: 50.0,
            max_speed: 2.0,
            steer_strength: 0.1,
            jitter: 0.2,
            field_coupling: 0.1,
            deposit_rate: 0.1,
            history_length: 20,
            thresholds: PhaseThresholds::default(),
        }
    }
}

impl FlockingParams {
    pub fn steering(&self) -> SteeringParams {
        SteeringParams {
            strength: self.steer_strength,
            jitter: self.jitter,
        }
    }

    /// Reject parameter sets that would produce a degenerate swarm.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("flocking.neighbor_radius", self.neighbor_radius)?;
        ensure_positive("flocking.max_speed", self.max_speed)?;
        for (field, value) in [
            ("flocking.steer_strength", self.steer_strength),
            ("flocking.jitter", self.jitter),
            ("flocking.field_coupling", self.field_coupling),
            ("flocking.deposit_rate", self.deposit_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SwarmError::invalid_config(field, value, "must be non-negative and finite"));
            }
        }
        if self.history_length == 0 {
            return Err(SwarmError::invalid_config(
                "flocking.history_length",
                self.history_length,
                "must keep at least one position",
            ));
        }
        if !self.thresholds.alignment.is_finite() {
            return Err(SwarmError::invalid_config(
                "flocking.thresholds.alignment",
                self.thresholds.alignment,
                "must be finite",
            ));
        }
        Ok(())
    }
}
