//! Agent: one member of the swarm.
//!
//! An agent senses its neighbourhood, classifies its own phase, steers,
//! feels the field, moves, and leaves chemical behind. The runtime calls
//! [`Agent::update`] once per tick with a freshly gathered neighbourhood.

use crate::field::ChemicalField;
use crate::neighborhood::{Kinematic, Neighborhood};
use crate::phase::Phase;
use crate::types::*;
use rand::RngCore;

/// A swarm member driven by the simulation loop.
pub trait Agent: Kinematic {
    /// The agent's unique identity.
    fn id(&self) -> AgentId;

    /// Phase decided at the most recent update.
    fn phase(&self) -> Phase;

    /// Emergence level derived from the current phase.
    fn emergence_level(&self) -> f64 {
        self.phase().emergence_level()
    }

    /// Recent positions, oldest first.
    fn trail(&self) -> Vec<Position>;

    /// Number of neighbours seen at the most recent update.
    fn neighbor_count(&self) -> usize;

    /// Execute one tick of the agent's behaviour.
    ///
    /// Classifies the phase from `neighborhood`, applies the phase
    /// steering and the field force, caps speed, moves, records the trail
    /// and deposits into `field`. Returns the phase the agent had before
    /// this update.
    fn update(
        &mut self,
        neighborhood: &Neighborhood,
        field: &mut dyn ChemicalField,
        rng: &mut dyn RngCore,
    ) -> Phase;

    /// How many updates this agent has gone through.
    fn age(&self) -> Tick;
}
