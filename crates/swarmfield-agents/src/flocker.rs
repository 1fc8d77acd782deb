//! Flocker: the swarm's only agent type.
//!
//! A Flocker looks at the agents within its neighbour radius, decides
//! which phase it is in, and steers accordingly:
//!
//! - alone (below quorum) it jitters randomly;
//! - in a disordered group it heads for the group's centre;
//! - in an ordered group it keeps its spacing.
//!
//! On top of the steering it is pushed by the field gradient, and it
//! deposits chemical in proportion to its emergence level. Ordered groups
//! therefore mark the field most strongly, and the marks pull other agents
//! in over later ticks.

use crate::params::FlockingParams;
use rand::{Rng, RngCore};
use std::collections::VecDeque;
use swarmfield_core::agent::Agent;
use swarmfield_core::field::ChemicalField;
use swarmfield_core::neighborhood::{Kinematic, Neighborhood};
use swarmfield_core::phase::Phase;
use swarmfield_core::types::*;
use tracing::trace;

/// A flocking agent on a toroidal world.
#[derive(Debug, Clone)]
pub struct Flocker {
    id: AgentId,
    position: Position,
    velocity: Vec2,
    phase: Phase,
    age_ticks: Tick,

    /// Recent positions, oldest at the front.
    trail: VecDeque<Position>,
    /// Neighbour count at the last update.
    neighbor_count: usize,
    /// Alignment magnitude at the last update.
    alignment: f64,

    bounds: Bounds,
    params: FlockingParams,
}

impl Flocker {
    pub fn new(position: Position, velocity: Vec2, bounds: Bounds, params: FlockingParams) -> Self {
        Self::with_id(AgentId::new(), position, velocity, bounds, params)
    }

    /// Create a flocker with a deterministic ID (for testing).
    pub fn with_seed(position: Position, velocity: Vec2, bounds: Bounds, seed: u64) -> Self {
        Self::with_id(
            AgentId::from_seed(seed),
            position,
            velocity,
            bounds,
            FlockingParams::default(),
        )
    }

    /// Place a flocker uniformly at random with each velocity component
    /// uniform in `[-1, 1)`.
    pub fn random(bounds: Bounds, params: FlockingParams, rng: &mut dyn RngCore) -> Self {
        let id = AgentId::from_rng(rng);
        let position = Vec2::new(
            rng.gen::<f64>() * bounds.width,
            rng.gen::<f64>() * bounds.height,
        );
        let velocity = Vec2::new(
            (rng.gen::<f64>() - 0.5) * 2.0,
            (rng.gen::<f64>() - 0.5) * 2.0,
        );
        // gen() is in [0, 1), but the product can still round up to the extent
        Self::with_id(id, bounds.wrap(position), velocity, bounds, params)
    }

    fn with_id(
        id: AgentId,
        position: Position,
        velocity: Vec2,
        bounds: Bounds,
        params: FlockingParams,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            phase: Phase::Individual,
            age_ticks: 0,
            trail: VecDeque::with_capacity(params.history_length + 1),
            neighbor_count: 0,
            alignment: 0.0,
            bounds,
            params,
        }
    }

    /// Replace the behavioural parameters.
    pub fn with_params(mut self, params: FlockingParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &FlockingParams {
        &self.params
    }

    pub fn set_params(&mut self, params: FlockingParams) {
        self.params = params;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Move the agent onto another torus. The position is wrapped into it.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.position = bounds.wrap(self.position);
    }

    /// Alignment magnitude seen at the last update.
    pub fn alignment(&self) -> f64 {
        self.alignment
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Set velocity directly (for testing and driver interaction).
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Move the agent directly. The position is wrapped onto the torus.
    pub fn set_position(&mut self, position: Position) {
        self.position = self.bounds.wrap(position);
    }
}

impl Kinematic for Flocker {
    fn position(&self) -> Position {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl Agent for Flocker {
    fn id(&self) -> AgentId {
        self.id
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn trail(&self) -> Vec<Position> {
        self.trail.iter().copied().collect()
    }

    fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }

    fn update(
        &mut self,
        neighborhood: &Neighborhood,
        field: &mut dyn ChemicalField,
        rng: &mut dyn RngCore,
    ) -> Phase {
        let previous = self.phase;
        self.age_ticks += 1;

        self.neighbor_count = neighborhood.count();
        self.alignment = neighborhood.alignment;
        self.phase = Phase::classify(self.neighbor_count, self.alignment, &self.params.thresholds);

        let steering = self.params.steering();
        self.velocity += self.phase.steer(self.position, neighborhood, &steering, rng);
        self.velocity += field.sample_force(self.position) * self.params.field_coupling;
        self.velocity = self.velocity.clamp_length(self.params.max_speed);

        self.position = self.bounds.wrap(self.position + self.velocity);

        self.trail.push_back(self.position);
        while self.trail.len() > self.params.history_length {
            self.trail.pop_front();
        }

        let amount = self.params.deposit_rate * self.phase.emergence_level();
        if amount > 0.0 {
            field.deposit(self.position, amount);
        }

        if previous != self.phase {
            trace!(agent = %self.id, from = %previous, to = %self.phase, "phase shift");
        }
        previous
    }

    fn age(&self) -> Tick {
        self.age_ticks
    }
}
