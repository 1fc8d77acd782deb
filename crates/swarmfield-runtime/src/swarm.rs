//! Swarm: the agent population and its neighbour index.
//!
//! The swarm owns every agent in a fixed, stable order. Each tick it walks
//! that order, gathers the agent's neighbourhood and lets the agent update
//! against the shared field. The field itself is owned by the simulation
//! and lent to the swarm for the duration of the update.

use crate::config::{NeighborVisibility, SimulationConfig};
use crate::spatial::SpatialGrid;
use rand::RngCore;
use serde::Serialize;
use swarmfield_agents::flocker::Flocker;
use swarmfield_agents::params::FlockingParams;
use swarmfield_core::agent::Agent;
use swarmfield_core::error::{Result, SwarmError};
use swarmfield_core::field::ChemicalField;
use swarmfield_core::neighborhood::{Kinematic, Neighborhood};
use swarmfield_core::phase::{Phase, PhaseCounts};
use swarmfield_core::types::*;

/// An agent changed phase during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseShift {
    pub id: AgentId,
    /// Position of the agent in swarm order.
    pub index: usize,
    pub from: Phase,
    pub to: Phase,
}

/// The agent population.
#[derive(Debug, Clone)]
pub struct Swarm {
    agents: Vec<Flocker>,
    index: SpatialGrid,
    /// Set when agents may have moved outside an update.
    index_stale: bool,
    radius: f64,
    visibility: NeighborVisibility,
    bounds: Bounds,
}

impl Swarm {
    /// Wrap an existing population.
    ///
    /// Every agent takes on the swarm's `bounds` and `params`. Fails on an
    /// empty population or on an agent placed outside `bounds`.
    pub fn new(
        mut agents: Vec<Flocker>,
        bounds: Bounds,
        params: &FlockingParams,
        visibility: NeighborVisibility,
    ) -> Result<Self> {
        if agents.is_empty() {
            return Err(SwarmError::no_agents());
        }
        params.validate()?;
        for agent in &mut agents {
            let p = agent.position();
            if !bounds.contains(&p) {
                return Err(SwarmError::invalid_config(
                    "agent.position",
                    format!("({}, {})", p.x, p.y),
                    format!("outside the {}x{} world", bounds.width, bounds.height),
                ));
            }
            agent.set_bounds(bounds);
            agent.set_params(*params);
        }

        let mut index = SpatialGrid::new(bounds, params.neighbor_radius)?;
        index.rebuild(agents.iter().map(|a| a.position()));
        Ok(Self {
            agents,
            index,
            index_stale: false,
            radius: params.neighbor_radius,
            visibility,
            bounds,
        })
    }

    /// Place `config.agent_count` agents uniformly at random.
    pub fn spawn(config: &SimulationConfig, rng: &mut dyn RngCore) -> Result<Self> {
        config.validate()?;
        let bounds = config.bounds();
        let agents = (0..config.agent_count)
            .map(|_| Flocker::random(bounds, config.flocking, rng))
            .collect();
        Self::new(agents, bounds, &config.flocking, config.neighbor_visibility)
    }

    /// Update every agent once, in swarm order.
    ///
    /// Returns the phase shifts that happened during the update.
    pub fn update(&mut self, field: &mut dyn ChemicalField, rng: &mut dyn RngCore) -> Vec<PhaseShift> {
        let shifts = match self.visibility {
            NeighborVisibility::Live => self.update_live(field, rng),
            NeighborVisibility::Frozen => self.update_frozen(field, rng),
        };
        self.index_stale = false;
        shifts
    }

    fn update_live(&mut self, field: &mut dyn ChemicalField, rng: &mut dyn RngCore) -> Vec<PhaseShift> {
        let mut shifts = Vec::new();
        self.index.rebuild(self.agents.iter().map(|a| a.position()));

        for i in 0..self.agents.len() {
            let from = self.agents[i].position();
            let candidates = self.index.candidates(from, self.radius);
            let hood = Neighborhood::from_candidates(i, &self.agents, candidates, self.radius);

            let previous = self.agents[i].update(&hood, field, rng);

            // Later agents in this tick see where this one went.
            self.index.relocate(i, from, self.agents[i].position());
            self.record_shift(i, previous, &mut shifts);
        }
        shifts
    }

    fn update_frozen(&mut self, field: &mut dyn ChemicalField, rng: &mut dyn RngCore) -> Vec<PhaseShift> {
        let mut shifts = Vec::new();
        let frozen: Vec<Kinematics> = self.agents.iter().map(|a| a.kinematics()).collect();
        self.index.rebuild(frozen.iter().map(|k| k.position));

        for i in 0..self.agents.len() {
            let candidates = self.index.candidates(frozen[i].position, self.radius);
            let hood = Neighborhood::from_candidates(i, &frozen, candidates, self.radius);
            let previous = self.agents[i].update(&hood, field, rng);
            self.record_shift(i, previous, &mut shifts);
        }

        self.index.rebuild(self.agents.iter().map(|a| a.position()));
        shifts
    }

    fn record_shift(&self, index: usize, previous: Phase, shifts: &mut Vec<PhaseShift>) {
        let agent = &self.agents[index];
        if agent.phase() != previous {
            shifts.push(PhaseShift {
                id: agent.id(),
                index,
                from: previous,
                to: agent.phase(),
            });
        }
    }

    /// Neighbourhood of one agent against the current positions.
    ///
    /// Falls back to a full scan while agents moved through
    /// [`agents_mut`](Self::agents_mut) are not yet re-indexed.
    pub fn neighborhood(&self, index: usize) -> Neighborhood {
        if self.index_stale {
            return Neighborhood::gather(index, &self.agents, self.radius);
        }
        let candidates = self.index.candidates(self.agents[index].position(), self.radius);
        Neighborhood::from_candidates(index, &self.agents, candidates, self.radius)
    }

    /// Re-bucket every agent at its current position.
    pub fn reindex(&mut self) {
        self.index.rebuild(self.agents.iter().map(|a| a.position()));
        self.index_stale = false;
    }

    pub fn agents(&self) -> &[Flocker] {
        &self.agents
    }

    /// Mutable access to the population (for drivers and tests). The
    /// neighbour index is refreshed by the next update or [`reindex`](Self::reindex).
    pub fn agents_mut(&mut self) -> &mut [Flocker] {
        self.index_stale = true;
        &mut self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn visibility(&self) -> NeighborVisibility {
        self.visibility
    }

    pub fn phase_counts(&self) -> PhaseCounts {
        self.agents.iter().map(|a| a.phase()).collect()
    }

    pub fn mean_speed(&self) -> f64 {
        let total: f64 = self.agents.iter().map(|a| a.speed()).sum();
        total / self.agents.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diffusion::{DiffusionField, FieldConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(n: usize) -> SimulationConfig {
        SimulationConfig::new(300.0, 200.0, n).with_seed(5)
    }

    #[test]
    fn spawn_places_requested_population() {
        let mut rng = StdRng::seed_from_u64(5);
        let swarm = Swarm::spawn(&config(40), &mut rng).unwrap();
        assert_eq!(swarm.len(), 40);
        assert!(swarm.agents().iter().all(|a| swarm.bounds().contains(&a.position())));
    }

    #[test]
    fn empty_population_is_rejected() {
        let result = Swarm::new(
            Vec::new(),
            Bounds::new(10.0, 10.0),
            &FlockingParams::default(),
            NeighborVisibility::Live,
        );
        assert!(result.is_err());
    }

    #[test]
    fn agents_take_on_swarm_params_and_bounds() {
        let bounds = Bounds::new(300.0, 200.0);
        let params = FlockingParams {
            neighbor_radius: 30.0,
            max_speed: 3.5,
            ..FlockingParams::default()
        };
        let agents = vec![
            Flocker::with_seed(Position::new(10.0, 10.0), Vec2::ZERO, Bounds::new(1000.0, 1000.0), 0),
            Flocker::with_seed(Position::new(20.0, 10.0), Vec2::ZERO, bounds, 1),
        ];
        let swarm = Swarm::new(agents, bounds, &params, NeighborVisibility::Live).unwrap();
        for agent in swarm.agents() {
            assert_eq!(agent.params(), &params);
            assert_eq!(agent.bounds(), bounds);
        }
        assert_eq!(swarm.radius(), 30.0);
    }

    #[test]
    fn agents_outside_the_world_are_rejected() {
        let bounds = Bounds::new(300.0, 200.0);
        let agents = vec![Flocker::with_seed(
            Position::new(800.0, 10.0),
            Vec2::ZERO,
            Bounds::new(1000.0, 1000.0),
            0,
        )];
        let result = Swarm::new(agents, bounds, &FlockingParams::default(), NeighborVisibility::Live);
        assert!(matches!(
            result,
            Err(SwarmError::Config(swarmfield_core::error::ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn neighbourhood_sees_agents_moved_between_ticks() {
        let bounds = Bounds::new(400.0, 400.0);
        let agents = vec![
            Flocker::with_seed(Position::new(10.0, 10.0), Vec2::ZERO, bounds, 0),
            Flocker::with_seed(Position::new(300.0, 300.0), Vec2::ZERO, bounds, 1),
        ];
        let mut swarm =
            Swarm::new(agents, bounds, &FlockingParams::default(), NeighborVisibility::Live).unwrap();
        assert_eq!(swarm.neighborhood(0).count(), 0);

        swarm.agents_mut()[1].set_position(Position::new(20.0, 10.0));
        assert_eq!(swarm.neighborhood(0).neighbors, vec![1]);
        assert_eq!(swarm.neighborhood(0), Neighborhood::gather(0, swarm.agents(), swarm.radius()));

        swarm.reindex();
        assert_eq!(swarm.neighborhood(0).neighbors, vec![1]);
    }

    #[test]
    fn indexed_neighbourhood_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut swarm = Swarm::spawn(&config(120), &mut rng).unwrap();
        let mut field = DiffusionField::new(300.0, 200.0, FieldConfig::default()).unwrap();
        for _ in 0..5 {
            field.step();
            swarm.update(&mut field, &mut rng);
        }
        for i in 0..swarm.len() {
            let indexed = swarm.neighborhood(i);
            let brute = Neighborhood::gather(i, swarm.agents(), swarm.radius());
            assert_eq!(indexed, brute, "agent {}", i);
        }
    }

    #[test]
    fn live_update_lets_later_agents_see_moved_neighbours() {
        let bounds = Bounds::new(400.0, 400.0);
        let params = FlockingParams::default();
        // Agent 0 starts out of range of agent 1 and moves into it.
        let agents = vec![
            Flocker::with_seed(Position::new(149.5, 100.0), Vec2::new(2.0, 0.0), bounds, 0),
            Flocker::with_seed(Position::new(201.0, 100.0), Vec2::ZERO, bounds, 1),
        ];
        let mut field = DiffusionField::new(400.0, 400.0, FieldConfig::default()).unwrap();

        let mut live = Swarm::new(agents.clone(), bounds, &params, NeighborVisibility::Live).unwrap();
        let mut frozen = Swarm::new(agents, bounds, &params, NeighborVisibility::Frozen).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        live.update(&mut field, &mut rng);
        let mut rng = StdRng::seed_from_u64(0);
        frozen.update(&mut field, &mut rng);

        assert_eq!(live.agents()[1].neighbor_count(), 1);
        assert_eq!(frozen.agents()[1].neighbor_count(), 0);
    }

    #[test]
    fn phase_shifts_are_reported() {
        let bounds = Bounds::new(400.0, 400.0);
        let params = FlockingParams::default();
        let agents: Vec<Flocker> = (0..5)
            .map(|i| {
                Flocker::with_seed(
                    Position::new(200.0 + 4.0 * i as f64, 200.0),
                    Vec2::new(1.0, 0.0),
                    bounds,
                    i,
                )
            })
            .collect();
        let mut swarm = Swarm::new(agents, bounds, &params, NeighborVisibility::Live).unwrap();
        let mut field = DiffusionField::new(400.0, 400.0, FieldConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let shifts = swarm.update(&mut field, &mut rng);

        assert_eq!(shifts.len(), 5);
        assert!(shifts.iter().all(|s| s.from == Phase::Individual && s.to == Phase::Collective));
        assert_eq!(swarm.phase_counts().collective, 5);
    }
}
