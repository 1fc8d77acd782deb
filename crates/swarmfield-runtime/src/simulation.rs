//! Simulation: the fixed-step loop coupling swarm and field.
//!
//! Each tick:
//! 1. The field diffuses, decays and derives its force from the grid as it
//!    stood after the previous tick (including last tick's deposits).
//! 2. Every agent, in swarm order, senses its neighbours, feels the fresh
//!    force, moves and deposits. These deposits wait for the next tick's
//!    field step.
//! 3. The tick counter advances and a snapshot can be taken for rendering.

use crate::config::SimulationConfig;
use crate::diffusion::{CellSnapshot, DiffusionField};
use crate::swarm::{PhaseShift, Swarm};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use swarmfield_agents::flocker::Flocker;
use swarmfield_core::agent::Agent;
use swarmfield_core::error::{Result, SwarmError};
use swarmfield_core::neighborhood::Kinematic;
use swarmfield_core::phase::{Phase, PhaseCounts, PhaseStyle};
use swarmfield_core::types::*;
use tracing::{debug, info};

/// Event emitted by the simulation during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    /// An agent changed phase.
    PhaseShift { id: AgentId, from: Phase, to: Phase },
    /// A tick completed.
    TickComplete {
        tick: Tick,
        counts: PhaseCounts,
        field_mass: f64,
    },
}

impl From<PhaseShift> for SimulationEvent {
    fn from(shift: PhaseShift) -> Self {
        SimulationEvent::PhaseShift {
            id: shift.id,
            from: shift.from,
            to: shift.to,
        }
    }
}

/// Statistics about the simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    pub tick: Tick,
    pub agents: usize,
    pub phases: PhaseCounts,
    /// Total chemical in the field.
    pub field_mass: f64,
    /// Highest single-cell concentration.
    pub peak_chemical: f64,
    pub mean_speed: f64,
}

/// A serializable snapshot of an agent's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Position,
    pub velocity: Vec2,
    pub phase: Phase,
    pub emergence_level: f64,
    pub neighbor_count: usize,
    /// Recent positions, oldest first.
    pub trail: Vec<Position>,
    /// Colour hint for the trail.
    pub style: PhaseStyle,
    /// Stroke width hint for the trail, `1 + emergence_level`.
    pub trail_width: f64,
}

impl AgentSnapshot {
    fn of(agent: &Flocker) -> Self {
        let phase = agent.phase();
        Self {
            id: agent.id(),
            position: agent.position(),
            velocity: agent.velocity(),
            phase,
            emergence_level: agent.emergence_level(),
            neighbor_count: agent.neighbor_count(),
            trail: agent.trail(),
            style: phase.style(),
            trail_width: 1.0 + agent.emergence_level(),
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub tick: Tick,
    pub bounds: Bounds,
    pub agents: Vec<AgentSnapshot>,
    /// Field cells above the visibility threshold.
    pub cells: Vec<CellSnapshot>,
    pub stats: SimulationStats,
}

/// The coupled swarm / field simulation.
pub struct Simulation {
    config: SimulationConfig,
    field: DiffusionField,
    swarm: Swarm,
    rng: StdRng,
    tick: Tick,
}

impl Simulation {
    /// Build a simulation: a zeroed field and a randomly placed population.
    ///
    /// Fails on malformed configuration before anything is allocated.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let field = DiffusionField::new(config.width, config.height, config.field)?;
        let swarm = Swarm::spawn(&config, &mut rng)?;

        info!(
            width = config.width,
            height = config.height,
            agents = config.agent_count,
            cols = field.cols(),
            rows = field.rows(),
            visibility = ?config.neighbor_visibility,
            "simulation initialized"
        );

        Ok(Self {
            config,
            field,
            swarm,
            rng,
            tick: 0,
        })
    }

    /// Build a simulation around an existing population, with an explicit
    /// random source for the agents' jitter.
    ///
    /// The swarm must have been built for this config: same world, same
    /// population size, same visibility and flocking params.
    pub fn from_parts(config: SimulationConfig, swarm: Swarm, rng: StdRng) -> Result<Self> {
        config.validate()?;
        if swarm.bounds() != config.bounds() {
            let b = swarm.bounds();
            return Err(SwarmError::invalid_config(
                "swarm.bounds",
                format!("{}x{}", b.width, b.height),
                format!("config world is {}x{}", config.width, config.height),
            ));
        }
        if swarm.len() != config.agent_count {
            return Err(SwarmError::invalid_config(
                "swarm.len",
                swarm.len(),
                format!("config agent_count is {}", config.agent_count),
            ));
        }
        if swarm.visibility() != config.neighbor_visibility {
            return Err(SwarmError::invalid_config(
                "swarm.visibility",
                format!("{:?}", swarm.visibility()),
                format!("config neighbor_visibility is {:?}", config.neighbor_visibility),
            ));
        }
        if swarm.agents().iter().any(|a| a.params() != &config.flocking) {
            return Err(SwarmError::invalid_config(
                "swarm.params",
                format!("radius {}", swarm.radius()),
                "agents were built with different flocking params than the config",
            ));
        }
        let field = DiffusionField::new(config.width, config.height, config.field)?;
        Ok(Self {
            config,
            field,
            swarm,
            rng,
            tick: 0,
        })
    }

    /// Run a single simulation tick.
    pub fn tick(&mut self) -> Vec<SimulationEvent> {
        self.field.step();

        let shifts = self.swarm.update(&mut self.field, &mut self.rng);
        self.tick += 1;

        let mut events: Vec<SimulationEvent> = shifts.into_iter().map(SimulationEvent::from).collect();
        let counts = self.swarm.phase_counts();
        let field_mass = self.field.total_chemical();

        debug!(
            tick = self.tick,
            individual = counts.individual,
            clustering = counts.clustering,
            collective = counts.collective,
            field_mass,
            shifts = events.len(),
            "tick complete"
        );

        events.push(SimulationEvent::TickComplete {
            tick: self.tick,
            counts,
            field_mass,
        });
        events
    }

    /// Run the simulation for N ticks.
    pub fn run(&mut self, ticks: u64) -> Vec<Vec<SimulationEvent>> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Start over: a zeroed field and a freshly placed population, drawn
    /// from the continuing random stream.
    pub fn reset(&mut self) -> Result<()> {
        self.swarm = Swarm::spawn(&self.config, &mut self.rng)?;
        self.field.clear();
        self.tick = 0;
        info!(agents = self.swarm.len(), "simulation reset");
        Ok(())
    }

    /// Get simulation statistics.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            tick: self.tick,
            agents: self.swarm.len(),
            phases: self.swarm.phase_counts(),
            field_mass: self.field.total_chemical(),
            peak_chemical: self.field.peak_chemical(),
            mean_speed: self.swarm.mean_speed(),
        }
    }

    /// Take a serializable snapshot of the current state.
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.tick,
            bounds: self.config.bounds(),
            agents: self.swarm.agents().iter().map(AgentSnapshot::of).collect(),
            cells: self.field.visible_cells(),
            stats: self.stats(),
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn field(&self) -> &DiffusionField {
        &self.field
    }

    /// Mutable field access, e.g. for a driver injecting chemical.
    pub fn field_mut(&mut self) -> &mut DiffusionField {
        &mut self.field
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn swarm_mut(&mut self) -> &mut Swarm {
        &mut self.swarm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NeighborVisibility;
    use swarmfield_agents::params::FlockingParams;
    use swarmfield_core::field::ChemicalField;

    fn small(seed: u64) -> SimulationConfig {
        SimulationConfig::new(200.0, 160.0, 30).with_seed(seed)
    }

    #[test]
    fn tick_advances_simulation() {
        let mut sim = Simulation::new(small(1)).unwrap();
        let events = sim.tick();
        assert_eq!(sim.current_tick(), 1);
        assert_eq!(sim.field().steps(), 1);
        assert!(matches!(events.last(), Some(SimulationEvent::TickComplete { tick: 1, .. })));
    }

    #[test]
    fn construction_fails_fast() {
        assert!(Simulation::new(SimulationConfig::new(200.0, 160.0, 0)).is_err());
        assert!(Simulation::new(SimulationConfig::new(0.0, 160.0, 3)).is_err());
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = Simulation::new(small(99)).unwrap();
        let mut b = Simulation::new(small(99)).unwrap();
        a.run(25);
        b.run(25);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn deposits_reach_force_one_tick_later() {
        let mut sim = Simulation::new(small(3)).unwrap();
        sim.field_mut().deposit(Position::new(100.0, 80.0), 5.0);
        // Deposited chemical is present but has not produced force yet.
        assert_eq!(sim.field().chemical_at(5, 4), Some(5.0));
        assert_eq!(sim.field().sample_force(Position::new(120.0, 80.0)), Vec2::ZERO);

        sim.field_mut().step();
        assert!(sim.field().sample_force(Position::new(120.0, 80.0)).x < 0.0);
    }

    #[test]
    fn from_parts_rejects_a_swarm_built_for_another_config() {
        let config = SimulationConfig::new(200.0, 200.0, 2).with_seed(0);
        let rng = || StdRng::seed_from_u64(0);
        let build = |bounds: Bounds, n: usize, params: &FlockingParams, visibility| {
            let agents = (0..n as u64)
                .map(|i| Flocker::with_seed(Position::new(10.0 + i as f64, 10.0), Vec2::ZERO, bounds, i))
                .collect();
            Swarm::new(agents, bounds, params, visibility).unwrap()
        };
        let flocking = config.flocking;
        let live = NeighborVisibility::Live;

        let other_world = build(Bounds::new(1000.0, 1000.0), 2, &flocking, live);
        assert!(Simulation::from_parts(config.clone(), other_world, rng()).is_err());

        let too_many = build(config.bounds(), 5, &flocking, live);
        assert!(Simulation::from_parts(config.clone(), too_many, rng()).is_err());

        let frozen = build(config.bounds(), 2, &flocking, NeighborVisibility::Frozen);
        assert!(Simulation::from_parts(config.clone(), frozen, rng()).is_err());

        let tuned = FlockingParams {
            max_speed: 4.0,
            ..flocking
        };
        let other_params = build(config.bounds(), 2, &tuned, live);
        assert!(Simulation::from_parts(config.clone(), other_params, rng()).is_err());

        let matching = build(config.bounds(), 2, &flocking, live);
        let sim = Simulation::from_parts(config, matching, rng()).unwrap();
        assert_eq!(sim.snapshot().agents.len(), 2);
    }

    #[test]
    fn snapshot_reports_phase_styles_and_trails() {
        let mut sim = Simulation::new(small(4)).unwrap();
        sim.run(3);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.agents.len(), 30);
        for agent in &snapshot.agents {
            assert_eq!(agent.trail.len(), 3);
            assert_eq!(agent.style, agent.phase.style());
            assert_eq!(agent.trail_width, 1.0 + agent.phase.emergence_level());
        }
        assert_eq!(snapshot.stats.phases.total(), 30);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut sim = Simulation::new(small(5).with_visibility(NeighborVisibility::Frozen)).unwrap();
        sim.run(10);
        sim.reset().unwrap();
        assert_eq!(sim.current_tick(), 0);
        assert_eq!(sim.field().total_chemical(), 0.0);
        assert_eq!(sim.swarm().len(), 30);
    }
}
