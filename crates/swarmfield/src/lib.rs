//! # Swarmfield
//!
//! Flocking agents and a shared diffusion field, coupled in one loop.
//!
//! Agents sense their neighbours, fall into one of three behavioural phases
//! and steer accordingly. Agents that have begun to organise leave chemical
//! in a toroidal grid; the grid spreads and fades it, and its gradient
//! pulls every agent back toward where organisation happened. Collective
//! order emerges from that feedback.
//!
//! ## Quick Start
//!
//! ```rust
//! use swarmfield::prelude::*;
//!
//! // An 800×600 world with 200 agents, reproducible from a seed
//! let config = SimulationConfig::default().with_seed(7);
//! let mut sim = Simulation::new(config).unwrap();
//!
//! // Run the simulation
//! sim.run(50);
//!
//! let stats = sim.stats();
//! println!(
//!     "tick {}: {} collective, field mass {:.2}",
//!     stats.tick, stats.phases.collective, stats.field_mass
//! );
//!
//! // Frame for a renderer
//! let frame = snapshot_to_json(&sim.snapshot()).unwrap();
//! assert!(frame.contains("\"agents\""));
//! ```
//!
//! ## Architecture
//!
//! - [`swarmfield_core`] - Shared types, the phase model and the agent/field traits
//! - [`swarmfield_agents`] - The flocking agent and its parameters
//! - [`swarmfield_runtime`] - Diffusion field, swarm scheduling, metrics, export
//!
//! ## Key Concepts
//!
//! ### Phases
//!
//! | Phase | Condition | Steering | Emergence |
//! |-------|-----------|----------|-----------|
//! | Individual | fewer than 3 neighbours | random jitter | 0.0 |
//! | Clustering | 3+ neighbours, weak alignment | toward neighbours' centre | 0.5 |
//! | Collective | 3+ neighbours, alignment > 0.8 | away from crowding | 1.0 |
//!
//! ### Field
//!
//! - Agents deposit `0.1 × emergence` per tick at their cell
//! - Each step averages every cell over its 3×3 toroidal block, times 0.99
//! - Force is the central difference of the grid before the step, times 0.1
//! - Deposits become force one tick later
//!
//! ## Configuration
//!
//! ```rust
//! use swarmfield::prelude::*;
//!
//! let config = SimulationConfig::from_toml_str(r#"
//!     width = 400.0
//!     height = 300.0
//!     agent_count = 80
//!     seed = 3
//!     neighbor_visibility = "frozen"
//! "#).unwrap();
//!
//! let mut sim = Simulation::new(config).unwrap();
//! sim.tick();
//! let metrics = swarmfield::runtime::metrics::compute(&sim);
//! assert!(metrics.order_parameter <= 1.0 + 1e-9);
//! ```

// Re-export all subcrates
pub use swarmfield_agents as agents;
pub use swarmfield_core as core;
pub use swarmfield_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use swarmfield::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use swarmfield_core::types::{AgentId, Bounds, Kinematics, Position, Tick, Vec2};
    pub use swarmfield_core::phase::{Phase, PhaseCounts, PhaseStyle, PhaseThresholds};
    pub use swarmfield_core::neighborhood::{Kinematic, Neighborhood};

    // Core traits
    pub use swarmfield_core::agent::Agent;
    pub use swarmfield_core::field::ChemicalField;

    // Error types
    pub use swarmfield_core::error::{ConfigError, Result, SwarmError};

    // Agents
    pub use swarmfield_agents::flocker::Flocker;
    pub use swarmfield_agents::params::FlockingParams;

    // Runtime
    pub use swarmfield_runtime::config::{NeighborVisibility, SimulationConfig};
    pub use swarmfield_runtime::diffusion::{CellSnapshot, DiffusionField, FieldConfig};
    pub use swarmfield_runtime::simulation::{
        AgentSnapshot, Simulation, SimulationEvent, SimulationSnapshot, SimulationStats,
    };
    pub use swarmfield_runtime::swarm::{PhaseShift, Swarm};
    pub use swarmfield_runtime::metrics::{FlockMetrics, SwarmMetrics};
    pub use swarmfield_runtime::export::{snapshot_to_json, write_snapshot};
}
