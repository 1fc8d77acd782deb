//! Swarmfield Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use swarmfield_runtime::prelude::*;
//! ```

// Re-export simulation
pub use crate::simulation::{
    AgentSnapshot, Simulation, SimulationEvent, SimulationSnapshot, SimulationStats,
};

// Re-export configuration
pub use crate::config::{NeighborVisibility, SimulationConfig};

// Re-export field and swarm
pub use crate::diffusion::{CellSnapshot, DiffusionField, FieldConfig};
pub use crate::spatial::SpatialGrid;
pub use crate::swarm::{PhaseShift, Swarm};

// Re-export metrics and export
pub use crate::export::{snapshot_to_json, write_snapshot};
pub use crate::metrics::{FlockMetrics, SwarmMetrics};

// Re-export from agents
pub use swarmfield_agents::prelude::*;
