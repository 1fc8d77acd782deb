//! Swarmfield Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use swarmfield_core::prelude::*;
//! ```

pub use crate::types::{AgentId, Bounds, Kinematics, Position, Tick, Vec2};

pub use crate::phase::{Phase, PhaseCounts, PhaseStyle, PhaseThresholds, SteeringParams};

pub use crate::neighborhood::{Kinematic, Neighborhood};

pub use crate::field::ChemicalField;

pub use crate::agent::Agent;

pub use crate::error::{ConfigError, Result, SwarmError};
