//! # Swarmfield Core
//!
//! Core traits and types for coupled swarm / diffusion-field simulations.
//!
//! - [`types`]: vectors, bounds, agent identity
//! - [`phase`]: the Individual / Clustering / Collective state machine
//! - [`neighborhood`]: flocking statistics (alignment, cohesion, separation)
//! - [`field`]: the [`ChemicalField`](field::ChemicalField) seam agents write through
//! - [`agent`]: the [`Agent`](agent::Agent) trait driven by the runtime
//! - [`error`]: construction-time errors
//!
//! ## Quick Start
//!
//! ```rust
//! use swarmfield_core::prelude::*;
//!
//! let thresholds = PhaseThresholds::default();
//! assert_eq!(Phase::classify(5, 0.9, &thresholds), Phase::Collective);
//!
//! let bounds = Bounds::new(800.0, 600.0);
//! assert_eq!(bounds.wrap(Position::new(801.0, -1.0)), Position::new(1.0, 599.0));
//! ```

pub mod types;
pub mod phase;
pub mod neighborhood;
pub mod field;
pub mod agent;
pub mod error;
pub mod prelude;
