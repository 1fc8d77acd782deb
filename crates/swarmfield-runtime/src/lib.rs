//! # Swarmfield Runtime
//!
//! The diffusion field, the swarm and the fixed-step loop that couples them.
//!
//! The runtime is the "medium": it owns the chemical grid agents write
//! into, the population that reads from it, and the clock that advances
//! both.

pub mod config;
pub mod diffusion;
pub mod export;
pub mod metrics;
pub mod prelude;
pub mod simulation;
pub mod spatial;
pub mod swarm;
