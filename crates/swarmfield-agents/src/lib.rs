//! # Swarmfield Agents
//!
//! Agent implementations for swarmfield simulations.
//!
//! - **Flocker**: phase-switching flocking agent coupled to a chemical field
//! - **FlockingParams**: the shared behavioural constants of a swarm

pub mod flocker;
pub mod params;
pub mod prelude;
