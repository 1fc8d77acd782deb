//! Swarmfield Agents Prelude: convenient imports for common usage.
//!
//! ```rust
//! use swarmfield_agents::prelude::*;
//! ```

pub use crate::flocker::Flocker;
pub use crate::params::FlockingParams;

// Re-export from core
pub use swarmfield_core::prelude::*;
