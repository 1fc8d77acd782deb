//! Simulation configuration.
//!
//! Every parameter that shapes a run lives here. Defaults reproduce the
//! reference model: an 800×600 world, 200 agents, a 20-unit field grid.
//! Drivers can also load the config from TOML; missing keys fall back to
//! the defaults.

use crate::diffusion::FieldConfig;
use serde::{Deserialize, Serialize};
use swarmfield_agents::params::FlockingParams;
use swarmfield_core::error::{Result, SwarmError};
use swarmfield_core::types::Bounds;

/// Which population state neighbour queries see during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborVisibility {
    /// Agents update in order against the live population, so later agents
    /// see the positions earlier agents moved to in the same tick.
    #[default]
    Live,
    /// Every agent sees the population as it stood at the start of the tick.
    Frozen,
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World width in world units (default: 800.0).
    pub width: f64,
    /// World height in world units (default: 600.0).
    pub height: f64,
    /// Number of agents, fixed for the whole run (default: 200).
    pub agent_count: usize,
    /// Seed for the random source. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Neighbour visibility within a tick (default: live).
    pub neighbor_visibility: NeighborVisibility,
    /// Diffusion grid settings.
    pub field: FieldConfig,
    /// Agent behaviour settings.
    pub flocking: FlockingParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            agent_count: 200,
            seed: None,
            neighbor_visibility: NeighborVisibility::Live,
            field: FieldConfig::default(),
            flocking: FlockingParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Config for a world of the given size with all other values default.
    pub fn new(width: f64, height: f64, agent_count: usize) -> Self {
        Self {
            width,
            height,
            agent_count,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.field.resolution = resolution;
        self
    }

    pub fn with_visibility(mut self, visibility: NeighborVisibility) -> Self {
        self.neighbor_visibility = visibility;
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value before any state is built.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(SwarmError::invalid_dimensions(self.width, self.height));
        }
        if self.agent_count == 0 {
            return Err(SwarmError::no_agents());
        }
        self.field.validate()?;
        self.flocking.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmfield_core::error::ConfigError;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.field.resolution, 20.0);
        assert_eq!(config.neighbor_visibility, NeighborVisibility::Live);
    }

    #[test]
    fn rejects_malformed_initialization() {
        assert_eq!(
            SimulationConfig::new(800.0, 600.0, 0).validate(),
            Err(SwarmError::Config(ConfigError::NoAgents))
        );
        assert!(matches!(
            SimulationConfig::new(-800.0, 600.0, 10).validate(),
            Err(SwarmError::Config(ConfigError::InvalidDimensions { .. }))
        ));
        assert!(matches!(
            SimulationConfig::new(800.0, f64::NAN, 10).validate(),
            Err(SwarmError::Config(ConfigError::InvalidDimensions { .. }))
        ));
        assert!(matches!(
            SimulationConfig::new(800.0, 600.0, 10).with_resolution(0.0).validate(),
            Err(SwarmError::Config(ConfigError::InvalidResolution(_)))
        ));
    }

    #[test]
    fn parses_partial_toml() {
        let config = SimulationConfig::from_toml_str(
            r#"
            width = 400.0
            height = 300.0
            agent_count = 50
            seed = 9
            neighbor_visibility = "frozen"

            [field]
            resolution = 10.0

            [flocking]
            max_speed = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(config.agent_count, 50);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.neighbor_visibility, NeighborVisibility::Frozen);
        assert_eq!(config.field.resolution, 10.0);
        assert_eq!(config.field.decay, 0.99);
        assert_eq!(config.flocking.max_speed, 3.0);
        assert_eq!(config.flocking.neighbor_radius, 50.0);
    }

    #[test]
    fn toml_errors_surface_as_config_errors() {
        let err = SimulationConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, SwarmError::Config(ConfigError::Parse(_))));

        let err = SimulationConfig::from_toml_str("agent_count = 0").unwrap_err();
        assert_eq!(err, SwarmError::no_agents());
    }
}
