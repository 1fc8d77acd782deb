//! Error types for swarmfield operations.
//!
//! The numeric core never fails at runtime: out-of-range coordinates
//! degrade to no-ops. Errors only arise while building a simulation
//! from configuration.

use thiserror::Error;

/// Result type for swarmfield operations.
pub type Result<T> = std::result::Result<T, SwarmError>;

/// Errors that can occur while constructing or configuring a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwarmError {
    /// Configuration rejected before any state was built.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Serialization of a snapshot or config failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// World extent is zero, negative or not finite.
    #[error("invalid world dimensions {width}x{height} (both must be positive and finite)")]
    InvalidDimensions { width: f64, height: f64 },
    /// Field cell size is zero, negative or not finite.
    #[error("invalid field resolution {0} (must be positive and finite)")]
    InvalidResolution(f64),
    /// A swarm needs at least one agent.
    #[error("agent count must be at least 1")]
    NoAgents,
    /// Any other out-of-range tuning value.
    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Config text could not be parsed.
    #[error("could not parse config: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SwarmError {
    fn from(e: serde_json::Error) -> Self {
        SwarmError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SwarmError {
    fn from(e: toml::de::Error) -> Self {
        SwarmError::Config(ConfigError::Parse(e.to_string()))
    }
}

// Convenience constructors
impl SwarmError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SwarmError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        })
    }

    pub fn invalid_dimensions(width: f64, height: f64) -> Self {
        SwarmError::Config(ConfigError::InvalidDimensions { width, height })
    }

    pub fn invalid_resolution(resolution: f64) -> Self {
        SwarmError::Config(ConfigError::InvalidResolution(resolution))
    }

    pub fn no_agents() -> Self {
        SwarmError::Config(ConfigError::NoAgents)
    }
}

/// Reject values that are not strictly positive and finite.
pub fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SwarmError::invalid_config(field, value, "must be positive and finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = SwarmError::invalid_config("max_speed", -1.0, "must be positive and finite");
        assert_eq!(
            err.to_string(),
            "Config error: invalid value for max_speed: -1 (must be positive and finite)"
        );
    }

    #[test]
    fn ensure_positive_rejects_nan_and_zero() {
        assert!(ensure_positive("x", 1.0).is_ok());
        assert!(ensure_positive("x", 0.0).is_err());
        assert!(ensure_positive("x", f64::NAN).is_err());
        assert!(ensure_positive("x", f64::INFINITY).is_err());
    }
}
