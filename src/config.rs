use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::activations::Activation;
use crate::error::{DqnError, Result};

/// Construction-time configuration of a [`DqnAgent`](crate::agent::DqnAgent).
///
/// Missing fields in a JSON document fall back to [`DqnConfig::default`].
///
/// ```rust
/// use bellman::config::DqnConfig;
///
/// let config = DqnConfig::from_json_str(r#"{ "input_size": 6, "gamma": 0.95 }"#).unwrap();
/// assert_eq!(config.input_size, 6);
/// assert_eq!(config.output_size, 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    /// Capacity of the agent's experience store
    pub buffer_capacity: usize,
    /// Discount factor in `[0, 1]`
    pub gamma: f32,
    /// Exploration probability in `[0, 1]`
    pub epsilon: f32,
    /// Gradient step size, `> 0`
    pub learning_rate: f32,
    pub activation: Activation,
    /// Seed for the agent's random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            input_size: 4,
            hidden_size: 10,
            output_size: 2,
            buffer_capacity: 100,
            gamma: 0.9,
            epsilon: 0.1,
            learning_rate: 0.001,
            activation: Activation::Relu,
            seed: None,
        }
    }
}

impl DqnConfig {
    /// Check sizes and hyperparameter ranges.
    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
            ("buffer_capacity", self.buffer_capacity),
        ] {
            if size == 0 {
                return Err(DqnError::invalid_parameter(name, "must be greater than 0"));
            }
        }
        for (name, value) in [("gamma", self.gamma), ("epsilon", self.epsilon)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DqnError::invalid_parameter(
                    name.to_string(),
                    format!("must be in [0, 1], got {}", value),
                ));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(DqnError::invalid_parameter(
                "learning_rate".to_string(),
                format!("must be a positive finite number, got {}", self.learning_rate),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DqnConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading agent config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        if !self.activation.is_serializable() {
            return Err(DqnError::Serialization(
                "custom activations cannot be written to a config".to_string(),
            ));
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}
