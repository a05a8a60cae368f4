use serde::{Deserialize, Serialize};

/// Errors in a [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("input power must be positive and finite, got {0}")]
    InvalidInputPower(f64),
    #[error("pair ('{0}', '{0}') has the same source and destination")]
    DegeneratePair(String),
}

/// Parameters for an all-pairs simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Launch power of every simulated signal, in watts.
    pub input_power: f64,
    /// Restrict the run to these ordered pairs. `None` means every pair.
    pub pairs: Option<Vec<(String, String)>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            input_power: 1e-3,
            pairs: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.input_power.is_finite() && self.input_power > 0.0) {
            return Err(ConfigError::InvalidInputPower(self.input_power));
        }
        if let Some(pairs) = &self.pairs
            && let Some((same, _)) = pairs.iter().find(|(a, b)| a == b)
        {
            return Err(ConfigError::DegeneratePair(same.clone()));
        }
        Ok(())
    }
}
