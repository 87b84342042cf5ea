//! Agent configuration

use serde::{Deserialize, Serialize};
use tactician_battle::{DEFAULT_FORMAT, DEFAULT_GENERATION};
use thiserror::Error;

use crate::evaluator::EvalWeights;
use crate::lookahead::DEFAULT_RISK_AVERSION;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings shared by every battle an agent plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Our account name, matched case-insensitively against `|player|` lines
    pub self_name: String,
    pub generation: u8,
    pub format: String,
    pub weights: EvalWeights,
    pub risk_aversion: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            self_name: String::new(),
            generation: DEFAULT_GENERATION,
            format: DEFAULT_FORMAT.to_string(),
            weights: EvalWeights::default(),
            risk_aversion: DEFAULT_RISK_AVERSION,
        }
    }
}

impl AgentConfig {
    pub fn new(self_name: impl Into<String>) -> Self {
        Self {
            self_name: self_name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weights.is_finite() {
            return Err(ConfigError::Invalid("weights must be finite".to_string()));
        }
        if !self.risk_aversion.is_finite() || self.risk_aversion < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "risk_aversion must be a non-negative number, got {}",
                self.risk_aversion
            )));
        }
        Ok(())
    }
}
