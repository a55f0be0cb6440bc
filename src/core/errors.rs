use crate::analysis::ParamKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid probability for {name}: {value}. Must be between 0.0 and 1.0")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Number of qubits must be greater than zero")]
    ZeroQubits,

    #[error("Number of trials must be at least one")]
    ZeroTrials,

    #[error("Invalid value {value} for swept parameter {param}: {reason}")]
    InvalidSweepValue {
        param: ParamKind,
        value: f64,
        reason: &'static str,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Validate probability parameter
pub(crate) fn validate_prob(name: &'static str, p: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::InvalidProbability { name, value: p });
    }
    Ok(())
}
