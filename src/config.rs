//! Run and sweep configuration.
//!
//! Both configs deserialize from JSON and are validated eagerly; out-of-range
//! values are reported, never clamped.

use crate::analysis::{FixedParams, ParamKind, SweepAnalyzer, SweepPoint};
use crate::core::errors::{ConfigError, validate_prob};
use serde::{Deserialize, Serialize};

/// Parameters of a single BB84 trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Number of qubits Alice sends.
    pub n_bits: u32,
    /// Per-qubit bit-flip probability of the channel.
    pub noise_prob: f64,
    pub eve_enabled: bool,
    /// Per-qubit chance that Eve intercepts, when enabled.
    pub eve_intercept_prob: f64,
    /// Seed for a reproducible run; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            n_bits: 100,
            noise_prob: 0.0,
            eve_enabled: false,
            eve_intercept_prob: 0.0,
            seed: None,
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_bits == 0 {
            return Err(ConfigError::ZeroQubits);
        }
        validate_prob("noise_prob", self.noise_prob)?;
        validate_prob("eve_intercept_prob", self.eve_intercept_prob)?;
        Ok(())
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// A complete sweep request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub varied: ParamKind,
    pub values: Vec<f64>,
    #[serde(default)]
    pub fixed: FixedParams,
    pub n_trials: u32,
}

impl SweepConfig {
    /// Checks every value up front so a bad entry fails before any trial runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        for &value in &self.values {
            self.varied.apply(value, &self.fixed)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn run(&self) -> Result<Vec<SweepPoint>, ConfigError> {
        SweepAnalyzer::new(self.varied, self.fixed.clone(), self.n_trials)?.run(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.n_bits, 100);
        assert!(!config.eve_enabled);
    }

    #[test]
    fn parses_partial_json() {
        let config =
            ProtocolConfig::from_json(r#"{ "n_bits": 1000, "noise_prob": 0.2, "seed": 7 }"#)
                .unwrap();
        assert_eq!(config.n_bits, 1000);
        assert_eq!(config.noise_prob, 0.2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.eve_intercept_prob, 0.0);
    }

    #[test]
    fn json_values_are_validated() {
        assert_eq!(
            ProtocolConfig::from_json(r#"{ "n_bits": 0 }"#),
            Err(ConfigError::ZeroQubits)
        );
        assert!(matches!(
            ProtocolConfig::from_json(r#"{ "eve_intercept_prob": 3.0 }"#),
            Err(ConfigError::InvalidProbability { .. })
        ));
        assert!(matches!(
            ProtocolConfig::from_json("{ n_bits: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn sweep_config_round_trip() {
        let json = r#"{
            "varied": "noise",
            "values": [0.0, 0.05, 0.1],
            "fixed": { "n_bits": 200, "seed": 1 },
            "n_trials": 3
        }"#;
        let config = SweepConfig::from_json(json).unwrap();
        assert_eq!(config.varied, ParamKind::Noise);
        assert_eq!(config.fixed.n_bits, 200);

        let points = config.run().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].value, 0.05);
    }

    #[test]
    fn sweep_config_rejects_bad_values() {
        let config = SweepConfig {
            varied: ParamKind::Noise,
            values: vec![0.1, 1.5],
            fixed: FixedParams::default(),
            n_trials: 2,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));

        let config = SweepConfig {
            n_trials: 0,
            values: vec![0.1],
            ..config
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTrials));
    }
}
