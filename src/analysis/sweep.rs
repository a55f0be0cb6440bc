//! Parameter sweeps over many independent BB84 trials.
//!
//! For every value of the varied parameter the analyzer runs `n_trials` fresh
//! protocol runs and reduces them to one [`SweepPoint`]. With the `parallel`
//! feature the trials of a value run on the rayon pool; each trial owns its own
//! random source.

use crate::config::ProtocolConfig;
use crate::core::errors::{ConfigError, validate_prob};
use crate::core::{ChannelNoiseModel, RandomSource};
use crate::protocols::bb84::{ProtocolRun, ProtocolRunResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Values shared by every trial of a sweep; the varied parameter overrides its slot.
pub type FixedParams = ProtocolConfig;

/// The experimental knob a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Channel flip probability.
    Noise,
    /// Number of qubits per trial.
    BitCount,
    /// Effective channel noise the caller derived for a link distance.
    Distance,
    /// Extra flip probability in series with the fixed channel noise.
    Fading,
    /// Number of independent intercept-resend attackers on the link.
    EveCount,
}

impl ParamKind {
    pub fn name(self) -> &'static str {
        match self {
            ParamKind::Noise => "noise",
            ParamKind::BitCount => "bit_count",
            ParamKind::Distance => "distance",
            ParamKind::Fading => "fading",
            ParamKind::EveCount => "eve_count",
        }
    }

    /// Builds the trial configuration for `value` on top of `fixed`.
    pub fn apply(self, value: f64, fixed: &FixedParams) -> Result<ProtocolConfig, ConfigError> {
        let mut config = fixed.clone();
        match self {
            ParamKind::Noise | ParamKind::Distance => {
                config.noise_prob = value;
            }
            ParamKind::BitCount => {
                if !is_whole(value) || value < 1.0 || value > f64::from(u32::MAX) {
                    return Err(self.invalid(value, "must be a positive whole number"));
                }
                config.n_bits = value as u32;
            }
            ParamKind::Fading => {
                validate_prob("fading_prob", value)?;
                let base = ChannelNoiseModel::bit_flip(fixed.noise_prob)?;
                let fading = ChannelNoiseModel::bit_flip(value)?;
                config.noise_prob = base.compose(&fading).flip_prob();
            }
            ParamKind::EveCount => {
                if !is_whole(value) || value < 0.0 || value > f64::from(i32::MAX) {
                    return Err(self.invalid(value, "must be a non-negative whole number"));
                }
                validate_prob("eve_intercept_prob", fixed.eve_intercept_prob)?;
                let attackers = value as i32;
                config.eve_enabled = attackers > 0;
                config.eve_intercept_prob = 1.0 - (1.0 - fixed.eve_intercept_prob).powi(attackers);
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn invalid(self, value: f64, reason: &'static str) -> ConfigError {
        ConfigError::InvalidSweepValue {
            param: self,
            value,
            reason,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Trial-averaged statistics for one value of the varied parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub value: f64,
    pub n_trials: u32,
    pub avg_qber: f64,
    pub avg_final_key_length: f64,
    /// Share of trials judged secure, in percent.
    pub secure_percentage: f64,
    pub avg_sifting_efficiency: f64,
}

/// Headline numbers across a whole sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub lowest_qber: f64,
    pub highest_qber: f64,
    pub mean_key_length: f64,
    pub mean_secure_percentage: f64,
}

impl SweepSummary {
    /// `None` for an empty sweep.
    pub fn from_points(points: &[SweepPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(Self {
            lowest_qber: points.iter().map(|p| p.avg_qber).fold(f64::INFINITY, f64::min),
            highest_qber: points
                .iter()
                .map(|p| p.avg_qber)
                .fold(f64::NEG_INFINITY, f64::max),
            mean_key_length: points.iter().map(|p| p.avg_final_key_length).sum::<f64>() / n,
            mean_secure_percentage: points.iter().map(|p| p.secure_percentage).sum::<f64>() / n,
        })
    }
}

/// What a sweep keeps from one trial.
#[derive(Debug, Clone, Copy)]
struct TrialOutcome {
    qber: f64,
    final_key_length: usize,
    secure: bool,
    sifting_efficiency: f64,
}

impl From<&ProtocolRunResult> for TrialOutcome {
    fn from(result: &ProtocolRunResult) -> Self {
        Self {
            qber: result.qber,
            final_key_length: result.final_key_length(),
            secure: result.secure,
            sifting_efficiency: result.sifting_efficiency,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TrialTotals {
    trials: u32,
    qber: f64,
    final_key_length: usize,
    secure: u32,
    sifting_efficiency: f64,
}

impl TrialTotals {
    fn record(mut self, outcome: &TrialOutcome) -> Self {
        self.trials += 1;
        self.qber += outcome.qber;
        self.final_key_length += outcome.final_key_length;
        self.secure += u32::from(outcome.secure);
        self.sifting_efficiency += outcome.sifting_efficiency;
        self
    }

    fn into_point(self, value: f64) -> SweepPoint {
        let n = f64::from(self.trials.max(1));
        SweepPoint {
            value,
            n_trials: self.trials,
            avg_qber: self.qber / n,
            avg_final_key_length: self.final_key_length as f64 / n,
            secure_percentage: f64::from(self.secure) / n * 100.0,
            avg_sifting_efficiency: self.sifting_efficiency / n,
        }
    }
}

/// Repeats the full protocol for every value of one varied parameter.
#[derive(Debug, Clone)]
pub struct SweepAnalyzer {
    varied: ParamKind,
    fixed: FixedParams,
    n_trials: u32,
}

impl SweepAnalyzer {
    pub fn new(varied: ParamKind, fixed: FixedParams, n_trials: u32) -> Result<Self, ConfigError> {
        if n_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        Ok(Self {
            varied,
            fixed,
            n_trials,
        })
    }

    /// One point per entry of `values`, in the same order.
    ///
    /// An invalid value fails the sweep before any of its trials run.
    pub fn run(&self, values: &[f64]) -> Result<Vec<SweepPoint>, ConfigError> {
        values
            .iter()
            .enumerate()
            .map(|(value_idx, &value)| self.run_point(value_idx, value))
            .collect()
    }

    fn run_point(&self, value_idx: usize, value: f64) -> Result<SweepPoint, ConfigError> {
        let config = self.varied.apply(value, &self.fixed)?;
        debug!(param = %self.varied, value, n_trials = self.n_trials, "running sweep point");

        let outcomes = self.run_trials(&config, value_idx)?;
        let point = outcomes
            .iter()
            .fold(TrialTotals::default(), TrialTotals::record)
            .into_point(value);

        info!(
            param = %self.varied,
            value,
            avg_qber = point.avg_qber,
            avg_final_key_length = point.avg_final_key_length,
            secure_percentage = point.secure_percentage,
            "sweep point complete"
        );
        Ok(point)
    }

    #[cfg(feature = "parallel")]
    fn run_trials(
        &self,
        config: &ProtocolConfig,
        value_idx: usize,
    ) -> Result<Vec<TrialOutcome>, ConfigError> {
        (0..self.n_trials)
            .into_par_iter()
            .map(|trial| self.run_trial(config, value_idx, trial))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_trials(
        &self,
        config: &ProtocolConfig,
        value_idx: usize,
    ) -> Result<Vec<TrialOutcome>, ConfigError> {
        (0..self.n_trials)
            .map(|trial| self.run_trial(config, value_idx, trial))
            .collect()
    }

    fn run_trial(
        &self,
        config: &ProtocolConfig,
        value_idx: usize,
        trial: u32,
    ) -> Result<TrialOutcome, ConfigError> {
        let seed = self
            .fixed
            .seed
            .map(|base| RandomSource::derive_seed(base, value_idx as u64, u64::from(trial)));
        let config = ProtocolConfig {
            seed,
            ..config.clone()
        };
        let result = ProtocolRun::new(config)?.execute();
        Ok(TrialOutcome::from(&result))
    }
}

/// Runs `n_trials` trials for each of `values` and averages them.
pub fn run_sweep(
    varied: ParamKind,
    values: Vec<f64>,
    fixed: FixedParams,
    n_trials: u32,
) -> Result<Vec<SweepPoint>, ConfigError> {
    SweepAnalyzer::new(varied, fixed, n_trials)?.run(&values)
}

/// `steps` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps - 1) as f64;
            (0..steps)
                .map(|i| if i == steps - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}
