//! Intercept-resend attacker.

use crate::core::errors::{ConfigError, validate_prob};
use crate::core::{Basis, ChannelNoiseModel, QubitState, RandomSource};
use serde::{Deserialize, Serialize};

/// What Eve did to one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interception {
    pub basis: Basis,
    pub measured_bit: bool,
}

/// Measures a fraction of the qubits in a random basis and re-sends her result.
///
/// Stateless between qubits: every call makes fresh draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eavesdropper {
    intercept_prob: f64,
}

impl Eavesdropper {
    pub fn new(intercept_prob: f64) -> Result<Self, ConfigError> {
        validate_prob("eve_intercept_prob", intercept_prob)?;
        Ok(Self { intercept_prob })
    }

    pub fn intercept_prob(&self) -> f64 {
        self.intercept_prob
    }

    /// Decides with one Bernoulli draw whether to intercept `qubit`.
    ///
    /// On interception the qubit crosses the Alice -> Eve leg of `channel`, is measured
    /// in a random basis and replaced by Eve's re-preparation, which is what continues
    /// towards Bob.
    pub fn intercept(
        &self,
        qubit: &mut QubitState,
        channel: &ChannelNoiseModel,
        rng: &mut RandomSource,
    ) -> Option<Interception> {
        if !rng.bernoulli(self.intercept_prob) {
            return None;
        }

        qubit.apply_channel(channel, rng);

        let basis = rng.basis();
        let measured_bit = qubit.measure(basis, rng);

        *qubit = QubitState::prepare(measured_bit, basis);

        Some(Interception {
            basis,
            measured_bit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_probability() {
        assert!(Eavesdropper::new(1.5).is_err());
        assert!(Eavesdropper::new(-1.0).is_err());
    }

    #[test]
    fn never_intercepts_at_zero() {
        let eve = Eavesdropper::new(0.0).unwrap();
        let mut rng = RandomSource::from_seed(17);
        let channel = ChannelNoiseModel::ideal();
        for _ in 0..200 {
            let mut qubit = QubitState::prepare(true, Basis::Diagonal);
            assert!(eve.intercept(&mut qubit, &channel, &mut rng).is_none());
            assert_eq!(qubit, QubitState::prepare(true, Basis::Diagonal));
        }
    }

    #[test]
    fn resends_her_own_measurement() {
        let eve = Eavesdropper::new(1.0).unwrap();
        let mut rng = RandomSource::from_seed(17);
        let channel = ChannelNoiseModel::ideal();
        for _ in 0..200 {
            let mut qubit = QubitState::prepare(false, Basis::Rectilinear);
            let hit = eve.intercept(&mut qubit, &channel, &mut rng).unwrap();

            assert_eq!(qubit, QubitState::prepare(hit.measured_bit, hit.basis));
            if hit.basis == Basis::Rectilinear {
                assert!(!hit.measured_bit);
            }
        }
    }

    #[test]
    fn intercept_rate_follows_probability() {
        let eve = Eavesdropper::new(0.3).unwrap();
        let mut rng = RandomSource::from_seed(2024);
        let channel = ChannelNoiseModel::ideal();
        let n = 10_000;
        let hits = (0..n)
            .filter(|_| {
                let mut qubit = QubitState::prepare(true, Basis::Rectilinear);
                eve.intercept(&mut qubit, &channel, &mut rng).is_some()
            })
            .count();
        let rate = hits as f64 / n as f64;
        assert!((rate - 0.3).abs() < 0.03, "rate {}", rate);
    }
}
